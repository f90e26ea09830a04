// In crates/analytics/src/types.rs

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize, Serializer};

use crate::error::Error;

/// Gross profit over absolute gross loss.
///
/// A history with gains and no losses has no finite profit factor. That case is
/// `Unbounded` instead of `f64::INFINITY` so nothing downstream does arithmetic on it
/// by accident; use [`ProfitFactor::capped`] when a number is required.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProfitFactor {
    Finite(f64),
    Unbounded,
}

impl ProfitFactor {
    /// `gross_loss` is the (non-positive) sum of losing pnl.
    pub fn from_gross(gross_profit: f64, gross_loss: f64) -> Self {
        if gross_loss != 0.0 {
            ProfitFactor::Finite(gross_profit / gross_loss.abs())
        } else if gross_profit > 0.0 {
            ProfitFactor::Unbounded
        } else {
            ProfitFactor::Finite(0.0)
        }
    }

    pub fn is_unbounded(&self) -> bool {
        matches!(self, ProfitFactor::Unbounded)
    }

    /// The finite value, or `limit` for an unbounded factor.
    pub fn capped(&self, limit: f64) -> f64 {
        match self {
            ProfitFactor::Finite(v) => *v,
            ProfitFactor::Unbounded => limit,
        }
    }

    /// Lossy view for display and charting only.
    pub fn as_f64(&self) -> f64 {
        self.capped(f64::INFINITY)
    }
}

impl PartialOrd for ProfitFactor {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (ProfitFactor::Unbounded, ProfitFactor::Unbounded) => Some(Ordering::Equal),
            (ProfitFactor::Unbounded, ProfitFactor::Finite(_)) => Some(Ordering::Greater),
            (ProfitFactor::Finite(_), ProfitFactor::Unbounded) => Some(Ordering::Less),
            (ProfitFactor::Finite(a), ProfitFactor::Finite(b)) => a.partial_cmp(b),
        }
    }
}

impl fmt::Display for ProfitFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProfitFactor::Finite(v) => {
                let precision = f.precision().unwrap_or(2);
                write!(f, "{:.*}", precision, v)
            }
            ProfitFactor::Unbounded => f.write_str("∞"),
        }
    }
}

// Serialized as a plain number, or the string "Infinity".
impl Serialize for ProfitFactor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ProfitFactor::Finite(v) => serializer.serialize_f64(*v),
            ProfitFactor::Unbounded => serializer.serialize_str("Infinity"),
        }
    }
}

/// What a drawdown percentage is measured against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DdBasis {
    /// Percent of the initial account capital.
    #[default]
    Capital,
    /// Percent of one risk unit (the median losing trade).
    R,
}

impl FromStr for DdBasis {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "capital" => Ok(DdBasis::Capital),
            "r" => Ok(DdBasis::R),
            _ => Err(Error::UnknownBasis(s.to_string())),
        }
    }
}

/// Aggregate statistics for an ordered list of trade outcomes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metrics {
    pub trades: usize,
    pub wins: usize,
    /// Fraction in `[0, 1]`.
    pub winrate: f64,
    pub gross_profit: f64,
    /// Sum of losing pnl; zero or negative.
    pub gross_loss: f64,
    pub profit_factor: ProfitFactor,
    pub pips_sum: f64,
    /// Cumulative pnl after each trade, in input order.
    pub equity_series: Vec<f64>,
    /// Largest peak-to-trough decline of `equity_series`, reported as a value `<= 0`.
    pub max_drawdown: f64,
    pub pnls: Vec<f64>,
    pub pips: Vec<f64>,
}

/// The headline figures shown side by side when comparing two metric sets.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MetricsSummary {
    pub trades: usize,
    pub winrate: f64,
    pub profit_factor: ProfitFactor,
    pub pips_sum: f64,
    pub max_drawdown: f64,
    pub dd_percent: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profit_factor_edge_cases() {
        assert_eq!(ProfitFactor::from_gross(3000.0, -500.0), ProfitFactor::Finite(6.0));
        assert_eq!(ProfitFactor::from_gross(100.0, 0.0), ProfitFactor::Unbounded);
        assert_eq!(ProfitFactor::from_gross(0.0, 0.0), ProfitFactor::Finite(0.0));
        assert_eq!(ProfitFactor::from_gross(0.0, -10.0), ProfitFactor::Finite(0.0));
    }

    #[test]
    fn unbounded_orders_above_every_finite_value() {
        assert!(ProfitFactor::Unbounded > ProfitFactor::Finite(1e12));
        assert!(ProfitFactor::Finite(1.2) < ProfitFactor::Finite(1.3));
        assert!(!(ProfitFactor::Unbounded > ProfitFactor::Unbounded));
    }

    #[test]
    fn display_and_serialization_keep_infinity() {
        assert_eq!(ProfitFactor::Unbounded.to_string(), "∞");
        assert_eq!(format!("{:.1}", ProfitFactor::Finite(1.234)), "1.2");
        assert_eq!(ProfitFactor::Finite(2.0).to_string(), "2.00");
        assert_eq!(ProfitFactor::Unbounded.as_f64(), f64::INFINITY);
        assert_eq!(ProfitFactor::Unbounded.capped(3.0), 3.0);

        let json = serde_json::to_string(&ProfitFactor::Unbounded).unwrap();
        assert_eq!(json, "\"Infinity\"");
        let json = serde_json::to_string(&ProfitFactor::Finite(1.5)).unwrap();
        assert_eq!(json, "1.5");
    }

    #[test]
    fn basis_parses_case_insensitively() {
        assert_eq!("Capital".parse::<DdBasis>(), Ok(DdBasis::Capital));
        assert_eq!("r".parse::<DdBasis>(), Ok(DdBasis::R));
        assert!("equity".parse::<DdBasis>().is_err());
    }
}
