// In crates/analytics/src/score.rs

//! Maps aggregate metrics onto five 0-10 sub-scores and a rank.

use std::fmt;

use serde::Serialize;

use crate::types::{DdBasis, Metrics};

/// Profit factor used in place of an unbounded one.
const UNBOUNDED_PF_STAND_IN: f64 = 3.0;

// Linear interpolation anchors: the input value scoring 0 and the one scoring 10.
const WINRATE_FLOOR: f64 = 0.35;
const WINRATE_CEIL: f64 = 0.80;
const DD_PERCENT_FLOOR: f64 = -20.0;
const PF_FLOOR: f64 = 0.8;
const PF_CEIL: f64 = 2.0;

fn clamp10(v: f64) -> f64 {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, 10.0) }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreParts {
    pub entry: f64,
    pub dd: f64,
    pub rr: f64,
    pub risk: f64,
    pub stability: f64,
}

impl ScoreParts {
    /// Labelled values in radar-chart order.
    pub fn labelled(&self) -> [(&'static str, f64); 5] {
        [
            ("entry", self.entry),
            ("dd", self.dd),
            ("rr", self.rr),
            ("risk", self.risk),
            ("stability", self.stability),
        ]
    }

    pub fn mean(&self) -> f64 {
        (self.entry + self.dd + self.rr + self.risk + self.stability) / 5.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Rank {
    C,
    B,
    A,
    S,
}

impl Rank {
    /// Each tier includes its lower bound.
    pub fn from_overall(overall: f64) -> Self {
        if overall >= 9.0 {
            Rank::S
        } else if overall >= 8.0 {
            Rank::A
        } else if overall >= 7.0 {
            Rank::B
        } else {
            Rank::C
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Rank::S => "Exceptional",
            Rank::A => "Excellent",
            Rank::B => "Good",
            Rank::C => "Improving",
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Rank::S => "S",
            Rank::A => "A",
            Rank::B => "B",
            Rank::C => "C",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OverallScore {
    pub overall: f64,
    pub parts: ScoreParts,
    pub rank: Rank,
}

pub fn score(metrics: &Metrics, basis: DdBasis, initial_capital: f64) -> OverallScore {
    let entry = clamp10((metrics.winrate - WINRATE_FLOOR) / (WINRATE_CEIL - WINRATE_FLOOR) * 10.0);

    let dd_percent = metrics.dd_percent(basis, initial_capital);
    let dd = clamp10((dd_percent - DD_PERCENT_FLOOR) / -DD_PERCENT_FLOOR * 10.0);

    let pf = metrics.profit_factor.capped(UNBOUNDED_PF_STAND_IN);
    let rr = clamp10((pf - PF_FLOOR) / (PF_CEIL - PF_FLOOR) * 10.0);

    let risk = clamp10(0.7 * dd + 0.3 * rr);
    let stability = clamp10(0.6 * (metrics.winrate * 10.0) + 0.4 * rr);

    let parts = ScoreParts {
        entry,
        dd,
        rr,
        risk,
        stability,
    };
    let overall = clamp10(parts.mean());

    OverallScore {
        overall,
        parts,
        rank: Rank::from_overall(overall),
    }
}
