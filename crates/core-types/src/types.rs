// In crates/core-types/src/types.rs

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, NaiveDate, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::pricing::{self, CostBreakdown};

/// A traded instrument, e.g. "USD/JPY".
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Symbol(pub String);

impl Symbol {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// True for yen crosses, which quote pips at two decimals instead of four.
    pub fn is_jpy_cross(&self) -> bool {
        self.0.trim().to_ascii_uppercase().ends_with("JPY")
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Symbol {
    fn from(value: &str) -> Self {
        Symbol(value.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Long,
    Short,
}

impl FromStr for Side {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "long" | "buy" => Ok(Side::Long),
            "short" | "sell" => Ok(Side::Short),
            _ => Err(Error::UnknownSide(s.to_string())),
        }
    }
}

/// A single closed trade after normalization.
///
/// Everything except `pnl` is optional. Lists of these are assumed to be in
/// chronological order; nothing in the analytics crates sorts them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TradeRecord {
    /// Signed realised profit in account currency.
    pub pnl: f64,
    pub pips: Option<f64>,
    /// Explicit win flag from the export. When absent, a trade wins if `pnl > 0`.
    pub win: Option<bool>,
    pub instrument: Symbol,
    pub side: Option<Side>,
    pub timestamp: Option<DateTime<Utc>>,
    /// 0-23. Falls back to the timestamp's hour.
    pub hour_of_day: Option<u8>,
    /// 0-6 with 0 = Sunday. Falls back to the timestamp's weekday.
    pub day_of_week: Option<u8>,

    // Optional execution details used by the pricing helpers.
    pub open_price: Option<f64>,
    pub close_price: Option<f64>,
    pub stop_price: Option<f64>,
    pub target_price: Option<f64>,
    pub commission: Option<f64>,
    pub swap: Option<f64>,
}

impl TradeRecord {
    pub fn new(pnl: f64) -> Self {
        Self {
            pnl,
            ..Default::default()
        }
    }

    pub fn with_instrument(mut self, instrument: impl Into<String>) -> Self {
        self.instrument = Symbol(instrument.into());
        self
    }

    pub fn with_pips(mut self, pips: f64) -> Self {
        self.pips = Some(pips);
        self
    }

    pub fn with_win(mut self, win: bool) -> Self {
        self.win = Some(win);
        self
    }

    pub fn with_side(mut self, side: Side) -> Self {
        self.side = Some(side);
        self
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    pub fn with_slot(mut self, day_of_week: u8, hour_of_day: u8) -> Self {
        self.day_of_week = Some(day_of_week);
        self.hour_of_day = Some(hour_of_day);
        self
    }

    pub fn is_win(&self) -> bool {
        self.win.unwrap_or(self.pnl > 0.0)
    }

    /// Losses are judged on pnl sign alone, independent of any explicit win flag.
    pub fn is_loss(&self) -> bool {
        self.pnl < 0.0
    }

    pub fn pips_or_zero(&self) -> f64 {
        self.pips.unwrap_or(0.0)
    }

    /// Hour of day used for time bucketing. Defaults to 0 when nothing is known.
    pub fn hour(&self) -> u8 {
        self.hour_of_day
            .or_else(|| self.timestamp.map(|ts| ts.hour() as u8))
            .unwrap_or(0)
    }

    /// Day of week (0 = Sunday) used for bucketing. Defaults to 0 when nothing is known.
    pub fn weekday(&self) -> u8 {
        self.day_of_week
            .or_else(|| {
                self.timestamp
                    .map(|ts| ts.weekday().num_days_from_sunday() as u8)
            })
            .unwrap_or(0)
    }

    pub fn trade_date(&self) -> Option<NaiveDate> {
        self.timestamp.map(|ts| ts.date_naive())
    }

    /// Planned reward/risk from the stop and target, when entry, stop and target are all known.
    pub fn planned_reward_risk(&self) -> Option<f64> {
        let (open, stop, target) = (self.open_price?, self.stop_price?, self.target_price?);
        pricing::reward_risk_ratio(&self.instrument, open, stop, target)
    }

    /// Gross/net/cost split of `pnl`. `None` when the export carries neither
    /// commission nor swap.
    pub fn costs(&self) -> Option<CostBreakdown> {
        if self.commission.is_none() && self.swap.is_none() {
            return None;
        }
        Some(pricing::cost_breakdown(self.pnl, self.commission, self.swap))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn execution_details_feed_pricing() {
        let mut trade = TradeRecord::new(1000.0).with_instrument("EUR/USD");
        assert_eq!(trade.planned_reward_risk(), None);
        assert_eq!(trade.costs(), None);

        trade.open_price = Some(1.1000);
        trade.stop_price = Some(1.0980);
        trade.target_price = Some(1.1030);
        trade.commission = Some(120.0);
        trade.swap = Some(-30.4);
        assert_eq!(trade.planned_reward_risk(), Some(1.5));
        let costs = trade.costs().unwrap();
        assert_eq!((costs.gross, costs.net, costs.cost), (1000.0, 850.0, 150.0));
    }

    #[test]
    fn win_flag_falls_back_to_pnl_sign() {
        assert!(TradeRecord::new(10.0).is_win());
        assert!(!TradeRecord::new(0.0).is_win());
        assert!(!TradeRecord::new(-3.0).is_win());
        assert!(TradeRecord::new(-3.0).with_win(true).is_win());
    }

    #[test]
    fn loss_ignores_explicit_flag() {
        let trade = TradeRecord::new(-5.0).with_win(true);
        assert!(trade.is_loss());
    }

    #[test]
    fn hour_and_weekday_derive_from_timestamp() {
        // 2024-03-06 was a Wednesday.
        let ts = Utc.with_ymd_and_hms(2024, 3, 6, 14, 30, 0).unwrap();
        let trade = TradeRecord::new(1.0).with_timestamp(ts);
        assert_eq!(trade.hour(), 14);
        assert_eq!(trade.weekday(), 3);

        let explicit = trade.with_slot(5, 2);
        assert_eq!(explicit.hour(), 2);
        assert_eq!(explicit.weekday(), 5);

        assert_eq!(TradeRecord::new(1.0).hour(), 0);
        assert_eq!(TradeRecord::new(1.0).weekday(), 0);
    }

    #[test]
    fn side_parses_broker_spellings() {
        assert_eq!("BUY".parse::<Side>(), Ok(Side::Long));
        assert_eq!(" short ".parse::<Side>(), Ok(Side::Short));
        assert_eq!(
            "flat".parse::<Side>(),
            Err(Error::UnknownSide("flat".to_string()))
        );
    }

    #[test]
    fn jpy_cross_detection() {
        assert!(Symbol::from("USD/JPY").is_jpy_cross());
        assert!(Symbol::from("gbpjpy ").is_jpy_cross());
        assert!(!Symbol::from("EUR/USD").is_jpy_cross());
    }
}
