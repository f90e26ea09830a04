// In crates/analytics/src/filter.rs

use std::str::FromStr;

use chrono::NaiveDate;
use core_types::{Side, Symbol, TradeRecord};
use serde::Deserialize;

use crate::error::{Error, Result};

const WEEKDAY_NAMES: [&str; 7] = ["sun", "mon", "tue", "wed", "thu", "fri", "sat"];

fn invalid(kind: &'static str, value: &str) -> Error {
    Error::InvalidFilter {
        kind,
        value: value.to_string(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Win,
    Loss,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekdayFilter {
    /// Monday to Friday.
    Weekdays,
    Weekend,
    /// A single day, 0 = Sunday.
    Day(u8),
}

/// Trading sessions by hour of day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Session {
    Asia,
    London,
    NewYork,
    /// The thin-liquidity hours after the New York close.
    Thin,
}

impl FromStr for Outcome {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "win" | "wins" => Ok(Outcome::Win),
            "loss" | "losses" => Ok(Outcome::Loss),
            _ => Err(invalid("outcome", s)),
        }
    }
}

/// Accepts `weekdays`, `weekend`, a day number (0 = Sunday) or a day name.
impl FromStr for WeekdayFilter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let lower = s.trim().to_ascii_lowercase();
        match lower.as_str() {
            "weekdays" => return Ok(WeekdayFilter::Weekdays),
            "weekend" => return Ok(WeekdayFilter::Weekend),
            _ => {}
        }
        if let Ok(day) = lower.parse::<u8>() {
            return if day < 7 {
                Ok(WeekdayFilter::Day(day))
            } else {
                Err(invalid("weekday", s))
            };
        }
        WEEKDAY_NAMES
            .iter()
            .position(|name| lower.starts_with(name))
            .map(|day| WeekdayFilter::Day(day as u8))
            .ok_or_else(|| invalid("weekday", s))
    }
}

impl FromStr for Session {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace(['-', '_', ' '], "").as_str() {
            "asia" | "tokyo" => Ok(Session::Asia),
            "london" => Ok(Session::London),
            "newyork" | "ny" => Ok(Session::NewYork),
            "thin" => Ok(Session::Thin),
            _ => Err(invalid("session", s)),
        }
    }
}

impl Session {
    pub fn contains(&self, hour: u8) -> bool {
        match self {
            Session::Asia => hour < 9,
            Session::London => (9..17).contains(&hour),
            Session::NewYork => (17..24).contains(&hour),
            Session::Thin => hour < 6,
        }
    }
}

/// Narrows a trade list before analysis. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct TradeFilter {
    pub instrument: Option<Symbol>,
    pub side: Option<Side>,
    pub outcome: Option<Outcome>,
    /// Inclusive.
    pub from: Option<NaiveDate>,
    /// Inclusive.
    pub to: Option<NaiveDate>,
    pub weekday: Option<WeekdayFilter>,
    pub session: Option<Session>,
}

impl TradeFilter {
    pub fn is_empty(&self) -> bool {
        *self == TradeFilter::default()
    }

    pub fn matches(&self, trade: &TradeRecord) -> bool {
        if let Some(instrument) = &self.instrument {
            if trade.instrument.as_str().trim() != instrument.as_str().trim() {
                return false;
            }
        }
        if self.side.is_some() && trade.side != self.side {
            return false;
        }
        match self.outcome {
            Some(Outcome::Win) if trade.pnl <= 0.0 => return false,
            Some(Outcome::Loss) if trade.pnl >= 0.0 => return false,
            _ => {}
        }
        // Undated trades cannot be shown to fall inside a date range.
        if self.from.is_some() || self.to.is_some() {
            let Some(date) = trade.trade_date() else {
                return false;
            };
            if self.from.is_some_and(|from| date < from) || self.to.is_some_and(|to| date > to) {
                return false;
            }
        }
        if let Some(weekday) = self.weekday {
            let day = trade.weekday();
            let keep = match weekday {
                WeekdayFilter::Weekdays => (1..=5).contains(&day),
                WeekdayFilter::Weekend => day == 0 || day == 6,
                WeekdayFilter::Day(d) => day == d,
            };
            if !keep {
                return false;
            }
        }
        if let Some(session) = self.session {
            if !session.contains(trade.hour()) {
                return false;
            }
        }
        true
    }

    /// Matching trades in their original order.
    pub fn apply(&self, trades: &[TradeRecord]) -> Vec<TradeRecord> {
        trades.iter().filter(|t| self.matches(t)).cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn dated(pnl: f64, day: u32, hour: u32) -> TradeRecord {
        TradeRecord::new(pnl).with_timestamp(Utc.with_ymd_and_hms(2024, 3, day, hour, 0, 0).unwrap())
    }

    #[test]
    fn selectors_parse_from_text() {
        assert_eq!("losses".parse::<Outcome>(), Ok(Outcome::Loss));
        assert_eq!("weekend".parse::<WeekdayFilter>(), Ok(WeekdayFilter::Weekend));
        assert_eq!("3".parse::<WeekdayFilter>(), Ok(WeekdayFilter::Day(3)));
        assert_eq!("Friday".parse::<WeekdayFilter>(), Ok(WeekdayFilter::Day(5)));
        assert_eq!("new-york".parse::<Session>(), Ok(Session::NewYork));
        assert!("7".parse::<WeekdayFilter>().is_err());
        assert!(matches!(
            "evening".parse::<Session>(),
            Err(Error::InvalidFilter { kind: "session", .. })
        ));
    }

    #[test]
    fn empty_filter_keeps_everything() {
        let trades = vec![TradeRecord::new(1.0), TradeRecord::new(-1.0)];
        let filter = TradeFilter::default();
        assert!(filter.is_empty());
        assert_eq!(filter.apply(&trades), trades);
    }

    #[test]
    fn filters_by_instrument_side_and_outcome() {
        let trades = vec![
            TradeRecord::new(10.0).with_instrument("USD/JPY").with_side(Side::Long),
            TradeRecord::new(-5.0).with_instrument("USD/JPY").with_side(Side::Short),
            TradeRecord::new(7.0).with_instrument("EUR/USD").with_side(Side::Long),
            TradeRecord::new(0.0).with_instrument("USD/JPY"),
        ];

        let by_pair = TradeFilter {
            instrument: Some(Symbol::from("USD/JPY")),
            ..Default::default()
        };
        assert_eq!(by_pair.apply(&trades).len(), 3);

        let longs = TradeFilter {
            side: Some(Side::Long),
            ..Default::default()
        };
        assert_eq!(longs.apply(&trades).len(), 2);

        let losers = TradeFilter {
            outcome: Some(Outcome::Loss),
            ..Default::default()
        };
        assert_eq!(losers.apply(&trades), vec![trades[1].clone()]);

        let winners = TradeFilter {
            outcome: Some(Outcome::Win),
            ..Default::default()
        };
        assert_eq!(winners.apply(&trades).len(), 2);
    }

    #[test]
    fn date_range_is_inclusive_and_drops_undated() {
        let trades = vec![dated(1.0, 4, 10), dated(2.0, 6, 10), dated(3.0, 8, 10), TradeRecord::new(4.0)];
        let filter = TradeFilter {
            from: NaiveDate::from_ymd_opt(2024, 3, 4),
            to: NaiveDate::from_ymd_opt(2024, 3, 6),
            ..Default::default()
        };
        let kept: Vec<f64> = filter.apply(&trades).iter().map(|t| t.pnl).collect();
        assert_eq!(kept, vec![1.0, 2.0]);
    }

    #[test]
    fn weekday_and_session_selectors() {
        // 2024-03-09 is a Saturday, 2024-03-11 a Monday.
        let trades = vec![dated(1.0, 9, 3), dated(2.0, 11, 3), dated(3.0, 11, 12), dated(4.0, 11, 20)];

        let weekend = TradeFilter {
            weekday: Some(WeekdayFilter::Weekend),
            ..Default::default()
        };
        assert_eq!(weekend.apply(&trades).len(), 1);

        let monday = TradeFilter {
            weekday: Some(WeekdayFilter::Day(1)),
            ..Default::default()
        };
        assert_eq!(monday.apply(&trades).len(), 3);

        let thin = TradeFilter {
            session: Some(Session::Thin),
            ..Default::default()
        };
        assert_eq!(thin.apply(&trades).len(), 2);

        let london = TradeFilter {
            session: Some(Session::London),
            weekday: Some(WeekdayFilter::Weekdays),
            ..Default::default()
        };
        let kept: Vec<f64> = london.apply(&trades).iter().map(|t| t.pnl).collect();
        assert_eq!(kept, vec![3.0]);

        assert!(Session::NewYork.contains(20));
        assert!(Session::Asia.contains(8));
        assert!(!Session::Asia.contains(9));
    }
}
