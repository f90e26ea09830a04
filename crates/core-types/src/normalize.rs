// In crates/core-types/src/normalize.rs

//! Converts loosely typed export rows into [`TradeRecord`]s.
//!
//! Broker exports and hand-edited spreadsheets store numbers as text with
//! currency symbols and thousands separators, booleans as "TRUE"/"win"/1, and
//! so on. Coercion here is fail-open: anything unparseable becomes `0`/`false`
//! rather than an error, because a journal should still render with a bad cell.

use std::collections::HashMap;
use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::pricing;
use crate::types::{Side, Symbol, TradeRecord};

/// One cell of an exported trade row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Bool(bool),
    Number(f64),
    Text(String),
    Null,
}

impl FieldValue {
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

/// A raw exported row: column name to cell.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawTradeRecord(pub HashMap<String, FieldValue>);

impl RawTradeRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, column: &str, value: impl Into<FieldValue>) -> Self {
        self.0.insert(column.to_string(), value.into());
        self
    }

    pub fn get(&self, column: &str) -> Option<&FieldValue> {
        self.0.get(column)
    }
}

/// Names the column that holds each [`TradeRecord`] field.
///
/// A `None` column means the export never carries that field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldMapping {
    pub pnl: String,
    pub pips: Option<String>,
    pub win: Option<String>,
    pub instrument: Option<String>,
    pub side: Option<String>,
    pub timestamp: Option<String>,
    pub hour: Option<String>,
    pub weekday: Option<String>,
    pub open_price: Option<String>,
    pub close_price: Option<String>,
    pub stop_price: Option<String>,
    pub target_price: Option<String>,
    pub commission: Option<String>,
    pub swap: Option<String>,
}

impl Default for FieldMapping {
    fn default() -> Self {
        let col = |name: &str| Some(name.to_string());
        Self {
            pnl: "pnl".to_string(),
            pips: col("pips"),
            win: col("win"),
            instrument: col("pair"),
            side: col("side"),
            timestamp: col("timestamp"),
            hour: col("hour"),
            weekday: col("dayOfWeek"),
            open_price: col("openPrice"),
            close_price: col("closePrice"),
            stop_price: col("stopPrice"),
            target_price: col("targetPrice"),
            commission: col("commission"),
            swap: col("swap"),
        }
    }
}

/// Strictly parses the numeric content of a text cell.
///
/// Every character other than digits, `.` and `-` is dropped first, then the
/// longest leading number is taken, so `"¥-1,250.5 JPY"` parses as `-1250.5`
/// and `"12.5.1"` as `12.5`.
pub fn parse_number(text: &str) -> Result<f64> {
    let stripped: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();

    let bytes = stripped.as_bytes();
    let mut pos = 0;
    let negative = bytes.first() == Some(&b'-');
    if negative {
        pos += 1;
    }
    let int_start = pos;
    while pos < bytes.len() && bytes[pos].is_ascii_digit() {
        pos += 1;
    }
    let int_digits = &stripped[int_start..pos];
    let mut frac_digits = "";
    if pos < bytes.len() && bytes[pos] == b'.' {
        let frac_start = pos + 1;
        let mut end = frac_start;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
        }
        frac_digits = &stripped[frac_start..end];
    }
    if int_digits.is_empty() && frac_digits.is_empty() {
        return Err(Error::InvalidNumber(text.to_string()));
    }

    let mut canonical = String::with_capacity(int_digits.len() + frac_digits.len() + 3);
    if negative {
        canonical.push('-');
    }
    canonical.push_str(if int_digits.is_empty() { "0" } else { int_digits });
    if !frac_digits.is_empty() {
        canonical.push('.');
        canonical.push_str(frac_digits);
    }

    // Exact decimal first; very long digit strings overflow Decimal and go through f64.
    match Decimal::from_str(&canonical) {
        Ok(value) => value
            .to_f64()
            .ok_or_else(|| Error::InvalidNumber(text.to_string())),
        Err(_) => canonical
            .parse::<f64>()
            .map_err(|_| Error::InvalidNumber(text.to_string())),
    }
}

/// Lenient numeric coercion. Never fails; unparseable input is `0`.
pub fn as_float(value: &FieldValue) -> f64 {
    match value {
        FieldValue::Number(n) => *n,
        FieldValue::Text(s) => parse_number(s).unwrap_or_else(|e| {
            if !s.trim().is_empty() {
                tracing::debug!(error = %e, "Coercing non-numeric cell to 0");
            }
            0.0
        }),
        FieldValue::Bool(_) | FieldValue::Null => 0.0,
    }
}

/// Lenient boolean coercion: text starting with `t` is true, otherwise any
/// positive number is.
pub fn as_bool(value: &FieldValue) -> bool {
    match value {
        FieldValue::Bool(b) => *b,
        FieldValue::Number(n) => *n > 0.0,
        FieldValue::Text(s) => {
            s.trim().to_ascii_lowercase().starts_with('t') || as_float(value) > 0.0
        }
        FieldValue::Null => false,
    }
}

pub fn as_text(value: &FieldValue) -> Option<String> {
    match value {
        FieldValue::Text(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        FieldValue::Text(_) | FieldValue::Null => None,
        FieldValue::Number(n) => Some(n.to_string()),
        FieldValue::Bool(b) => Some(b.to_string()),
    }
}

const TIMESTAMP_FORMATS: [&str; 5] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y.%m.%d %H:%M:%S",
    "%Y/%m/%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y.%m.%d %H:%M",
];

/// Parses RFC 3339 or the common broker formats. Naive times are taken as UTC.
pub fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .map(|naive| naive.and_utc())
}

/// Maps one raw row into a [`TradeRecord`] using an explicit column mapping.
pub fn normalize(raw: &RawTradeRecord, mapping: &FieldMapping) -> TradeRecord {
    let field = |column: &Option<String>| {
        column
            .as_deref()
            .and_then(|c| raw.get(c))
            .filter(|v| !v.is_null())
    };
    let number = |column: &Option<String>| field(column).map(as_float);

    let pnl = raw
        .get(&mapping.pnl)
        .map(as_float)
        .unwrap_or(0.0);

    let instrument = field(&mapping.instrument)
        .and_then(as_text)
        .map(Symbol)
        .unwrap_or_default();

    let side = field(&mapping.side).and_then(as_text).and_then(|s| {
        s.parse::<Side>()
            .map_err(|e| tracing::warn!(error = %e, "Ignoring unrecognised side"))
            .ok()
    });

    let timestamp = field(&mapping.timestamp)
        .and_then(as_text)
        .and_then(|s| parse_timestamp(&s));

    let hour_of_day = number(&mapping.hour).and_then(|h| in_range(h, 23.0, "hour"));
    let day_of_week = number(&mapping.weekday).and_then(|d| in_range(d, 6.0, "weekday"));

    let mut trade = TradeRecord {
        pnl,
        pips: number(&mapping.pips),
        win: field(&mapping.win).map(as_bool),
        instrument,
        side,
        timestamp,
        hour_of_day,
        day_of_week,
        open_price: number(&mapping.open_price),
        close_price: number(&mapping.close_price),
        stop_price: number(&mapping.stop_price),
        target_price: number(&mapping.target_price),
        commission: number(&mapping.commission),
        swap: number(&mapping.swap),
    };

    if trade.pips.is_none() {
        if let (Some(open), Some(close)) = (trade.open_price, trade.close_price) {
            let side = trade.side.unwrap_or(Side::Long);
            trade.pips = Some(pricing::pips_from_prices(&trade.instrument, side, open, close));
        }
    }

    trade
}

/// Normalizes a whole export, preserving row order.
pub fn normalize_all(rows: &[RawTradeRecord], mapping: &FieldMapping) -> Vec<TradeRecord> {
    rows.iter().map(|row| normalize(row, mapping)).collect()
}

fn in_range(value: f64, max: f64, field: &'static str) -> Option<u8> {
    if value >= 0.0 && value <= max {
        Some(value.floor() as u8)
    } else {
        tracing::warn!(field, value, "Dropping out-of-range time field");
        None
    }
}
