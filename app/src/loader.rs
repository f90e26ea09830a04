// In app/src/loader.rs

use std::fs;
use std::path::Path;

use analytics::filter::TradeFilter;
use anyhow::{Context, Result};
use core_types::normalize::normalize_all;
use core_types::{FieldMapping, RawTradeRecord, TradeRecord};
use serde::Deserialize;

/// A trade export is either a bare array of rows or an object wrapping one.
#[derive(Deserialize)]
#[serde(untagged)]
enum TradeExport {
    Rows(Vec<RawTradeRecord>),
    Wrapped { trades: Vec<RawTradeRecord> },
}

impl TradeExport {
    fn into_rows(self) -> Vec<RawTradeRecord> {
        match self {
            TradeExport::Rows(rows) | TradeExport::Wrapped { trades: rows } => rows,
        }
    }
}

/// Parses export JSON into raw rows.
pub fn parse_rows(json: &str) -> Result<Vec<RawTradeRecord>> {
    let export: TradeExport =
        serde_json::from_str(json).context("Trade export must be a JSON array of objects or {\"trades\": [...]}")?;
    Ok(export.into_rows())
}

/// Reads, normalizes and filters a trade export.
pub fn load_trades(path: &Path, mapping: &FieldMapping, filter: &TradeFilter) -> Result<Vec<TradeRecord>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read trade export {}", path.display()))?;
    let rows = parse_rows(&content).with_context(|| format!("Failed to parse {}", path.display()))?;

    let trades = normalize_all(&rows, mapping);
    let trades = if filter.is_empty() { trades } else { filter.apply(&trades) };

    tracing::info!(
        path = %path.display(),
        rows = rows.len(),
        kept = trades.len(),
        "Loaded trade export."
    );
    Ok(trades)
}
