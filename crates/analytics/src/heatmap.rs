// In crates/analytics/src/heatmap.rs

//! Two-dimensional performance buckets: instrument x time slot and weekday x time slot.
//!
//! Every trade lands in exactly one cell of each heatmap. Cells without trades
//! carry the neutral value `0.5` (indistinguishable from a breakeven bucket by
//! value alone); use [`HeatmapCell::sample`] or `count` to tell them apart.

use core_types::TradeRecord;
use serde::Serialize;

pub const TIME_SLOTS: [&str; 8] = [
    "0-3", "3-6", "6-9", "9-12", "12-15", "15-18", "18-21", "21-24",
];

pub const WEEKDAYS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

pub const DEFAULT_INSTRUMENTS: [&str; 5] = ["USD/JPY", "EUR/USD", "GBP/JPY", "AUD/USD", "EUR/JPY"];

pub const EMPTY_CELL_VALUE: f64 = 0.5;

// Average pnl of -5,000 maps to 0.0 and +5,000 to 1.0.
const PNL_OFFSET: f64 = 5_000.0;
const PNL_RANGE: f64 = 10_000.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatmapCell {
    pub row: String,
    pub col: String,
    /// Normalized performance in `[0, 1]`.
    pub value: f64,
    pub count: usize,
}

impl HeatmapCell {
    fn from_bucket(row: &str, col: &str, bucket: &Bucket, value: impl Fn(&Bucket) -> f64) -> Self {
        Self {
            row: row.to_string(),
            col: col.to_string(),
            value: if bucket.count > 0 {
                value(bucket)
            } else {
                EMPTY_CELL_VALUE
            },
            count: bucket.count,
        }
    }

    /// The value, or `None` when no trade fell into this cell.
    pub fn sample(&self) -> Option<f64> {
        (self.count > 0).then_some(self.value)
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct Bucket {
    pnl_sum: f64,
    wins: usize,
    count: usize,
}

impl Bucket {
    fn add(&mut self, trade: &TradeRecord) {
        self.pnl_sum += trade.pnl;
        if trade.is_win() {
            self.wins += 1;
        }
        self.count += 1;
    }

    fn normalized_avg_pnl(&self) -> f64 {
        let avg = self.pnl_sum / self.count as f64;
        ((avg + PNL_OFFSET) / PNL_RANGE).clamp(0.0, 1.0)
    }

    fn winrate(&self) -> f64 {
        self.wins as f64 / self.count as f64
    }
}

/// Index into [`TIME_SLOTS`]. Hours outside 0-23 fall into the first slot.
pub fn time_slot(hour: u8) -> usize {
    let slot = hour as usize / 3;
    if slot < TIME_SLOTS.len() { slot } else { 0 }
}

fn weekday_index(trade: &TradeRecord) -> usize {
    let day = trade.weekday() as usize;
    if day < WEEKDAYS.len() { day } else { 0 }
}

/// Average pnl per instrument and time slot over the default instrument rows.
pub fn compute_pair_time_heatmap(trades: &[TradeRecord]) -> Vec<HeatmapCell> {
    let rows: Vec<String> = DEFAULT_INSTRUMENTS.iter().map(|s| s.to_string()).collect();
    pair_time_heatmap(trades, &rows)
}

/// Average pnl per instrument and time slot.
///
/// `rows` fixes the display order. Trades without an instrument count toward
/// the first row; instruments missing from `rows` get extra rows appended in
/// first-seen order so no trade is dropped.
pub fn pair_time_heatmap(trades: &[TradeRecord], rows: &[String]) -> Vec<HeatmapCell> {
    let mut rows: Vec<String> = rows.to_vec();
    if rows.is_empty() {
        rows = DEFAULT_INSTRUMENTS.iter().map(|s| s.to_string()).collect();
    }
    let mut grid: Vec<[Bucket; 8]> = vec![[Bucket::default(); 8]; rows.len()];

    for trade in trades {
        let row = if trade.instrument.is_empty() {
            0
        } else {
            let name = trade.instrument.as_str().trim();
            match rows.iter().position(|r| r == name) {
                Some(idx) => idx,
                None => {
                    rows.push(name.to_string());
                    grid.push([Bucket::default(); 8]);
                    rows.len() - 1
                }
            }
        };
        grid[row][time_slot(trade.hour())].add(trade);
    }

    rows.iter()
        .zip(&grid)
        .flat_map(|(row, buckets)| {
            TIME_SLOTS.iter().zip(buckets).map(move |(col, bucket)| {
                HeatmapCell::from_bucket(row, col, bucket, Bucket::normalized_avg_pnl)
            })
        })
        .collect()
}

/// Win rate per weekday and time slot. Unknown weekdays count as Sunday.
pub fn compute_day_time_heatmap(trades: &[TradeRecord]) -> Vec<HeatmapCell> {
    let mut grid = [[Bucket::default(); 8]; 7];
    for trade in trades {
        grid[weekday_index(trade)][time_slot(trade.hour())].add(trade);
    }

    WEEKDAYS
        .iter()
        .zip(&grid)
        .flat_map(|(day, buckets)| {
            TIME_SLOTS
                .iter()
                .zip(buckets)
                .map(move |(col, bucket)| HeatmapCell::from_bucket(day, col, bucket, Bucket::winrate))
        })
        .collect()
}
