// In crates/analytics/src/metrics.rs

//! Single-pass trade aggregation.

use core_types::TradeRecord;

use crate::drawdown::max_drawdown;
use crate::types::{DdBasis, Metrics, MetricsSummary, ProfitFactor};

#[derive(Default)]
struct Accumulator {
    wins: usize,
    gross_profit: f64,
    gross_loss: f64,
    pips_sum: f64,
    running: f64,
    equity: Vec<f64>,
    pnls: Vec<f64>,
    pips: Vec<f64>,
}

impl Accumulator {
    fn with_capacity(n: usize) -> Self {
        Self {
            equity: Vec::with_capacity(n),
            pnls: Vec::with_capacity(n),
            pips: Vec::with_capacity(n),
            ..Default::default()
        }
    }

    fn push(&mut self, pnl: f64, pips: f64, win: bool) {
        if win {
            self.wins += 1;
        }
        if pnl > 0.0 {
            self.gross_profit += pnl;
        } else {
            self.gross_loss += pnl;
        }
        self.pips_sum += pips;
        self.running += pnl;
        self.equity.push(self.running);
        self.pnls.push(pnl);
        self.pips.push(pips);
    }

    fn finish(self) -> Metrics {
        let trades = self.pnls.len();
        let winrate = if trades > 0 {
            self.wins as f64 / trades as f64
        } else {
            0.0
        };
        let max_drawdown = max_drawdown(&self.equity);
        Metrics {
            trades,
            wins: self.wins,
            winrate,
            gross_profit: self.gross_profit,
            gross_loss: self.gross_loss,
            profit_factor: ProfitFactor::from_gross(self.gross_profit, self.gross_loss),
            pips_sum: self.pips_sum,
            equity_series: self.equity,
            max_drawdown,
            pnls: self.pnls,
            pips: self.pips,
        }
    }
}

/// Aggregates a chronologically ordered trade list.
///
/// Returns `None` for an empty list. Wins honour an explicit win flag when the
/// record carries one.
pub fn compute(trades: &[TradeRecord]) -> Option<Metrics> {
    if trades.is_empty() {
        return None;
    }
    let mut acc = Accumulator::with_capacity(trades.len());
    for trade in trades {
        acc.push(trade.pnl, trade.pips_or_zero(), trade.is_win());
    }
    Some(acc.finish())
}

/// Same aggregation as [`compute`], straight from parallel pnl/pips arrays.
///
/// A trade wins when its pnl is positive. Missing pips entries count as zero.
pub fn recompute_from_pnls(pnls: &[f64], pips: &[f64]) -> Metrics {
    let mut acc = Accumulator::with_capacity(pnls.len());
    for (i, &pnl) in pnls.iter().enumerate() {
        acc.push(pnl, pips.get(i).copied().unwrap_or(0.0), pnl > 0.0);
    }
    acc.finish()
}

/// The risk unit R: median absolute size of the losing trades, or `1.0` without losses.
pub fn estimate_risk_unit(pnls: &[f64]) -> f64 {
    let mut losses: Vec<f64> = pnls.iter().filter(|&&p| p < 0.0).map(|p| p.abs()).collect();
    if losses.is_empty() {
        return 1.0;
    }
    losses.sort_by(|a, b| a.total_cmp(b));

    let mid = losses.len() / 2;
    let median = if losses.len() % 2 == 1 {
        losses[mid]
    } else {
        (losses[mid - 1] + losses[mid]) / 2.0
    };
    if median > 0.0 { median } else { 1.0 }
}

/// Drawdown as a signed percentage of the chosen basis.
///
/// `pnls` supplies the risk unit for [`DdBasis::R`]. A non-positive capital is
/// degenerate: no drawdown reads as `0`, any drawdown as `-inf`.
pub fn dd_percent(max_drawdown: f64, basis: DdBasis, initial_capital: f64, pnls: &[f64]) -> f64 {
    let magnitude = max_drawdown.abs();
    let denominator = match basis {
        DdBasis::Capital => initial_capital,
        DdBasis::R => estimate_risk_unit(pnls),
    };
    if denominator > 0.0 && denominator.is_finite() {
        return -magnitude / denominator * 100.0;
    }

    tracing::warn!(initial_capital, "Drawdown basis is not positive");
    if magnitude == 0.0 {
        0.0
    } else {
        f64::NEG_INFINITY
    }
}

impl Metrics {
    pub fn dd_percent(&self, basis: DdBasis, initial_capital: f64) -> f64 {
        dd_percent(self.max_drawdown, basis, initial_capital, &self.pnls)
    }

    pub fn risk_unit(&self) -> f64 {
        estimate_risk_unit(&self.pnls)
    }

    pub fn net_pnl(&self) -> f64 {
        self.equity_series.last().copied().unwrap_or(0.0)
    }

    pub fn summary(&self, basis: DdBasis, initial_capital: f64) -> MetricsSummary {
        MetricsSummary {
            trades: self.trades,
            winrate: self.winrate,
            profit_factor: self.profit_factor,
            pips_sum: self.pips_sum,
            max_drawdown: self.max_drawdown,
            dd_percent: self.dd_percent(basis, initial_capital),
        }
    }
}
