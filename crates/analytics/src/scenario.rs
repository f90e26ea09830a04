// In crates/analytics/src/scenario.rs

//! "What-if" re-pricing of closed trades under a hypothetical TP/SL rule.
//!
//! This is a retroactive approximation. Each historical pnl is clamped to the
//! simulated take-profit and stop-loss distances; intraday price paths are not
//! replayed. A trade that would have hit the stop before running to its recorded
//! profit is therefore still counted as a (capped) winner.

use serde::{Deserialize, Serialize};

use crate::metrics::{estimate_risk_unit, recompute_from_pnls};
use crate::types::{DdBasis, Metrics, MetricsSummary};

/// Take-profit multiplier applied when a trailing stop is simulated.
pub const TRAILING_TP_FACTOR: f64 = 1.05;
/// Stop-loss multiplier applied when a break-even rule is simulated.
pub const BREAK_EVEN_SL_FACTOR: f64 = 0.95;
/// Results within this fraction of R are snapped to zero under break-even.
pub const BREAK_EVEN_SNAP_FRACTION: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioParams {
    /// Take-profit distance in multiples of R.
    pub ratio: f64,
    pub trailing: bool,
    pub break_even: bool,
}

impl Default for ScenarioParams {
    fn default() -> Self {
        Self {
            ratio: 1.6,
            trailing: true,
            break_even: false,
        }
    }
}

/// Re-priced pnl/pips arrays plus the distances that produced them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RepricedTrades {
    pub pnls: Vec<f64>,
    pub pips: Vec<f64>,
    pub risk_unit: f64,
    pub take_profit: f64,
    pub stop_loss: f64,
}

/// Clamps every outcome into `[-stop_loss, take_profit]` derived from R.
///
/// Pips are rescaled by the same factor as their pnl. Negative or NaN ratios
/// are treated as zero.
pub fn apply_tp_sl(pnls: &[f64], pips: &[f64], params: &ScenarioParams) -> RepricedTrades {
    let risk_unit = estimate_risk_unit(pnls);
    let ratio = params.ratio.max(0.0);
    let take_profit =
        ratio * risk_unit * if params.trailing { TRAILING_TP_FACTOR } else { 1.0 };
    let stop_loss = risk_unit * if params.break_even { BREAK_EVEN_SL_FACTOR } else { 1.0 };
    let snap = BREAK_EVEN_SNAP_FRACTION * risk_unit;

    let mut out_pnls = Vec::with_capacity(pnls.len());
    let mut out_pips = Vec::with_capacity(pnls.len());
    for (i, &original) in pnls.iter().enumerate() {
        let mut adjusted = if original > 0.0 {
            original.min(take_profit)
        } else if original < 0.0 {
            original.max(-stop_loss)
        } else {
            original
        };
        if params.break_even && adjusted.abs() < snap {
            adjusted = 0.0;
        }

        let pip = pips.get(i).copied().unwrap_or(0.0);
        out_pips.push(if original != 0.0 {
            pip * (adjusted / original)
        } else {
            0.0
        });
        out_pnls.push(adjusted);
    }

    RepricedTrades {
        pnls: out_pnls,
        pips: out_pips,
        risk_unit,
        take_profit,
        stop_loss,
    }
}

/// One scenario run: the re-priced trades and their aggregate statistics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioOutcome {
    pub params: ScenarioParams,
    pub repriced: RepricedTrades,
    pub metrics: Metrics,
}

pub fn simulate(base: &Metrics, params: &ScenarioParams) -> ScenarioOutcome {
    let repriced = apply_tp_sl(&base.pnls, &base.pips, params);
    let metrics = recompute_from_pnls(&repriced.pnls, &repriced.pips);
    ScenarioOutcome {
        params: *params,
        repriced,
        metrics,
    }
}

/// Base history next to a scenario, as displayed by the what-if panel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScenarioComparison {
    pub params: ScenarioParams,
    pub base: MetricsSummary,
    pub scenario: MetricsSummary,
}

impl ScenarioComparison {
    pub fn winrate_change(&self) -> f64 {
        self.scenario.winrate - self.base.winrate
    }

    /// Positive when the scenario's drawdown is shallower.
    pub fn dd_percent_change(&self) -> f64 {
        self.scenario.dd_percent - self.base.dd_percent
    }
}

pub fn compare(
    base: &Metrics,
    params: &ScenarioParams,
    basis: DdBasis,
    initial_capital: f64,
) -> ScenarioComparison {
    let outcome = simulate(base, params);
    ScenarioComparison {
        params: *params,
        base: base.summary(basis, initial_capital),
        scenario: outcome.metrics.summary(basis, initial_capital),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ProfitFactor;

    const PNLS: [f64; 5] = [500.0, -100.0, 80.0, -300.0, -200.0];

    #[test]
    fn clamps_to_risk_unit_multiples() {
        // Losses 100, 200, 300 give R = 200.
        let params = ScenarioParams {
            ratio: 1.5,
            trailing: false,
            break_even: false,
        };
        let out = apply_tp_sl(&PNLS, &[], &params);
        assert_eq!(out.risk_unit, 200.0);
        assert_eq!(out.take_profit, 300.0);
        assert_eq!(out.stop_loss, 200.0);
        assert_eq!(out.pnls, vec![300.0, -100.0, 80.0, -200.0, -200.0]);
    }

    #[test]
    fn trailing_and_break_even_adjust_distances() {
        let params = ScenarioParams {
            ratio: 1.0,
            trailing: true,
            break_even: true,
        };
        let out = apply_tp_sl(&[500.0, -300.0, -200.0, 15.0, -100.0], &[], &params);
        assert_eq!(out.risk_unit, 200.0);
        assert!((out.take_profit - 210.0).abs() < 1e-9);
        assert!((out.stop_loss - 190.0).abs() < 1e-9);
        // 15 is inside 0.1 R and snaps to break-even.
        assert!((out.pnls[0] - 210.0).abs() < 1e-9);
        assert!((out.pnls[1] + 190.0).abs() < 1e-9);
        assert_eq!(out.pnls[3], 0.0);
        assert_eq!(out.pnls[4], -100.0);
    }

    #[test]
    fn pips_scale_with_pnl() {
        let params = ScenarioParams {
            ratio: 1.0,
            trailing: false,
            break_even: false,
        };
        let out = apply_tp_sl(&[400.0, -200.0, 0.0], &[40.0, -20.0, 5.0], &params);
        assert_eq!(out.pnls, vec![200.0, -200.0, 0.0]);
        assert_eq!(out.pips, vec![20.0, -20.0, 0.0]);
    }

    #[test]
    fn simulate_recomputes_statistics() {
        let base = recompute_from_pnls(&[400.0, -200.0, 100.0], &[]);
        let outcome = simulate(
            &base,
            &ScenarioParams {
                ratio: 1.0,
                trailing: false,
                break_even: false,
            },
        );
        assert_eq!(outcome.metrics.pnls, vec![200.0, -200.0, 100.0]);
        assert_eq!(outcome.metrics.profit_factor, ProfitFactor::Finite(1.5));
    }

    #[test]
    fn comparison_reports_both_sides() {
        let base = recompute_from_pnls(&[400.0, -200.0, -400.0, 100.0], &[]);
        let cmp = compare(&base, &ScenarioParams::default(), DdBasis::Capital, 10_000.0);
        assert_eq!(cmp.base.trades, 4);
        assert_eq!(cmp.base.dd_percent, -6.0);
        // R = 300, so the -400 loss is cut to -300 and the drawdown shrinks.
        assert_eq!(cmp.scenario.dd_percent, -5.0);
        assert!((cmp.dd_percent_change() - 1.0).abs() < 1e-9);
        assert_eq!(cmp.winrate_change(), 0.0);
    }
}
