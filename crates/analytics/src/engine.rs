// In crates/analytics/src/engine.rs

use core_types::TradeRecord;
use serde::Serialize;

use crate::advice::{self, Action, Alert};
use crate::metrics;
use crate::optimizer::{self, CandidateResult, Recommendation};
use crate::scenario::{self, ScenarioComparison, ScenarioParams};
use crate::score::{self, OverallScore};
use crate::types::{DdBasis, Metrics};

/// Everything the evaluation page shows for one trade list.
#[derive(Debug, Clone, Serialize)]
pub struct Evaluation {
    pub metrics: Metrics,
    pub dd_percent: f64,
    pub risk_unit: f64,
    pub score: OverallScore,
    pub recommendation: Option<Recommendation>,
    pub alerts: Vec<Alert>,
    pub actions: Vec<Action>,
}

/// The engine responsible for evaluating trade lists under one drawdown basis.
#[derive(Debug, Clone, Copy)]
pub struct AnalyticsEngine {
    dd_basis: DdBasis,
    initial_capital: f64,
}

impl AnalyticsEngine {
    pub fn new(dd_basis: DdBasis, initial_capital: f64) -> Self {
        Self {
            dd_basis,
            initial_capital,
        }
    }

    pub fn dd_basis(&self) -> DdBasis {
        self.dd_basis
    }

    pub fn initial_capital(&self) -> f64 {
        self.initial_capital
    }

    /// Full evaluation, or `None` when there are no trades.
    ///
    /// `max_daily_dd_percent` is the worst single-day drawdown (positive percent)
    /// when the caller tracks calendar days; it feeds the daily-drawdown alert.
    pub fn evaluate(&self, trades: &[TradeRecord], max_daily_dd_percent: Option<f64>) -> Option<Evaluation> {
        let metrics = metrics::compute(trades)?;
        let dd_percent = metrics.dd_percent(self.dd_basis, self.initial_capital);
        let score = score::score(&metrics, self.dd_basis, self.initial_capital);
        let recommendation = optimizer::recommend(&metrics, self.dd_basis, self.initial_capital);

        tracing::info!(
            trades = metrics.trades,
            winrate = metrics.winrate,
            profit_factor = %metrics.profit_factor,
            overall = score.overall,
            rank = %score.rank,
            "Evaluated trade history"
        );

        Some(Evaluation {
            dd_percent,
            risk_unit: metrics.risk_unit(),
            score,
            recommendation,
            alerts: advice::alerts(&metrics, max_daily_dd_percent),
            actions: advice::improvement_actions(&metrics, dd_percent),
            metrics,
        })
    }

    pub fn what_if(&self, base: &Metrics, params: &ScenarioParams) -> ScenarioComparison {
        scenario::compare(base, params, self.dd_basis, self.initial_capital)
    }

    pub fn candidates(&self, base: &Metrics) -> Vec<CandidateResult> {
        optimizer::evaluate_candidates(base, self.dd_basis, self.initial_capital)
    }

    pub fn recommend(&self, base: &Metrics) -> Option<Recommendation> {
        optimizer::recommend(base, self.dd_basis, self.initial_capital)
    }
}
