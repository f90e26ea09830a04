// In crates/analytics/src/optimizer.rs

use rayon::prelude::*;
use serde::Serialize;

use crate::scenario::{ScenarioParams, simulate};
use crate::types::{DdBasis, Metrics, ProfitFactor};

/// TP/SL ratios searched by the recommender, in evaluation order.
pub const RATIO_CANDIDATES: [f64; 6] = [1.0, 1.2, 1.4, 1.6, 1.8, 2.0];

/// Candidates must keep drawdown strictly above this percentage.
pub const MAX_DD_PERCENT: f64 = -12.0;

/// How far the simulated winrate may fall below the base winrate.
pub const WINRATE_TOLERANCE: f64 = 0.03;

/// One grid point of the TP/SL search.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CandidateResult {
    pub ratio: f64,
    pub profit_factor: ProfitFactor,
    pub winrate: f64,
    pub dd_percent: f64,
    pub dd_ok: bool,
    pub winrate_ok: bool,
}

impl CandidateResult {
    pub fn accepted(&self) -> bool {
        self.dd_ok && self.winrate_ok
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Recommendation {
    pub ratio: f64,
    pub profit_factor: ProfitFactor,
    pub winrate: f64,
    pub dd_percent: f64,
}

impl Recommendation {
    /// The scenario settings that reproduce this recommendation.
    pub fn params(&self) -> ScenarioParams {
        candidate_params(self.ratio)
    }
}

fn candidate_params(ratio: f64) -> ScenarioParams {
    ScenarioParams {
        ratio,
        trailing: true,
        break_even: false,
    }
}

/// Runs every candidate ratio through the scenario simulator.
///
/// Results come back in [`RATIO_CANDIDATES`] order regardless of how the
/// parallel evaluation was scheduled.
pub fn evaluate_candidates(
    base: &Metrics,
    basis: DdBasis,
    initial_capital: f64,
) -> Vec<CandidateResult> {
    let min_winrate = (base.winrate - WINRATE_TOLERANCE).max(0.0);

    RATIO_CANDIDATES
        .par_iter()
        .map(|&ratio| {
            let outcome = simulate(base, &candidate_params(ratio));
            let m = &outcome.metrics;
            let dd_percent = m.dd_percent(basis, initial_capital);
            let result = CandidateResult {
                ratio,
                profit_factor: m.profit_factor,
                winrate: m.winrate,
                dd_percent,
                dd_ok: dd_percent > MAX_DD_PERCENT,
                winrate_ok: m.winrate >= min_winrate,
            };
            tracing::debug!(
                ratio,
                profit_factor = %result.profit_factor,
                winrate = result.winrate,
                dd_percent,
                accepted = result.accepted(),
                "Evaluated TP/SL candidate"
            );
            result
        })
        .collect()
}

/// Picks the accepted candidate with the highest profit factor.
///
/// Ties keep the earliest (smallest) ratio. Returns `None` when no candidate
/// passes both the drawdown and the winrate constraint.
pub fn recommend(base: &Metrics, basis: DdBasis, initial_capital: f64) -> Option<Recommendation> {
    let best = evaluate_candidates(base, basis, initial_capital)
        .into_iter()
        .filter(CandidateResult::accepted)
        .fold(None::<CandidateResult>, |best, candidate| match best {
            Some(b) if !(candidate.profit_factor > b.profit_factor) => Some(b),
            _ => Some(candidate),
        })?;

    tracing::info!(
        ratio = best.ratio,
        profit_factor = %best.profit_factor,
        "Recommended TP/SL ratio"
    );
    Some(Recommendation {
        ratio: best.ratio,
        profit_factor: best.profit_factor,
        winrate: best.winrate,
        dd_percent: best.dd_percent,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::recompute_from_pnls;

    #[test]
    fn candidates_come_back_in_grid_order() {
        let base = recompute_from_pnls(&[900.0, -300.0, 450.0, -300.0, 1200.0], &[]);
        let results = evaluate_candidates(&base, DdBasis::Capital, 1_000_000.0);
        let ratios: Vec<f64> = results.iter().map(|c| c.ratio).collect();
        assert_eq!(ratios, RATIO_CANDIDATES.to_vec());
    }

    #[test]
    fn picks_highest_profit_factor_among_accepted() {
        // R = 300; larger ratios keep more of the big winners.
        let base = recompute_from_pnls(&[900.0, -300.0, 450.0, -300.0, 1200.0], &[]);
        let rec = recommend(&base, DdBasis::Capital, 1_000_000.0).unwrap();
        assert_eq!(rec.ratio, 2.0);
        // TP = 2.0 * 300 * 1.05 = 630 on every winner.
        let expected = (630.0 + 450.0 + 630.0) / 600.0;
        assert!((rec.profit_factor.capped(0.0) - expected).abs() < 1e-9);
        assert!(rec.dd_percent > MAX_DD_PERCENT);
        assert_eq!(rec.params().ratio, 2.0);
        assert!(rec.params().trailing);
        assert!(!rec.params().break_even);
    }

    #[test]
    fn ties_keep_the_first_candidate() {
        // Winners all below the smallest take-profit: every ratio gives the same result.
        let base = recompute_from_pnls(&[100.0, -1000.0, 200.0, 150.0], &[]);
        let rec = recommend(&base, DdBasis::Capital, 1_000_000.0).unwrap();
        assert_eq!(rec.ratio, 1.0);
    }

    #[test]
    fn unbounded_profit_factor_wins_ties_to_first() {
        let base = recompute_from_pnls(&[100.0, 50.0], &[]);
        let rec = recommend(&base, DdBasis::Capital, 10_000.0).unwrap();
        assert_eq!(rec.profit_factor, ProfitFactor::Unbounded);
        assert_eq!(rec.ratio, 1.0);
    }

    #[test]
    fn rejects_when_drawdown_is_too_deep() {
        // A 5,000 loss on 10,000 capital is -50% at every ratio.
        let base = recompute_from_pnls(&[1000.0, -5000.0, 800.0], &[]);
        let results = evaluate_candidates(&base, DdBasis::Capital, 10_000.0);
        assert!(results.iter().all(|c| !c.dd_ok));
        assert!(recommend(&base, DdBasis::Capital, 10_000.0).is_none());
    }

    #[test]
    fn r_basis_measures_drawdown_in_risk_units() {
        // Two consecutive full-R losses are -200% of R.
        let base = recompute_from_pnls(&[300.0, -100.0, -100.0, 500.0], &[]);
        assert!(recommend(&base, DdBasis::R, 1_000_000.0).is_none());
        assert!(recommend(&base, DdBasis::Capital, 1_000_000.0).is_some());
    }
}
