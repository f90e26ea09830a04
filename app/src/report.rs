// In app/src/report.rs

use analytics::execution::{self, ExecutionSummary};
use analytics::heatmap::{HeatmapCell, compute_day_time_heatmap, pair_time_heatmap};
use analytics::optimizer::CandidateResult;
use analytics::{AnalyticsEngine, Evaluation};
use core_types::TradeRecord;
use risk::RiskProfile;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct Heatmaps {
    pub pair_time: Vec<HeatmapCell>,
    pub day_time: Vec<HeatmapCell>,
}

impl Heatmaps {
    /// `instruments` fixes the row order of the pair heatmap.
    pub fn build(trades: &[TradeRecord], instruments: &[String]) -> Self {
        Self {
            pair_time: pair_time_heatmap(trades, instruments),
            day_time: compute_day_time_heatmap(trades),
        }
    }
}

/// The complete journal output for one trade list.
#[derive(Debug, Serialize)]
pub struct JournalReport {
    pub evaluation: Evaluation,
    pub candidates: Vec<CandidateResult>,
    pub risk: RiskProfile,
    pub execution: ExecutionSummary,
    pub heatmaps: Heatmaps,
}

/// Builds the full report, or `None` when there are no trades to evaluate.
///
/// The equity curve starts from the engine's initial capital, the same figure
/// that capital-basis drawdown percentages divide by.
pub fn build_report(engine: &AnalyticsEngine, trades: &[TradeRecord], instruments: &[String]) -> Option<JournalReport> {
    if trades.is_empty() {
        return None;
    }
    let risk = RiskProfile::from_trades(trades, engine.initial_capital());
    let evaluation = engine.evaluate(trades, risk.max_daily_drawdown_percent)?;

    Some(JournalReport {
        candidates: engine.candidates(&evaluation.metrics),
        evaluation,
        risk,
        execution: execution::summarize(trades),
        heatmaps: Heatmaps::build(trades, instruments),
    })
}

/// Helper function to print a human-readable summary of a report.
pub fn print_summary(report: &JournalReport) {
    let eval = &report.evaluation;
    let m = &eval.metrics;

    println!("\n--- Trade Journal Report ---");
    println!("----------------------------");
    println!(
        "Trades: {} | Win rate: {:.1}% | PF: {:.2} | Pips: {:.1} | Max DD: {:.2} ({:.2}%)",
        m.trades,
        m.winrate * 100.0,
        m.profit_factor,
        m.pips_sum,
        m.max_drawdown,
        eval.dd_percent
    );
    println!("Score: {:.1} [{}] {}", eval.score.overall, eval.score.rank, eval.score.rank.description());
    for (label, value) in eval.score.parts.labelled() {
        println!("  - {label}: {value:.1}");
    }

    println!("----------------------------");
    match &eval.recommendation {
        Some(rec) => println!(
            "Recommendation: TP/SL ratio {:.1} (PF {:.2}, win rate {:.1}%, DD {:.2}%)",
            rec.ratio,
            rec.profit_factor,
            rec.winrate * 100.0,
            rec.dd_percent
        ),
        None => println!("Recommendation: No ratio passed the drawdown and win-rate limits."),
    }

    println!(
        "Equity: {:.0} -> {:.0} | Longest losing streak: {}",
        report.risk.initial_capital, report.risk.final_equity, report.risk.longest_loss_streak
    );
    let exec = &report.execution;
    if let Some(rr) = exec.avg_planned_rr {
        println!("Planned R:R: {:.2} over {} trades", rr, exec.planned_trades);
    }
    if exec.costed_trades > 0 {
        println!(
            "Gross: {:.0} | Net: {:.0} | Costs: {:.0}",
            exec.gross_pnl, exec.net_pnl, exec.total_cost
        );
    }
    for alert in &eval.alerts {
        println!("[{:?}] {}", alert.severity, alert.message);
    }
    for action in eval.actions.iter().take(3) {
        println!("  * {} ({})", action.action, action.expected_improvement);
    }
    println!("----------------------------");
}

#[cfg(test)]
mod tests {
    use super::*;
    use analytics::DdBasis;
    use chrono::{TimeZone, Utc};

    fn instruments() -> Vec<String> {
        analytics::heatmap::DEFAULT_INSTRUMENTS.iter().map(|s| s.to_string()).collect()
    }

    fn at(hour: u32, pnl: f64) -> TradeRecord {
        TradeRecord::new(pnl)
            .with_instrument("USD/JPY")
            .with_timestamp(Utc.with_ymd_and_hms(2024, 5, 6, hour, 0, 0).unwrap())
    }

    #[test]
    fn report_covers_every_section() {
        let engine = AnalyticsEngine::new(DdBasis::Capital, 1_000_000.0);
        let mut costed = at(3, 50_000.0);
        costed.commission = Some(500.0);
        let trades = vec![at(1, 200_000.0), at(2, -90_000.0), costed];

        let report = build_report(&engine, &trades, &instruments()).unwrap();
        assert_eq!(report.evaluation.metrics.trades, 3);
        assert_eq!(report.candidates.len(), 6);
        assert_eq!(report.risk.curve.len(), 3);
        assert_eq!(report.execution.costed_trades, 1);
        assert_eq!(report.execution.total_cost, 500.0);
        assert_eq!(report.heatmaps.pair_time.len(), 5 * 8);
        assert_eq!(report.heatmaps.day_time.len(), 7 * 8);

        // A 90,000 giveback on a day opened at 1,000,000 is a 9% daily drawdown.
        assert!(report.evaluation.alerts.iter().any(|a| a.message == "Daily drawdown exceeded -9.0%"));

        assert!(build_report(&engine, &[], &instruments()).is_none());
    }

    #[test]
    fn drawdown_percent_and_equity_share_one_capital() {
        let engine = AnalyticsEngine::new(DdBasis::Capital, 100_000.0);
        let trades = vec![at(1, 1_000.0), at(2, -500.0), at(3, 2_000.0)];

        let report = build_report(&engine, &trades, &instruments()).unwrap();
        assert_eq!(report.risk.initial_capital, 100_000.0);
        assert_eq!(report.risk.final_equity, 102_500.0);
        assert_eq!(report.risk.max_drawdown, 500.0);
        // -500 against the same 100,000 baseline.
        assert_eq!(report.evaluation.dd_percent, -0.5);
    }
}
