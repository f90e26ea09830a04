// In crates/analytics/src/execution.rs

//! Planned reward/risk and trading-cost totals, for exports that carry stop,
//! target, commission or swap columns.

use core_types::TradeRecord;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ExecutionSummary {
    /// Trades with entry, stop and target all present.
    pub planned_trades: usize,
    pub avg_planned_rr: Option<f64>,
    /// Trades with a commission or swap value.
    pub costed_trades: usize,
    pub gross_pnl: f64,
    /// Gross with swap and commission applied to the costed trades.
    pub net_pnl: f64,
    pub total_cost: f64,
}

pub fn summarize(trades: &[TradeRecord]) -> ExecutionSummary {
    let planned: Vec<f64> = trades.iter().filter_map(TradeRecord::planned_reward_risk).collect();
    let avg_planned_rr = (!planned.is_empty()).then(|| planned.iter().sum::<f64>() / planned.len() as f64);

    let gross_pnl: f64 = trades.iter().map(|t| t.pnl).sum();
    let mut net_pnl = 0.0;
    let mut total_cost = 0.0;
    let mut costed_trades = 0;
    for trade in trades {
        match trade.costs() {
            Some(costs) => {
                costed_trades += 1;
                net_pnl += costs.net;
                total_cost += costs.cost;
            }
            None => net_pnl += trade.pnl,
        }
    }

    ExecutionSummary {
        planned_trades: planned.len(),
        avg_planned_rr,
        costed_trades,
        gross_pnl,
        net_pnl,
        total_cost,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn planned(pnl: f64, stop: f64, target: f64) -> TradeRecord {
        let mut t = TradeRecord::new(pnl).with_instrument("EUR/USD");
        t.open_price = Some(1.1000);
        t.stop_price = Some(stop);
        t.target_price = Some(target);
        t
    }

    #[test]
    fn averages_planned_reward_risk() {
        let trades = vec![
            planned(100.0, 1.0980, 1.1030),
            planned(-50.0, 1.0990, 1.1025),
            TradeRecord::new(10.0),
        ];
        let summary = summarize(&trades);
        assert_eq!(summary.planned_trades, 2);
        assert_eq!(summary.avg_planned_rr, Some(2.0));
        assert_eq!(summary.costed_trades, 0);
        assert_eq!(summary.net_pnl, summary.gross_pnl);
    }

    #[test]
    fn costs_reduce_net() {
        let mut costed = TradeRecord::new(1000.0);
        costed.commission = Some(120.0);
        costed.swap = Some(-30.4);
        let summary = summarize(&[costed, TradeRecord::new(-200.0)]);
        assert_eq!(summary.gross_pnl, 800.0);
        assert_eq!(summary.net_pnl, 650.0);
        assert_eq!(summary.total_cost, 150.0);
        assert_eq!(summary.costed_trades, 1);
        assert_eq!(summary.avg_planned_rr, None);
    }
}
