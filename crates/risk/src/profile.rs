// In crates/risk/src/profile.rs

use std::ops::RangeInclusive;

use analytics::drawdown::PeakTracker;
use chrono::NaiveDate;
use core_types::TradeRecord;
use serde::Serialize;

/// Streak lengths tabulated by [`loss_streak_probabilities`].
pub const STREAK_LENGTHS: RangeInclusive<u32> = 2..=8;

/// One point of the account balance series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EquityPoint {
    pub index: usize,
    pub equity: f64,
    pub peak: f64,
    /// `peak - equity`; always `>= 0`, unlike the signed drawdown in `analytics::Metrics`.
    pub drawdown: f64,
}

/// Running balance, high-water mark and drawdown after each trade.
///
/// The peak starts at `initial_capital`, so an account that only ever loses
/// still shows its drawdown from the opening balance.
pub fn equity_curve(trades: &[TradeRecord], initial_capital: f64) -> Vec<EquityPoint> {
    let mut tracker = PeakTracker::anchored(initial_capital);
    let mut equity = initial_capital;

    trades
        .iter()
        .enumerate()
        .map(|(index, trade)| {
            equity += trade.pnl;
            let drawdown = tracker.observe(equity);
            EquityPoint {
                index,
                equity,
                peak: tracker.peak(),
                drawdown,
            }
        })
        .collect()
}

/// Fraction of trades with negative pnl; `0` for an empty list.
pub fn loss_rate(trades: &[TradeRecord]) -> f64 {
    if trades.is_empty() {
        return 0.0;
    }
    trades.iter().filter(|t| t.is_loss()).count() as f64 / trades.len() as f64
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LossStreakProbability {
    pub n: u32,
    /// Percent.
    pub probability: f64,
}

/// Chance of `n` consecutive losses for each `n` in [`STREAK_LENGTHS`].
///
/// Treats trades as independent draws with the observed loss rate (`p^n`). This
/// is a rough guide, not a fitted model of streakiness.
pub fn loss_streak_probabilities(trades: &[TradeRecord]) -> Vec<LossStreakProbability> {
    let p = loss_rate(trades);
    STREAK_LENGTHS
        .map(|n| LossStreakProbability {
            n,
            probability: p.powi(n as i32) * 100.0,
        })
        .collect()
}

/// Longest run of consecutive losing trades in input order.
pub fn longest_loss_streak(trades: &[TradeRecord]) -> usize {
    let mut longest = 0;
    let mut current = 0;
    for trade in trades {
        if trade.is_loss() {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 0;
        }
    }
    longest
}

/// Worst intraday drawdown as a positive percentage of the balance at the
/// start of that day. `None` when no trade carries a timestamp.
pub fn max_daily_drawdown_percent(trades: &[TradeRecord], initial_capital: f64) -> Option<f64> {
    let mut balance = initial_capital;
    let mut day: Option<(NaiveDate, f64, PeakTracker)> = None;
    let mut worst: Option<f64> = None;

    for trade in trades {
        let Some(date) = trade.trade_date() else {
            balance += trade.pnl;
            continue;
        };
        if day.as_ref().is_none_or(|(current, _, _)| *current != date) {
            day = Some((date, balance, PeakTracker::anchored(balance)));
        }
        balance += trade.pnl;
        if let Some((_, opening, tracker)) = &mut day {
            let dd = tracker.observe(balance);
            if *opening > 0.0 {
                let pct = dd / *opening * 100.0;
                worst = Some(worst.map_or(pct, |w| w.max(pct)));
            }
        }
    }
    worst
}

/// Everything the risk panel shows for one trade list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskProfile {
    pub initial_capital: f64,
    pub curve: Vec<EquityPoint>,
    pub final_equity: f64,
    /// Deepest `peak - equity` on the curve; `>= 0`.
    pub max_drawdown: f64,
    pub loss_rate: f64,
    pub streak_probabilities: Vec<LossStreakProbability>,
    pub longest_loss_streak: usize,
    pub max_daily_drawdown_percent: Option<f64>,
}

impl RiskProfile {
    pub fn from_trades(trades: &[TradeRecord], initial_capital: f64) -> Self {
        let curve = equity_curve(trades, initial_capital);
        let final_equity = curve.last().map_or(initial_capital, |p| p.equity);
        let max_drawdown = curve.iter().map(|p| p.drawdown).fold(0.0, f64::max);

        tracing::debug!(
            trades = trades.len(),
            final_equity,
            max_drawdown,
            "Built risk profile"
        );

        Self {
            initial_capital,
            final_equity,
            max_drawdown,
            loss_rate: loss_rate(trades),
            streak_probabilities: loss_streak_probabilities(trades),
            longest_loss_streak: longest_loss_streak(trades),
            max_daily_drawdown_percent: max_daily_drawdown_percent(trades, initial_capital),
            curve,
        }
    }

    /// Probability (percent) of a losing streak of exactly `n` trades, if tabulated.
    pub fn streak_probability(&self, n: u32) -> Option<f64> {
        self.streak_probabilities
            .iter()
            .find(|s| s.n == n)
            .map(|s| s.probability)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn trades(pnls: &[f64]) -> Vec<TradeRecord> {
        pnls.iter().map(|&p| TradeRecord::new(p)).collect()
    }

    #[test]
    fn curve_tracks_peak_from_initial_capital() {
        let curve = equity_curve(&trades(&[-200.0, 500.0, -100.0]), 1_000.0);
        let points: Vec<(f64, f64, f64)> = curve.iter().map(|p| (p.equity, p.peak, p.drawdown)).collect();
        assert_eq!(
            points,
            vec![(800.0, 1_000.0, 200.0), (1_300.0, 1_300.0, 0.0), (1_200.0, 1_300.0, 100.0)]
        );
        assert_eq!(curve[2].index, 2);
    }

    #[test]
    fn streak_table_uses_independent_losses() {
        let list = trades(&[-1.0, 2.0, -3.0, 4.0]);
        let table = loss_streak_probabilities(&list);
        assert_eq!(table.len(), 7);
        assert_eq!(table[0].n, 2);
        assert!((table[0].probability - 25.0).abs() < 1e-12);
        assert!((table[6].probability - 0.5f64.powi(8) * 100.0).abs() < 1e-12);

        let empty = loss_streak_probabilities(&[]);
        assert!(empty.iter().all(|s| s.probability == 0.0));
    }

    #[test]
    fn breakeven_trade_resets_streak() {
        assert_eq!(longest_loss_streak(&trades(&[-1.0, -1.0, 0.0, -1.0, -1.0, -1.0, 5.0])), 3);
        assert_eq!(longest_loss_streak(&trades(&[1.0, 2.0])), 0);
        assert_eq!(longest_loss_streak(&[]), 0);
    }

    #[test]
    fn daily_drawdown_resets_each_day() {
        let at = |day: u32, hour: u32, pnl: f64| {
            TradeRecord::new(pnl).with_timestamp(Utc.with_ymd_and_hms(2024, 3, day, hour, 0, 0).unwrap())
        };
        let list = vec![
            at(4, 9, 1_000.0),
            at(4, 10, -3_000.0),
            at(5, 9, -500.0),
            at(5, 11, 200.0),
        ];
        // Day one: balance 10,000 peaks at 11,000 and falls to 8,000 = 30% of the opening balance.
        let worst = max_daily_drawdown_percent(&list, 10_000.0).unwrap();
        assert!((worst - 30.0).abs() < 1e-9);

        assert_eq!(max_daily_drawdown_percent(&trades(&[-5.0]), 10_000.0), None);
    }

    #[test]
    fn profile_summarises_curve() {
        let profile = RiskProfile::from_trades(&trades(&[-200.0, 500.0, -100.0, -50.0]), 1_000.0);
        assert_eq!(profile.final_equity, 1_150.0);
        assert_eq!(profile.max_drawdown, 200.0);
        assert_eq!(profile.longest_loss_streak, 2);
        assert_eq!(profile.loss_rate, 0.75);
        assert_eq!(profile.streak_probability(2), Some(56.25));
        assert_eq!(profile.streak_probability(9), None);

        let empty = RiskProfile::from_trades(&[], 1_000_000.0);
        assert_eq!(empty.final_equity, 1_000_000.0);
        assert!(empty.curve.is_empty());
    }
}
