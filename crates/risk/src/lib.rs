// In crates/risk/src/lib.rs

//! Account-level risk views over a trade history: the equity curve with its
//! running drawdown, and how likely losing streaks of a given length are.

pub mod profile;

pub use profile::{
    EquityPoint, LossStreakProbability, RiskProfile, equity_curve,
    longest_loss_streak, loss_rate, loss_streak_probabilities, max_daily_drawdown_percent,
};
