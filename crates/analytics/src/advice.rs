// In crates/analytics/src/advice.rs

//! Rule-based alerts and improvement suggestions derived from metrics.

use serde::Serialize;

use crate::types::{Metrics, ProfitFactor};

/// Daily drawdown (percent of capital) above which a danger alert is raised.
pub const DAILY_DD_ALERT_PERCENT: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Danger,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Alert {
    pub severity: Severity,
    pub message: String,
}

/// `max_daily_dd_percent` is the worst single-day drawdown as a positive
/// percentage, when the caller tracks one.
pub fn alerts(metrics: &Metrics, max_daily_dd_percent: Option<f64>) -> Vec<Alert> {
    let mut alerts = Vec::new();

    if let Some(daily) = max_daily_dd_percent.filter(|d| *d > DAILY_DD_ALERT_PERCENT) {
        alerts.push(Alert {
            severity: Severity::Danger,
            message: format!("Daily drawdown exceeded -{daily:.1}%"),
        });
    }
    if metrics.profit_factor < ProfitFactor::Finite(1.0) {
        alerts.push(Alert {
            severity: Severity::Danger,
            message: "Profit factor is below 1.0; the strategy needs review.".to_string(),
        });
    }
    if metrics.winrate < 0.4 {
        alerts.push(Alert {
            severity: Severity::Warning,
            message: "Win rate is below 40%; review entry conditions.".to_string(),
        });
    }

    alerts
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Difficulty {
    Low,
    Mid,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Action {
    pub action: &'static str,
    pub expected_improvement: &'static str,
    pub difficulty: Difficulty,
    /// Higher comes first.
    pub priority: u8,
    pub reason: &'static str,
}

/// Suggested changes, highest priority first.
///
/// `dd_percent` is the signed drawdown percentage on the caller's basis.
pub fn improvement_actions(metrics: &Metrics, dd_percent: f64) -> Vec<Action> {
    let mut actions = Vec::new();

    if metrics.profit_factor < ProfitFactor::Finite(1.5) {
        actions.push(Action {
            action: "Adjust the TP/SL ratio to 1.6",
            expected_improvement: "PF +0.3",
            difficulty: Difficulty::Low,
            priority: 9,
            reason: "Profit factor is low; letting winners run further should lift it.",
        });
    }
    if dd_percent < -15.0 {
        actions.push(Action {
            action: "Limit 1R to 1.5% of starting capital",
            expected_improvement: "DD -3%",
            difficulty: Difficulty::Mid,
            priority: 8,
            reason: "Maximum drawdown is large; position size needs review.",
        });
    }
    if metrics.winrate < 0.5 {
        actions.push(Action {
            action: "Introduce a time-of-day filter",
            expected_improvement: "Win rate +5%",
            difficulty: Difficulty::Low,
            priority: 7,
            reason: "Win rate is low; avoiding weak sessions can raise it.",
        });
    }
    actions.push(Action {
        action: "Enforce stop-losses strictly",
        expected_improvement: "PF +0.15",
        difficulty: Difficulty::Mid,
        priority: 6,
        reason: "Average losses tend to run large; tighter stop discipline helps.",
    });
    actions.push(Action {
        action: "Take a day off after three straight losses",
        expected_improvement: "Better discipline",
        difficulty: Difficulty::High,
        priority: 5,
        reason: "Revenge trading after losing streaks tends to deepen losses.",
    });

    actions.sort_by(|a, b| b.priority.cmp(&a.priority));
    actions
}
