// In crates/core-types/src/pricing.rs

//! Price-derived trade figures: pips, reward/risk, and cost breakdowns.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal_macros::dec;
use serde::Serialize;

use crate::types::{Side, Symbol};

fn pip_multiplier(instrument: &Symbol) -> Decimal {
    if instrument.is_jpy_cross() {
        dec!(100)
    } else {
        dec!(10000)
    }
}

fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

/// Signed pip distance between entry and exit, rounded to one decimal.
pub fn pips_from_prices(instrument: &Symbol, side: Side, open: f64, close: f64) -> f64 {
    let (open, close) = (to_decimal(open), to_decimal(close));
    let diff = match side {
        Side::Long => close - open,
        Side::Short => open - close,
    };
    (diff * pip_multiplier(instrument))
        .round_dp(1)
        .to_f64()
        .unwrap_or(0.0)
}

/// Planned reward/risk from the stop and target distances, rounded to two decimals.
///
/// Returns `None` when the stop sits on the entry price.
pub fn reward_risk_ratio(instrument: &Symbol, open: f64, stop: f64, target: f64) -> Option<f64> {
    let mult = pip_multiplier(instrument);
    let open = to_decimal(open);
    let risk_pips = ((open - to_decimal(stop)) * mult).abs();
    let reward_pips = ((to_decimal(target) - open) * mult).abs();
    if risk_pips.is_zero() {
        return None;
    }
    (reward_pips / risk_pips).round_dp(2).to_f64()
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CostBreakdown {
    pub gross: f64,
    /// Gross after swap and commission, rounded to whole currency units.
    pub net: f64,
    /// Positive when costs outweigh swap income.
    pub cost: f64,
}

pub fn cost_breakdown(gross: f64, commission: Option<f64>, swap: Option<f64>) -> CostBreakdown {
    let gross_d = to_decimal(gross);
    let commission = to_decimal(commission.unwrap_or(0.0));
    let swap = to_decimal(swap.unwrap_or(0.0));
    let whole = |v: Decimal| {
        v.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .to_f64()
            .unwrap_or(0.0)
    };
    CostBreakdown {
        gross,
        net: whole(gross_d + swap - commission),
        cost: whole(commission - swap),
    }
}
