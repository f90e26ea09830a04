// In crates/analytics/src/lib.rs

//! Trade performance analytics: aggregate metrics, drawdown, what-if TP/SL
//! re-pricing, parameter recommendation, scoring and time-bucketed heatmaps.
//!
//! Every function here is pure and recomputes from the trade list it is given.

pub mod advice;
pub mod drawdown;
pub mod engine;
pub mod error;
pub mod execution;
pub mod filter;
pub mod heatmap;
pub mod metrics;
pub mod optimizer;
pub mod scenario;
pub mod score;
pub mod types;

pub use engine::{AnalyticsEngine, Evaluation};
pub use error::{Error, Result};
pub use types::{DdBasis, Metrics, MetricsSummary, ProfitFactor};
