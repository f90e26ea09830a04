// In crates/analytics/src/drawdown.rs

//! Peak tracking shared by the metrics aggregator and the risk profiler.
//!
//! Internally a drawdown is always a non-negative magnitude (`peak - value`).
//! Callers that report drawdown as a signed loss apply the sign themselves.

/// Running high-water mark over a sequence of equity values.
#[derive(Debug, Clone, Copy)]
pub struct PeakTracker {
    peak: f64,
}

impl PeakTracker {
    /// Starts from a known baseline such as the initial account balance.
    pub fn anchored(start: f64) -> Self {
        Self { peak: start }
    }

    /// Starts with no peak; the first observation becomes the peak.
    pub fn unanchored() -> Self {
        Self {
            peak: f64::NEG_INFINITY,
        }
    }

    pub fn peak(&self) -> f64 {
        self.peak
    }

    /// Records `value` and returns how far it sits below the running peak.
    pub fn observe(&mut self, value: f64) -> f64 {
        self.peak = self.peak.max(value);
        self.peak - value
    }
}

/// Largest peak-to-trough decline in `series`, as a magnitude `>= 0`.
pub fn drawdown_magnitude(series: &[f64]) -> f64 {
    let mut tracker = PeakTracker::unanchored();
    series
        .iter()
        .fold(0.0_f64, |worst, &value| worst.max(tracker.observe(value)))
}

/// Largest peak-to-trough decline in `series`, as a signed value `<= 0`.
///
/// Returns `0.0` for an empty or never-declining series.
pub fn max_drawdown(series: &[f64]) -> f64 {
    0.0 - drawdown_magnitude(series)
}
