// In crates/app-config/src/types.rs

use analytics::DdBasis;
use analytics::heatmap::DEFAULT_INSTRUMENTS;
use analytics::scenario::ScenarioParams;
use core_types::FieldMapping;
use serde::Deserialize;

use crate::{Error, Result};

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct Settings {
    /// The application's general settings.
    pub app: AppSettings,
    pub analytics: AnalyticsSettings,
    pub heatmap: HeatmapSettings,
    /// Defaults for the what-if command.
    pub scenario: ScenarioParams,
    /// Which export column holds which trade field.
    pub mapping: FieldMapping,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct AppSettings {
    /// The environment the application is running in (e.g., "development", "production").
    pub environment: String,
    /// The log level for the application.
    pub log_level: String,
    /// Worker threads for the ratio grid search; `None` lets rayon decide.
    pub optimizer_cores: Option<usize>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            log_level: "info".to_string(),
            optimizer_cores: None,
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct AnalyticsSettings {
    pub dd_basis: DdBasis,
    /// Starting balance. It is both the capital-basis drawdown denominator and
    /// the opening point of the risk equity curve.
    pub initial_capital: f64,
}

impl Default for AnalyticsSettings {
    fn default() -> Self {
        Self {
            dd_basis: DdBasis::Capital,
            initial_capital: 1_000_000.0,
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct HeatmapSettings {
    /// Row order of the instrument heatmap.
    pub instruments: Vec<String>,
}

impl Default for HeatmapSettings {
    fn default() -> Self {
        Self {
            instruments: DEFAULT_INSTRUMENTS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Settings {
    /// Rejects values the analytics would silently turn into `-inf` or `NaN`.
    pub fn validate(&self) -> Result<()> {
        if !(self.analytics.initial_capital.is_finite() && self.analytics.initial_capital > 0.0) {
            return Err(Error::Invalid(format!(
                "analytics.initial_capital must be positive, got {}",
                self.analytics.initial_capital
            )));
        }
        if !(self.scenario.ratio.is_finite() && self.scenario.ratio > 0.0) {
            return Err(Error::Invalid(format!(
                "scenario.ratio must be a positive number, got {}",
                self.scenario.ratio
            )));
        }
        if self.heatmap.instruments.iter().all(|i| i.trim().is_empty()) {
            return Err(Error::Invalid("heatmap.instruments must not be empty".to_string()));
        }
        if self.app.optimizer_cores == Some(0) {
            return Err(Error::Invalid("app.optimizer_cores must be at least 1".to_string()));
        }
        if self.mapping.pnl.trim().is_empty() {
            return Err(Error::Invalid("mapping.pnl must name a column".to_string()));
        }
        Ok(())
    }
}
