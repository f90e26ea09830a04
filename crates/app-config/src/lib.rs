// In crates/app-config/src/lib.rs

use std::path::Path;

use config::{Config, Environment, File, FileFormat};

pub mod error;
pub mod types;

// Re-export the most important types for easy access.
pub use error::{Error, Result};
pub use types::{AnalyticsSettings, AppSettings, HeatmapSettings, Settings};

/// Loads the application settings from the `config/` directory.
///
/// This function orchestrates the layered configuration loading:
/// 1. Reads from a default `base.toml` file.
/// 2. Merges settings from an environment-specific file (e.g., `development.toml`).
/// 3. Merges settings from environment variables.
pub fn load_settings() -> Result<Settings> {
    load_settings_from("config")
}

/// Same layering as [`load_settings`], rooted at `dir`. A missing `base.toml`
/// is tolerated; every field has a default.
pub fn load_settings_from(dir: impl AsRef<Path>) -> Result<Settings> {
    let dir = dir.as_ref();
    // Get the current environment. Default to "development" if not set.
    let environment = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "development".into());

    let settings = Config::builder()
        .add_source(File::from(dir.join("base")).required(false))
        .add_source(File::from(dir.join(&environment)).required(false))
        // e.g. `APP_ANALYTICS__DD_BASIS=r`
        .add_source(Environment::with_prefix("APP").separator("__"))
        .build()?;

    let settings: Settings = settings.try_deserialize()?;
    settings.validate()?;
    Ok(settings)
}

/// Parses settings from an in-memory TOML document, without the file and
/// environment layers.
pub fn settings_from_toml(toml: &str) -> Result<Settings> {
    let settings: Settings = Config::builder()
        .add_source(File::from_str(toml, FileFormat::Toml))
        .build()?
        .try_deserialize()?;
    settings.validate()?;
    Ok(settings)
}
