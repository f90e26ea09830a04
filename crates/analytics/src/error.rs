// In crates/analytics/src/error.rs

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Unknown drawdown basis '{0}', expected 'capital' or 'r'")]
    UnknownBasis(String),

    #[error("Invalid {kind} filter '{value}'")]
    InvalidFilter { kind: &'static str, value: String },
}

pub type Result<T> = std::result::Result<T, Error>;
