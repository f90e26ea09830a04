// In crates/core-types/src/lib.rs

pub mod error;
pub mod normalize;
pub mod pricing;
pub mod types;

// Re-export the most important types for easy access from other crates.
pub use error::{Error, Result};
pub use normalize::{FieldMapping, FieldValue, RawTradeRecord};
pub use types::{Side, Symbol, TradeRecord};
