//! Shared error type across linkmeter crates.

use thiserror::Error;

/// Shared result type.
pub type Result<T> = std::result::Result<T, LinkMeterError>;

/// Unified error type used by core and exporter.
#[derive(Debug, Error)]
pub enum LinkMeterError {
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[error("label mismatch for '{name}': {expected} label keys but {got} label values")]
    LabelMismatch {
        name: String,
        expected: usize,
        got: usize,
    },
    #[error("counter source unavailable: {0}")]
    SourceUnavailable(String),
    #[error("counter protocol violation: {0}")]
    Protocol(String),
    #[error("internal: {0}")]
    Internal(String),
}
