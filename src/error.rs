//! Error types for bucketing and synthesis

use thiserror::Error;

/// Errors raised by the bucketing and synthesis core
///
/// Malformed probe names and unpairable kinds are not errors: they are
/// excluded from synthesis and reported through `tracing::warn!`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SynthError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Arithmetic overflow synthesizing kind '{kind}' at window {window}")]
    Overflow { kind: String, window: u64 },
}

pub type Result<T> = std::result::Result<T, SynthError>;
