//! Error types for path construction and run configuration.
//!
//! Move rejection is an ordinary outcome and never shows up here; only
//! configuration-time failures and I/O do.

use thiserror::Error;

/// Errors raised while building a path configuration or running a chain.
#[derive(Error, Debug)]
pub enum PimcError {
    /// A scalar or per-particle parameter is outside its valid range
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    /// A per-particle vector does not match the particle count
    #[error("length mismatch for `{name}`: expected {expected}, found {found}")]
    LengthMismatch {
        name: &'static str,
        expected: usize,
        found: usize,
    },

    /// Reading a config or writing a path dump failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The YAML config could not be parsed
    #[error("config error: {0}")]
    Config(#[from] serde_yaml::Error),
}

impl PimcError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        PimcError::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PimcError>;
