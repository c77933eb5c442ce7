//! Error handling utilities shared across the crate.

use std::path::PathBuf;

use thiserror::Error;

/// Convenient result type used throughout the crate.
pub type Result<T, E = NgramError> = std::result::Result<T, E>;

/// Domain-specific error describing configuration, data consistency, smoothing and IO failures.
#[derive(Debug, Error)]
pub enum NgramError {
    /// Analysis parameters failed validation (for example an n-gram order of zero).
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// The corpus or an intermediate table violated a consistency requirement.
    #[error("data error: {0}")]
    Data(String),
    /// The Good-Turing formula hit a zero divisor for the given frequency.
    #[error("good-turing smoothing failed at frequency {frequency}: {reason}")]
    Smoothing {
        /// Frequency value `c` whose re-estimated count could not be computed.
        frequency: usize,
        /// Which operand of the formula was zero.
        reason: String,
    },
    /// Filesystem IO error with optional context path.
    #[error("io error while processing {path:?}: {source}")]
    Io {
        /// Underlying IO error returned by the standard library.
        source: std::io::Error,
        /// Target path associated with the IO failure if available.
        path: Option<PathBuf>,
    },
    /// Delimited export failure.
    #[error("csv error: {0}")]
    Csv(String),
    /// Serialization or deserialization failure.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<csv::Error> for NgramError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err.to_string())
    }
}

impl From<serde_json::Error> for NgramError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl NgramError {
    /// Helper constructor that attaches an optional path when wrapping IO errors.
    pub fn io(source: std::io::Error, path: Option<PathBuf>) -> Self {
        Self::Io { source, path }
    }

    pub(crate) fn smoothing(frequency: usize, reason: impl Into<String>) -> Self {
        Self::Smoothing {
            frequency,
            reason: reason.into(),
        }
    }
}
