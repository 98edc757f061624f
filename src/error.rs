//! Error types for configuration loading and frame stepping.

use std::path::PathBuf;

use thiserror::Error;

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("Failed to read config {path:?}: {source}")]
    Io {
        /// File that failed to open
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid RON
    #[error("Failed to parse config: {0}")]
    Parse(#[from] ron::error::SpannedError),

    /// Config could not be written out as RON
    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] ron::Error),

    /// A field holds a value the simulation cannot run with
    #[error("Invalid config field `{field}`: {reason}")]
    Invalid {
        /// Offending field name
        field: &'static str,
        /// What is wrong with it
        reason: String,
    },
}

/// Errors returned by a single simulation step
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum StepError {
    /// Frame delta was negative, NaN or infinite
    #[error("Frame delta must be finite and non-negative, got {0}")]
    InvalidDelta(f32),
}
