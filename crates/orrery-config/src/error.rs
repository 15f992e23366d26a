//! Configuration error types.

use std::path::PathBuf;

/// Errors that can occur when loading or saving `config.ron`.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write config {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },

    /// Parsed, but a value is out of range.
    #[error("invalid config {}: {reason}", path.display())]
    Invalid { path: PathBuf, reason: &'static str },

    #[error("failed to serialize config: {0}")]
    Serialize(#[source] ron::Error),
}
