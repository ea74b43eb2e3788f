//! Error types for benchbrief.
//!
//! Library crates use [`BenchbriefError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all benchbrief operations.
#[derive(Debug, thiserror::Error)]
pub enum BenchbriefError {
    /// Configuration loading or validation error (includes missing credentials).
    #[error("config error: {message}")]
    Config { message: String },

    /// Network/HTTP error while fetching benchmark data.
    #[error("network error: {0}")]
    Network(String),

    /// Source payload could not be parsed into records.
    #[error("parse error: {message}")]
    Parse { message: String },

    /// Telegram delivery error.
    #[error("notify error: {0}")]
    Notify(String),

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Data validation error (empty result set, implausible values, etc.).
    #[error("validation error: {message}")]
    Validation { message: String },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, BenchbriefError>;

impl BenchbriefError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a parse error from any displayable message.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse {
            message: msg.into(),
        }
    }

    /// Create a validation error from any displayable message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
