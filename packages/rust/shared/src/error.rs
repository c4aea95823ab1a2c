//! Error types for Wikiracer.
//!
//! Library crates use [`WikiracerError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all Wikiracer operations.
#[derive(Debug, thiserror::Error)]
pub enum WikiracerError {
    /// Configuration or settings file loading error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Network/HTTP error while talking to the graph provider.
    #[error("network error: {0}")]
    Network(String),

    /// Malformed provider response (JSON or HTML).
    #[error("parse error: {message}")]
    Parse { message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Data validation error (empty title, bad endpoint, etc.).
    #[error("validation error: {message}")]
    Validation { message: String },

    /// A search term matched no articles. Fatal for the whole race.
    #[error("no articles found for '{term}'")]
    NoCandidates { term: String },

    /// The disambiguation callback could not produce a decision at all.
    #[error("disambiguation failed: {0}")]
    Decision(String),
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, WikiracerError>;

impl WikiracerError {
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

    /// Signal that `term` resolved to zero candidates.
    pub fn no_candidates(term: impl Into<String>) -> Self {
        Self::NoCandidates { term: term.into() }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formatting() {
        let err = WikiracerError::config("missing endpoint");
        assert_eq!(err.to_string(), "config error: missing endpoint");

        let err = WikiracerError::no_candidates("zzzznotreal");
        assert_eq!(err.to_string(), "no articles found for 'zzzznotreal'");

        let err = WikiracerError::validation("start title is empty");
        assert!(err.to_string().contains("start title"));
    }
}
