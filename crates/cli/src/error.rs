//! Error types for CLI operations.

use contracts::{EntrainmentError, ErrorClass};
use thiserror::Error;

/// CLI-specific error types
#[derive(Error, Debug)]
pub enum CliError {
    /// Session file not found
    #[error("Session file not found: {path}")]
    SessionNotFound { path: String },

    /// Session file could not be loaded or validated
    #[error("Failed to load session {path}: {source}")]
    SessionLoad {
        path: String,
        #[source]
        source: EntrainmentError,
    },

    /// Command-line override rejected
    #[error("Invalid override: {0}")]
    Override(#[source] EntrainmentError),

    /// Analysis of a loaded session failed
    #[error("Analysis of session '{session}' failed: {source}")]
    Analysis {
        session: String,
        #[source]
        source: EntrainmentError,
    },

    /// At least one session of a batch failed
    #[error("{failed} of {total} sessions failed")]
    SessionsFailed { failed: u64, total: usize },
}

impl CliError {
    pub fn session_not_found(path: impl Into<String>) -> Self {
        Self::SessionNotFound { path: path.into() }
    }

    pub fn session_load(path: impl Into<String>, source: EntrainmentError) -> Self {
        Self::SessionLoad {
            path: path.into(),
            source,
        }
    }

    pub fn analysis(session: impl Into<String>, source: EntrainmentError) -> Self {
        Self::Analysis {
            session: session.into(),
            source,
        }
    }

    /// Error class used to label failure metrics
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::SessionNotFound { .. } => ErrorClass::Io,
            Self::SessionLoad { source, .. }
            | Self::Override(source)
            | Self::Analysis { source, .. } => source.class(),
            Self::SessionsFailed { .. } => ErrorClass::DataShape,
        }
    }
}

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_follows_source() {
        let err = CliError::analysis(
            "dialogue-01",
            EntrainmentError::EmptyDomain {
                start: 5.0,
                end: 1.0,
            },
        );
        assert_eq!(err.class(), ErrorClass::DataShape);
        assert!(err.to_string().contains("dialogue-01"));

        let err = CliError::Override(EntrainmentError::unknown_metric("entropy"));
        assert_eq!(err.class(), ErrorClass::Configuration);

        assert_eq!(
            CliError::session_not_found("missing.toml").class(),
            ErrorClass::Io
        );
    }

    #[test]
    fn test_sessions_failed_message() {
        let err = CliError::SessionsFailed {
            failed: 2,
            total: 5,
        };
        assert_eq!(err.to_string(), "2 of 5 sessions failed");
    }
}
