//! Error types for study assignment and enrollment.
//!
//! Library errors are `thiserror` enums; state backends report through
//! `anyhow` and are wrapped at the enrollment boundary.

use thiserror::Error;

/// Errors raised by hashing, variation selection, and assignment.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StudyError {
    /// Malformed input: empty key, bad precision, or an unusable variation table.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The durable client identifier could not be obtained.
    #[error("Client identity unavailable: {0}")]
    IdentityUnavailable(String),
}

impl StudyError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    pub(crate) fn identity_unavailable(message: impl Into<String>) -> Self {
        Self::IdentityUnavailable(message.into())
    }
}

/// Errors raised while loading study configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The settings file could not be read.
    #[error("Failed to read study settings {path}: {source}")]
    Io {
        /// Path that failed to load.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The settings document is not valid YAML for the expected shape.
    #[error("Failed to parse study settings: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// The settings parsed but describe an invalid study.
    #[error(transparent)]
    Invalid(#[from] StudyError),
}

/// Errors raised while enrolling a client.
#[derive(Error, Debug)]
pub enum EnrollmentError {
    /// Assignment failed; nothing was persisted.
    #[error(transparent)]
    Assignment(#[from] StudyError),

    /// The study-state backend failed to load or save.
    #[error("Study state error: {0:#}")]
    State(anyhow::Error),
}
