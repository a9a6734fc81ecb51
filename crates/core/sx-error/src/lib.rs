//! Error types and classification for the search export pipeline.
//!
//! This crate provides:
//! - [`SxError`] - Top-level error enum shared by every step
//! - [`ValidationError`] for rejected step input
//! - [`ErrorCategory`] so an external orchestrator can decide whether to retry
//! - Stable error names for orchestrator Retry/Catch matching

use thiserror::Error;

/// Top-level error type for the search export pipeline.
#[derive(Error, Debug)]
pub enum SxError {
    /// Step input was missing a field or carried an invalid value
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Region identifier outside the supported set
    #[error("Invalid region \"{0}\"")]
    InvalidRegion(String),

    /// The search job API answered with a non-2xx status
    #[error("Remote error (status {status}): {body}")]
    Remote { status: u16, body: String },

    /// The search job API could not be reached or its response not read
    #[error("Transport error: {0}")]
    Transport(String),

    /// Result rows could not be encoded
    #[error("Encode error: {0}")]
    Encode(String),

    /// Object store write or upload completion failed
    #[error("Sink error: {0}")]
    Sink(String),

    /// Completion notification could not be published
    #[error("Notify error: {0}")]
    Notify(String),

    /// Workflow execution could not be started
    #[error("Launch error: {0}")]
    Launch(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Rejected step input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is absent
    #[error("Missing argument \"{0}\"")]
    MissingField(&'static str),

    /// A field is present but its value is not acceptable
    #[error("Invalid value \"{value}\" for \"{field}\": {reason}")]
    InvalidValue {
        field: &'static str,
        value: String,
        reason: String,
    },

    /// A rule spanning several fields is violated
    #[error("{0}")]
    Constraint(String),
}

impl ValidationError {
    /// Shorthand for [`ValidationError::InvalidValue`].
    pub fn invalid(
        field: &'static str,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidValue {
            field,
            value: value.into(),
            reason: reason.into(),
        }
    }
}

/// Error classification for retry decisions.
///
/// Nothing in this workspace retries; the category is reported so the
/// orchestrator driving the steps can.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Transient error - the step may succeed if invoked again
    ///
    /// Examples: API 503, throttling, S3 upload failure
    Transient,

    /// Permanent error - invoking the step again with the same input fails again
    ///
    /// Examples: missing field, unknown region, API 400
    Permanent,
}

impl SxError {
    /// Shorthand for [`SxError::Remote`].
    pub fn remote(status: u16, body: impl Into<String>) -> Self {
        Self::Remote {
            status,
            body: body.into(),
        }
    }

    /// Stable name of the error kind, used as the `errorType` reported to the
    /// orchestrator.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Validation(_) => "ValidationError",
            Self::InvalidRegion(_) => "InvalidRegion",
            Self::Remote { .. } => "RemoteError",
            Self::Transport(_) => "TransportError",
            Self::Encode(_) => "EncodeError",
            Self::Sink(_) => "SinkError",
            Self::Notify(_) => "NotifyError",
            Self::Launch(_) => "LaunchError",
            Self::Config(_) => "ConfigError",
        }
    }
}

/// Classifies an error to determine retry behavior.
pub fn classify_error(error: &SxError) -> ErrorCategory {
    match error {
        SxError::Validation(_) => ErrorCategory::Permanent,
        SxError::InvalidRegion(_) => ErrorCategory::Permanent,
        SxError::Remote { status, .. } => classify_status(*status),
        SxError::Transport(_) => ErrorCategory::Transient,
        SxError::Encode(_) => ErrorCategory::Permanent,
        SxError::Sink(_) => ErrorCategory::Transient,
        SxError::Notify(_) => ErrorCategory::Transient,
        SxError::Launch(_) => ErrorCategory::Transient,
        SxError::Config(_) => ErrorCategory::Permanent,
    }
}

fn classify_status(status: u16) -> ErrorCategory {
    match status {
        408 | 429 => ErrorCategory::Transient,
        500..=599 => ErrorCategory::Transient,
        _ => ErrorCategory::Permanent,
    }
}

/// Result type alias using SxError.
pub type Result<T> = std::result::Result<T, SxError>;
