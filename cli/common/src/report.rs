//! Failure reporting for step binaries.

use serde::Serialize;
use serde_json::json;
use sx_error::{ErrorCategory, SxError, classify_error};

/// Exit code for failures worth retrying (`EX_TEMPFAIL`).
pub const EXIT_TRANSIENT: i32 = 75;

/// Exit code for every other failure.
pub const EXIT_PERMANENT: i32 = 1;

/// Machine-readable failure written to stderr.
///
/// `errorType` is the stable error name an orchestrator matches its retry
/// and catch rules against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorReport {
    pub error_type: String,
    pub error_message: String,
}

impl ErrorReport {
    pub fn from_error(error: &SxError) -> Self {
        Self {
            error_type: error.name().to_string(),
            error_message: error.to_string(),
        }
    }

    /// Single-line JSON rendering.
    pub fn to_json(&self) -> String {
        json!({
            "errorType": self.error_type,
            "errorMessage": self.error_message,
        })
        .to_string()
    }
}

/// Process exit code for a failed step.
pub fn exit_code(error: &SxError) -> i32 {
    match classify_error(error) {
        ErrorCategory::Transient => EXIT_TRANSIENT,
        ErrorCategory::Permanent => EXIT_PERMANENT,
    }
}
