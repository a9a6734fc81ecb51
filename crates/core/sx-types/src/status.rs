//! Search job status.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One poll of a search job, exactly as the API reported it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobStatusSnapshot {
    /// Lifecycle state string, controlled by the service
    pub state: String,

    #[serde(default)]
    pub message_count: u64,

    #[serde(default)]
    pub record_count: u64,

    /// Diagnostics passed through untouched, `null` when absent
    #[serde(default)]
    pub pending_warnings: Value,

    #[serde(default)]
    pub pending_errors: Value,
}

impl JobStatusSnapshot {
    pub fn lifecycle(&self) -> JobLifecycle {
        JobLifecycle::from_state(&self.state)
    }
}

/// Known search job states.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobLifecycle {
    NotStarted,
    GatheringResults,
    DoneGatheringResults,
    ForcePaused,
    Paused,
    Cancelled,
    /// A state string this client does not know
    Unknown(String),
}

impl JobLifecycle {
    pub fn from_state(state: &str) -> Self {
        match state.trim().to_ascii_uppercase().as_str() {
            "NOT STARTED" => Self::NotStarted,
            "GATHERING RESULTS" | "GATHERING RESULTS FROM SUBQUERIES" => Self::GatheringResults,
            "DONE GATHERING RESULTS" => Self::DoneGatheringResults,
            "FORCE PAUSED" => Self::ForcePaused,
            "PAUSED" => Self::Paused,
            "CANCELLED" => Self::Cancelled,
            _ => Self::Unknown(state.to_string()),
        }
    }

    /// Whether the job will not gather any more results.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::DoneGatheringResults | Self::ForcePaused | Self::Cancelled
        )
    }
}
