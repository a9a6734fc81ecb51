//! Raw step input.

use serde::{Deserialize, Serialize};

/// Flat key/value object every step is invoked with.
///
/// All fields are optional here; each step checks the ones it needs when it
/// converts the event into its typed request. Unknown keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepEvent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_key: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub messages: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub records: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub s3_bucket: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub s3_key_prefix: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub s3_key_messages: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub s3_key_records: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub sns_topic_arn: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub cookie: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_count: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub record_count: Option<u64>,
}
