//! Completion notification.

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_sns::Client as SnsClient;
use serde::Serialize;
use sx_error::{Result, SxError};
use sx_types::{Locator, ResultKind, SearchTime};
use tracing::{debug, info, warn};

/// Body of a completion notification.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionMessage {
    pub query: Option<String>,
    pub from: Option<SearchTime>,
    pub to: Option<SearchTime>,
    pub job_id: String,
    pub kind: ResultKind,
    pub locator: Locator,
}

impl CompletionMessage {
    /// Subject line for this message.
    pub fn subject(&self) -> String {
        format!("Search export complete: {}", self.kind)
    }
}

/// Publishes completion messages to a topic.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Publish one message.
    ///
    /// # Errors
    ///
    /// Returns `SxError::Notify` when the publish is rejected or fails.
    async fn notify(&self, topic: &str, subject: &str, message: &CompletionMessage) -> Result<()>;
}

/// Configuration for the SNS notifier.
#[derive(Debug, Clone, Default)]
pub struct SnsConfig {
    /// AWS region for SNS API calls.
    pub region: Option<String>,

    /// Custom endpoint URL (for LocalStack/testing).
    pub endpoint: Option<String>,
}

impl SnsConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the AWS region.
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Set a custom endpoint (for LocalStack/testing).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }
}

/// Notifier publishing to Amazon SNS topics.
pub struct SnsNotifier {
    client: SnsClient,
}

impl SnsNotifier {
    pub async fn new(config: &SnsConfig) -> Self {
        Self {
            client: build_sns_client(config).await,
        }
    }

    /// Create a notifier with an existing client.
    pub fn with_client(client: SnsClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Notifier for SnsNotifier {
    async fn notify(&self, topic: &str, subject: &str, message: &CompletionMessage) -> Result<()> {
        let body = serde_json::to_string(message)
            .map_err(|e| SxError::Notify(format!("Failed to serialize notification: {e}")))?;

        debug!(topic = %topic, job_id = %message.job_id, "Publishing completion notification");

        let output = self
            .client
            .publish()
            .topic_arn(topic)
            .subject(subject)
            .message(body)
            .send()
            .await
            .map_err(|e| {
                warn!(topic = %topic, error = %e, "Notification publish failed");
                SxError::Notify(format!("Failed to publish to {topic}: {e}"))
            })?;

        info!(
            topic = %topic,
            message_id = output.message_id().unwrap_or_default(),
            "Completion notification sent"
        );
        Ok(())
    }
}

async fn build_sns_client(config: &SnsConfig) -> SnsClient {
    use aws_config::Region;

    let mut aws_config_loader = aws_config::defaults(BehaviorVersion::latest());

    if let Some(region) = &config.region {
        aws_config_loader = aws_config_loader.region(Region::new(region.clone()));
    }

    if let Some(endpoint) = &config.endpoint {
        aws_config_loader = aws_config_loader.endpoint_url(endpoint);
    }

    let aws_config = aws_config_loader.load().await;
    SnsClient::new(&aws_config)
}
