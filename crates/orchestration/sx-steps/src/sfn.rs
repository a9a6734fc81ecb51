//! Step Functions workflow launcher.
//!
//! Starts one execution of the export state machine per request. The
//! destination keys are fixed up front so the caller learns where results
//! will land before the job even exists.

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_sfn::Client as SfnClient;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sx_error::{Result, SxError, ValidationError};
use sx_types::{Destination, Locator, ResultKind, StepEvent};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::StepConfig;

/// A started state machine execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartedExecution {
    pub execution_arn: String,
    pub start_date: DateTime<Utc>,
}

/// Starts executions of the export workflow.
#[async_trait]
pub trait ExecutionStarter: Send + Sync {
    /// Start one execution with the given JSON input.
    async fn start_execution(&self, input: String) -> Result<StartedExecution>;
}

/// Starts executions of a Step Functions state machine.
pub struct SfnExecutionStarter {
    client: SfnClient,
    state_machine_arn: String,
}

impl SfnExecutionStarter {
    /// Create a starter for the state machine named in the configuration.
    pub async fn from_config(config: &StepConfig) -> Result<Self> {
        let state_machine_arn = config
            .state_machine_arn
            .clone()
            .ok_or_else(|| SxError::Config("No state machine ARN configured".to_string()))?;

        let client = build_sfn_client(config).await;
        info!(state_machine_arn = %state_machine_arn, "Step Functions launcher enabled");

        Ok(Self {
            client,
            state_machine_arn,
        })
    }

    /// Create a starter with an existing client (useful for testing).
    pub fn with_client(client: SfnClient, state_machine_arn: impl Into<String>) -> Self {
        Self {
            client,
            state_machine_arn: state_machine_arn.into(),
        }
    }
}

#[async_trait]
impl ExecutionStarter for SfnExecutionStarter {
    async fn start_execution(&self, input: String) -> Result<StartedExecution> {
        debug!(input_len = input.len(), "Starting state machine execution");

        let output = self
            .client
            .start_execution()
            .state_machine_arn(&self.state_machine_arn)
            .input(input)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Failed to start state machine execution");
                SxError::Launch(format!("Failed to start execution: {e}"))
            })?;

        let started = output.start_date();
        let start_date = DateTime::from_timestamp(started.secs(), started.subsec_nanos())
            .ok_or_else(|| SxError::Launch(format!("Invalid execution start date: {started:?}")))?;

        Ok(StartedExecution {
            execution_arn: output.execution_arn().to_string(),
            start_date,
        })
    }
}

/// Build a Step Functions client from configuration.
async fn build_sfn_client(config: &StepConfig) -> SfnClient {
    use aws_config::Region;

    let mut aws_config_loader = aws_config::defaults(BehaviorVersion::latest());

    if let Some(region) = &config.aws_region {
        aws_config_loader = aws_config_loader.region(Region::new(region.clone()));
    }

    // Custom endpoint (for LocalStack)
    if let Some(endpoint) = &config.sfn_endpoint {
        aws_config_loader = aws_config_loader.endpoint_url(endpoint);
    }

    let aws_config = aws_config_loader.load().await;
    SfnClient::new(&aws_config)
}

/// What the launcher returns to its caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LaunchOutput {
    pub s3_key_messages: Locator,
    pub s3_key_records: Locator,
    pub execution_arn: String,
    pub start_date: DateTime<Utc>,
}

/// HTTP-style request carrying the launch event as a JSON string body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiRequest {
    #[serde(default)]
    pub body: Option<String>,
}

/// HTTP-style response wrapping the launch output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse {
    pub status_code: u16,
    pub body: String,
}

/// Starts export workflows.
pub struct WorkflowLauncher<S> {
    starter: S,
}

impl<S: ExecutionStarter> WorkflowLauncher<S> {
    pub fn new(starter: S) -> Self {
        Self { starter }
    }

    /// Start a workflow for the given event.
    ///
    /// Missing destination keys are filled with
    /// `<s3KeyPrefix><uuid>_messages.csv` / `<s3KeyPrefix><uuid>_records.csv`
    /// and the completed event becomes the execution input.
    pub async fn launch(&self, mut event: StepEvent) -> Result<LaunchOutput> {
        let prefix = non_empty(&event.s3_key_prefix)
            .ok_or(ValidationError::MissingField("s3KeyPrefix"))?
            .to_string();
        let bucket = non_empty(&event.s3_bucket)
            .ok_or(ValidationError::MissingField("s3Bucket"))?
            .to_string();

        let launch_id = Uuid::new_v4().to_string();
        if non_empty(&event.s3_key_messages).is_none() {
            event.s3_key_messages = Some(ResultKind::Messages.default_key(&prefix, &launch_id));
        }
        if non_empty(&event.s3_key_records).is_none() {
            event.s3_key_records = Some(ResultKind::Records.default_key(&prefix, &launch_id));
        }

        let messages = Destination::new(&bucket, event.s3_key_messages.clone().unwrap_or_default());
        let records = Destination::new(&bucket, event.s3_key_records.clone().unwrap_or_default());

        let input = serde_json::to_string(&event)
            .map_err(|e| SxError::Launch(format!("Failed to serialize execution input: {e}")))?;

        let started = self.starter.start_execution(input).await?;

        info!(
            execution_arn = %started.execution_arn,
            messages = %messages.locator(),
            records = %records.locator(),
            "Export workflow started"
        );

        Ok(LaunchOutput {
            s3_key_messages: messages.locator(),
            s3_key_records: records.locator(),
            execution_arn: started.execution_arn,
            start_date: started.start_date,
        })
    }

    /// Start a workflow from an HTTP-style request and wrap the result.
    pub async fn launch_api(&self, request: ApiRequest) -> Result<ApiResponse> {
        let body = request
            .body
            .filter(|b| !b.is_empty())
            .ok_or(ValidationError::MissingField("body"))?;
        let event: StepEvent = serde_json::from_str(&body).map_err(|e| {
            ValidationError::Constraint(format!("Request body is not a valid JSON object: {e}"))
        })?;

        let output = self.launch(event).await?;
        let body = serde_json::to_string(&output)
            .map_err(|e| SxError::Encode(format!("Failed to serialize launch output: {e}")))?;

        Ok(ApiResponse {
            status_code: 200,
            body,
        })
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}
