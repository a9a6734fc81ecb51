//! Configuration for step execution.

use serde::{Deserialize, Serialize};
use sx_export::{S3StoreConfig, SnsConfig};
use sx_search::DEFAULT_PAGE_SIZE;

/// Default timeout for search API requests.
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Process-level settings shared by every step invocation.
///
/// Per-invocation inputs (credentials, job id, destinations) travel in the
/// step event; this only holds what the host environment decides.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepConfig {
    /// Rows requested per result page
    pub page_size: u64,

    /// Search API request timeout in seconds
    pub http_timeout_secs: u64,

    /// Replaces the region-derived API address (proxies, local mocks)
    pub api_base_url: Option<String>,

    /// AWS region for S3/SNS/Step Functions
    pub aws_region: Option<String>,

    /// Custom S3 endpoint URL (for LocalStack)
    pub s3_endpoint: Option<String>,

    /// Custom SNS endpoint URL (for LocalStack)
    pub sns_endpoint: Option<String>,

    /// State machine started by the workflow launcher
    pub state_machine_arn: Option<String>,

    /// Custom Step Functions endpoint URL (for LocalStack)
    pub sfn_endpoint: Option<String>,
}

impl Default for StepConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            http_timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
            api_base_url: None,
            aws_region: None,
            s3_endpoint: None,
            sns_endpoint: None,
            state_machine_arn: None,
            sfn_endpoint: None,
        }
    }
}

impl StepConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of rows requested per page.
    pub fn with_page_size(mut self, page_size: u64) -> Self {
        self.page_size = page_size;
        self
    }

    /// Set the search API request timeout.
    pub fn with_http_timeout(mut self, timeout_secs: u64) -> Self {
        self.http_timeout_secs = timeout_secs;
        self
    }

    /// Send search API calls to a fixed address instead of the region's.
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = Some(url.into());
        self
    }

    /// Set the AWS region.
    pub fn with_aws_region(mut self, region: impl Into<String>) -> Self {
        self.aws_region = Some(region.into());
        self
    }

    /// Set a custom S3 endpoint URL.
    pub fn with_s3_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.s3_endpoint = Some(endpoint.into());
        self
    }

    /// Set a custom SNS endpoint URL.
    pub fn with_sns_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.sns_endpoint = Some(endpoint.into());
        self
    }

    /// Set the state machine the launcher starts.
    pub fn with_state_machine_arn(mut self, arn: impl Into<String>) -> Self {
        self.state_machine_arn = Some(arn.into());
        self
    }

    /// Set a custom Step Functions endpoint URL.
    pub fn with_sfn_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.sfn_endpoint = Some(endpoint.into());
        self
    }

    /// Object store settings derived from this configuration.
    pub fn s3_store_config(&self) -> S3StoreConfig {
        S3StoreConfig {
            region: self.aws_region.clone(),
            endpoint: self.s3_endpoint.clone(),
            timeout_secs: None,
        }
    }

    /// SNS settings derived from this configuration.
    pub fn sns_config(&self) -> SnsConfig {
        SnsConfig {
            region: self.aws_region.clone(),
            endpoint: self.sns_endpoint.clone(),
        }
    }
}
