//! Step entry points.

use serde::Serialize;
use serde::ser::SerializeMap;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use sx_error::{Result, SxError};
use sx_export::{Notifier, S3StoreProvider, SnsNotifier, StoreProvider};
use sx_search::{ResultFetcher, SearchClient, build_http_client, resolve_base_url};
use sx_types::{
    Credentials, JobStatusSnapshot, Locator, Region, ResultKind, SessionContext, StepEvent,
};
use tracing::info;

use crate::config::StepConfig;
use crate::dump::dump_result_set;
use crate::request::{DumpRequest, PollRequest, StartRequest};

/// The workflow steps a runner can execute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Start,
    Poll,
    DumpMessages,
    DumpRecords,
}

impl Step {
    /// Name the orchestrator knows the step by.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Poll => "poll",
            Self::DumpMessages => "dumpMessages",
            Self::DumpRecords => "dumpRecords",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Output of the poll step: the refreshed context plus the job snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PollOutput {
    #[serde(flatten)]
    pub context: SessionContext,
    #[serde(flatten)]
    pub snapshot: JobStatusSnapshot,
}

/// Output of a dump step that wrote an object.
///
/// Serializes as `{"messagesPath": ...}` or `{"recordsPath": ...}`.
#[derive(Debug, Clone, PartialEq)]
pub struct DumpOutput {
    pub kind: ResultKind,
    pub locator: Locator,
}

impl Serialize for DumpOutput {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(self.kind.path_field(), &self.locator)?;
        map.end()
    }
}

/// Runs workflow steps against the search API, object store and notifier.
pub struct StepRunner {
    config: StepConfig,
    http: reqwest::Client,
    stores: Arc<dyn StoreProvider>,
    notifier: Arc<dyn Notifier>,
}

impl StepRunner {
    /// Create a runner with explicit collaborators.
    pub fn new(
        config: StepConfig,
        stores: Arc<dyn StoreProvider>,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self> {
        let http = build_http_client(config.http_timeout_secs)?;
        Ok(Self {
            config,
            http,
            stores,
            notifier,
        })
    }

    /// Create a runner backed by S3 and SNS.
    pub async fn from_config(config: StepConfig) -> Result<Self> {
        let stores = Arc::new(S3StoreProvider::new(config.s3_store_config()));
        let notifier = Arc::new(SnsNotifier::new(&config.sns_config()).await);
        Self::new(config, stores, notifier)
    }

    /// Run a step and return its output as a JSON value.
    ///
    /// A dump step with nothing to do returns `Value::Null`.
    pub async fn run(&self, step: Step, event: &StepEvent) -> Result<Value> {
        match step {
            Step::Start => to_json(&self.start(event).await?),
            Step::Poll => to_json(&self.poll(event).await?),
            Step::DumpMessages => to_json(&self.dump_messages(event).await?),
            Step::DumpRecords => to_json(&self.dump_records(event).await?),
        }
    }

    /// Create the search job and return the session context.
    pub async fn start(&self, event: &StepEvent) -> Result<SessionContext> {
        let request = StartRequest::try_from(event)?;
        let client = self.search_client(request.region, &request.credentials)?;

        let job = client.create_job(&request.search).await?;

        let context = SessionContext {
            endpoint: request.region,
            s3_key_messages: request.keys.resolve(ResultKind::Messages, &job.id),
            s3_key_records: request.keys.resolve(ResultKind::Records, &job.id),
            credentials: request.credentials,
            search: Some(request.search),
            messages: request.messages,
            records: request.records,
            s3_bucket: request.s3_bucket,
            sns_topic_arn: request.sns_topic_arn,
            cookie: job.token,
            id: job.id,
        };

        info!(
            job_id = %context.id,
            endpoint = %context.endpoint,
            messages = context.messages,
            records = context.records,
            "Search job started"
        );
        Ok(context)
    }

    /// Fetch the job status and return the context with the rotated token.
    pub async fn poll(&self, event: &StepEvent) -> Result<PollOutput> {
        let PollRequest { context } = PollRequest::try_from(event)?;
        let client = self.search_client(context.endpoint, &context.credentials)?;

        let status = client.get_job_status(&context.id, &context.cookie).await?;

        info!(
            job_id = %context.id,
            state = %status.snapshot.state,
            terminal = status.snapshot.lifecycle().is_terminal(),
            "Search job polled"
        );

        Ok(PollOutput {
            context: context.with_token(status.token),
            snapshot: status.snapshot,
        })
    }

    /// Dump the message result set, if messages were requested.
    pub async fn dump_messages(&self, event: &StepEvent) -> Result<Option<DumpOutput>> {
        self.dump(event, ResultKind::Messages).await
    }

    /// Dump the record result set, if records were requested.
    pub async fn dump_records(&self, event: &StepEvent) -> Result<Option<DumpOutput>> {
        self.dump(event, ResultKind::Records).await
    }

    async fn dump(&self, event: &StepEvent, kind: ResultKind) -> Result<Option<DumpOutput>> {
        let Some(request) = DumpRequest::from_event(event, kind)? else {
            info!(kind = %kind, "Result kind not requested, nothing to dump");
            return Ok(None);
        };

        let context = &request.context;
        let client = self.search_client(context.endpoint, &context.credentials)?;
        let fetcher = ResultFetcher::new(client, self.config.page_size);
        let store = self.stores.store(&context.s3_bucket)?;

        let locator = dump_result_set(&fetcher, store, self.notifier.as_ref(), &request).await?;
        Ok(Some(DumpOutput { kind, locator }))
    }

    fn search_client(&self, region: Region, credentials: &Credentials) -> Result<SearchClient> {
        let base_url = resolve_base_url(region, self.config.api_base_url.as_deref())?;
        Ok(SearchClient::new(
            self.http.clone(),
            base_url,
            credentials.clone(),
        ))
    }
}

fn to_json<T: Serialize>(output: &T) -> Result<Value> {
    serde_json::to_value(output)
        .map_err(|e| SxError::Encode(format!("Failed to serialize step output: {e}")))
}
