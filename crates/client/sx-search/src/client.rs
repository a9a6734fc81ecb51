//! Search job lifecycle client.
//!
//! Credentials, the access key and the session cookie are never logged; only
//! the method, path, job id and status code are.

use reqwest::header::{ACCEPT, CONTENT_TYPE, COOKIE, HeaderMap, SET_COOKIE};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use sx_error::{Result, SxError};
use sx_types::{Credentials, JobStatusSnapshot, ResultKind, SearchParams, SearchTime, SessionToken};
use tracing::{debug, info, warn};
use url::Url;

use crate::fetcher::PageWindow;

const JOBS_PATH: [&str; 4] = ["api", "v1", "search", "jobs"];

/// Build the shared HTTP client used for all search API calls.
pub fn build_http_client(timeout_secs: u64) -> Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| SxError::Config(format!("Failed to create HTTP client: {e}")))
}

/// A freshly created search job.
#[derive(Debug, Clone)]
pub struct CreatedJob {
    /// Job id assigned by the service
    pub id: String,
    /// Session cookie every later call must carry
    pub token: SessionToken,
}

/// Result of one status poll.
#[derive(Debug, Clone)]
pub struct JobStatus {
    pub snapshot: JobStatusSnapshot,
    /// Replacement session cookie
    pub token: SessionToken,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateJobRequest<'a> {
    query: &'a str,
    from: SearchTime,
    to: SearchTime,
    time_zone: &'a str,
}

#[derive(Debug, Deserialize)]
struct CreateJobResponse {
    id: String,
}

#[derive(Debug, Deserialize)]
struct FieldDescriptor {
    name: String,
}

/// Body of a paginated results response.
#[derive(Debug, Deserialize)]
pub(crate) struct ResultEnvelope {
    #[serde(default)]
    fields: Vec<FieldDescriptor>,
    #[serde(default)]
    messages: Vec<sx_types::ResultRow>,
    #[serde(default)]
    records: Vec<sx_types::ResultRow>,
}

impl ResultEnvelope {
    pub(crate) fn field_names(&self) -> Vec<String> {
        self.fields.iter().map(|f| f.name.clone()).collect()
    }

    pub(crate) fn into_rows(self, kind: ResultKind) -> Vec<sx_types::ResultRow> {
        match kind {
            ResultKind::Messages => self.messages,
            ResultKind::Records => self.records,
        }
    }
}

/// Client for the search job API of one deployment.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Clone)]
pub struct SearchClient {
    http: Client,
    base_url: Url,
    credentials: Credentials,
}

impl SearchClient {
    /// Create a client for an explicit base address.
    pub fn new(http: Client, base_url: Url, credentials: Credentials) -> Self {
        Self {
            http,
            base_url,
            credentials,
        }
    }

    /// Start a search job.
    ///
    /// # Errors
    ///
    /// - `SxError::Remote` - non-2xx response, or no session cookie issued
    /// - `SxError::Transport` - the service could not be reached
    pub async fn create_job(&self, search: &SearchParams) -> Result<CreatedJob> {
        let url = self.url(&[])?;
        let body = CreateJobRequest {
            query: &search.query,
            from: search.from,
            to: search.to,
            time_zone: &search.time_zone,
        };

        info!(
            from = %search.from,
            to = %search.to,
            time_zone = %search.time_zone,
            "POST /api/v1/search/jobs (creating job)"
        );

        let request = self.authorized(self.http.post(url), None).json(&body);
        let (response, token): (CreateJobResponse, _) = self.send(request, "create job").await?;

        let token = token.ok_or_else(|| {
            SxError::remote(200, "Search job created without a session cookie")
        })?;

        info!(job_id = %response.id, "Search job created");

        Ok(CreatedJob {
            id: response.id,
            token,
        })
    }

    /// Fetch the current status of a search job.
    ///
    /// The returned token replaces `token` for all later calls. When the
    /// service does not rotate the cookie, the token sent is returned.
    pub async fn get_job_status(&self, job_id: &str, token: &SessionToken) -> Result<JobStatus> {
        let url = self.url(&[job_id])?;

        debug!(job_id = %job_id, "GET /api/v1/search/jobs/{{id}} (status)");

        let request = self.authorized(self.http.get(url), Some(token));
        let (snapshot, rotated): (JobStatusSnapshot, _) = self.send(request, "job status").await?;

        info!(
            job_id = %job_id,
            state = %snapshot.state,
            message_count = snapshot.message_count,
            record_count = snapshot.record_count,
            "Polled search job"
        );

        Ok(JobStatus {
            snapshot,
            token: rotated.unwrap_or_else(|| token.clone()),
        })
    }

    /// Fetch one window of a result set.
    pub(crate) async fn get_result_page(
        &self,
        job_id: &str,
        kind: ResultKind,
        window: PageWindow,
        token: &SessionToken,
    ) -> Result<ResultEnvelope> {
        let mut url = self.url(&[job_id, kind.as_str()])?;
        url.query_pairs_mut()
            .append_pair("offset", &window.offset.to_string())
            .append_pair("limit", &window.limit.to_string());

        let request = self.authorized(self.http.get(url), Some(token));
        let (envelope, _): (ResultEnvelope, _) = self.send(request, kind.as_str()).await?;
        Ok(envelope)
    }

    /// Jobs endpoint URL with extra path segments appended.
    fn url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                SxError::Config(format!("API base URL cannot take a path: {}", self.base_url))
            })?
            .pop_if_empty()
            .extend(JOBS_PATH)
            .extend(segments);
        Ok(url)
    }

    fn authorized(&self, request: RequestBuilder, token: Option<&SessionToken>) -> RequestBuilder {
        let request = request
            .basic_auth(&self.credentials.access_id, Some(&self.credentials.access_key))
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json");

        match token {
            Some(token) if !token.is_empty() => request.header(COOKIE, token.as_str()),
            _ => request,
        }
    }

    /// Send a request and decode its JSON body, returning any issued session cookie.
    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        operation: &str,
    ) -> Result<(T, Option<SessionToken>)> {
        let response = request.send().await.map_err(|e| {
            warn!(operation = operation, error = %e, "Search API request failed");
            SxError::Transport(format!("{operation} request failed: {e}"))
        })?;

        let status = response.status();
        let token = session_token_from(response.headers());

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(
                operation = operation,
                status = status.as_u16(),
                "Search API returned error status"
            );
            return Err(SxError::remote(status.as_u16(), body));
        }

        let body = response.json::<T>().await.map_err(|e| {
            SxError::remote(
                status.as_u16(),
                format!("Failed to parse {operation} response: {e}"),
            )
        })?;

        Ok((body, token))
    }
}

/// Build the `Cookie` value from a response's `Set-Cookie` headers.
///
/// Attributes (`Path`, `Secure`, ...) are dropped; the `name=value` pairs
/// are joined with `; `.
pub(crate) fn session_token_from(headers: &HeaderMap) -> Option<SessionToken> {
    let pairs: Vec<&str> = headers
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .filter_map(|value| value.split(';').next())
        .map(str::trim)
        .filter(|pair| !pair.is_empty())
        .collect();

    if pairs.is_empty() {
        None
    } else {
        Some(SessionToken::new(pairs.join("; ")))
    }
}
