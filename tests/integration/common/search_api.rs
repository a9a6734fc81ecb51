//! Mock search job API and recording collaborators.

use async_trait::async_trait;
use serde_json::{Value, json};
use std::sync::Mutex;
use sx_error::Result;
use sx_export::{CompletionMessage, Notifier};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// A mock search API serving one job.
pub struct MockSearchApi {
    pub server: MockServer,
    pub job_id: String,
}

impl MockSearchApi {
    pub async fn start(job_id: &str) -> Self {
        Self {
            server: MockServer::start().await,
            job_id: job_id.to_string(),
        }
    }

    pub fn uri(&self) -> String {
        self.server.uri()
    }

    /// Job creation, issuing `cookie`.
    pub async fn mount_create(&self, cookie: &str) {
        Mock::given(method("POST"))
            .and(path("/api/v1/search/jobs"))
            .respond_with(
                ResponseTemplate::new(202)
                    .insert_header("Set-Cookie", format!("{cookie}; Path=/api; HttpOnly"))
                    .set_body_json(json!({"id": self.job_id})),
            )
            .expect(1)
            .mount(&self.server)
            .await;
    }

    /// One status response for a request carrying `expected_cookie`,
    /// rotating it to `next_cookie`.
    pub async fn mount_status(
        &self,
        expected_cookie: &str,
        next_cookie: &str,
        state: &str,
        message_count: u64,
        record_count: u64,
    ) {
        Mock::given(method("GET"))
            .and(path(format!("/api/v1/search/jobs/{}", self.job_id)))
            .and(header("Cookie", expected_cookie))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("Set-Cookie", format!("{next_cookie}; Path=/api"))
                    .set_body_json(json!({
                        "state": state,
                        "messageCount": message_count,
                        "recordCount": record_count,
                        "pendingWarnings": [],
                        "pendingErrors": []
                    })),
            )
            .expect(1)
            .mount(&self.server)
            .await;
    }

    /// One result page of `kind` ("messages" or "records").
    pub async fn mount_page(
        &self,
        kind: &str,
        offset: u64,
        limit: u64,
        fields: &[&str],
        rows: Vec<Value>,
    ) {
        let fields: Vec<Value> = fields.iter().map(|name| json!({"name": name})).collect();
        let mut body = json!({ "fields": fields });
        body[kind] = Value::Array(rows);

        Mock::given(method("GET"))
            .and(path(format!("/api/v1/search/jobs/{}/{kind}", self.job_id)))
            .and(query_param("offset", offset.to_string()))
            .and(query_param("limit", limit.to_string()))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .expect(1)
            .mount(&self.server)
            .await;
    }
}

/// `count` message rows starting at `start`.
pub fn message_rows(start: u64, count: u64) -> Vec<Value> {
    (start..start + count)
        .map(|i| json!({"map": {"_messageid": i.to_string(), "_raw": format!("event {i}")}}))
        .collect()
}

/// Notifier that keeps every message it is asked to publish.
#[derive(Default)]
pub struct RecordingNotifier {
    pub sent: Mutex<Vec<(String, CompletionMessage)>>,
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, topic: &str, _subject: &str, message: &CompletionMessage) -> Result<()> {
        self.sent
            .lock()
            .unwrap()
            .push((topic.to_string(), message.clone()));
        Ok(())
    }
}
