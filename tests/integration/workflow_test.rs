//! End-to-end workflow tests against a mock search API.
//!
//! Drives start → poll → dump exactly as the state machine would, feeding
//! each step's output object into the next step.

use crate::common::{MockSearchApi, RecordingNotifier, message_rows};
use object_store::ObjectStore;
use object_store::memory::InMemory;
use object_store::path::Path as ObjectPath;
use serde_json::{Value, json};
use std::sync::Arc;
use sx_export::FixedStoreProvider;
use sx_steps::{Step, StepConfig, StepRunner};
use sx_types::{JobLifecycle, StepEvent};

fn event(value: Value) -> StepEvent {
    serde_json::from_value(value).unwrap()
}

fn runner(
    api: &MockSearchApi,
    store: Arc<dyn ObjectStore>,
    notifier: Arc<RecordingNotifier>,
) -> StepRunner {
    StepRunner::new(
        StepConfig::new().with_api_base_url(api.uri()),
        Arc::new(FixedStoreProvider::new(store)),
        notifier,
    )
    .unwrap()
}

async fn read_object(store: &Arc<dyn ObjectStore>, key: &str) -> String {
    let bytes = store
        .get(&ObjectPath::from(key))
        .await
        .unwrap()
        .bytes()
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn test_full_workflow_messages_only() {
    let api = MockSearchApi::start("JOB42").await;
    let store: Arc<dyn ObjectStore> = Arc::new(InMemory::new());
    let notifier = Arc::new(RecordingNotifier::default());
    let runner = runner(&api, Arc::clone(&store), notifier.clone());

    api.mount_create("JSESSIONID=c1").await;
    api.mount_status("JSESSIONID=c1", "JSESSIONID=c2", "GATHERING RESULTS", 120, 0).await;
    api.mount_status("JSESSIONID=c2", "JSESSIONID=c3", "DONE GATHERING RESULTS", 250, 0).await;
    api.mount_page("messages", 0, 100, &["_messageid", "_raw"], message_rows(0, 100)).await;
    api.mount_page("messages", 100, 100, &["ignored"], message_rows(100, 100)).await;
    api.mount_page("messages", 200, 50, &[], message_rows(200, 50)).await;

    // start
    let started = runner
        .run(
            Step::Start,
            &event(json!({
                "endpoint": "jp",
                "accessId": "id",
                "accessKey": "key",
                "query": "error",
                "from": "2019-02-19T00:00:00",
                "to": "2019-02-19T00:00:01",
                "timeZone": "America/Los_Angeles",
                "messages": true,
                "records": false,
                "s3Bucket": "b",
                "s3KeyPrefix": "p/",
                "snsTopicArn": "arn:aws:sns:us-east-1:000000000000:exports"
            })),
        )
        .await
        .unwrap();

    assert_eq!(started["id"], "JOB42");
    assert_eq!(started["s3KeyMessages"], "p/JOB42_messages.csv");
    assert_eq!(started["s3KeyRecords"], "p/JOB42_records.csv");

    // poll until terminal, carrying the rotated cookie forward
    let mut state = started;
    loop {
        state = runner.run(Step::Poll, &event(state)).await.unwrap();
        let lifecycle = JobLifecycle::from_state(state["state"].as_str().unwrap());
        if lifecycle.is_terminal() {
            break;
        }
    }
    assert_eq!(state["cookie"], "JSESSIONID=c3");
    assert_eq!(state["messageCount"], 250);

    // dumps
    let messages = runner.run(Step::DumpMessages, &event(state.clone())).await.unwrap();
    let records = runner.run(Step::DumpRecords, &event(state)).await.unwrap();

    assert_eq!(messages, json!({"messagesPath": "s3://b/p/JOB42_messages.csv"}));
    assert_eq!(records, Value::Null);

    let csv = read_object(&store, "p/JOB42_messages.csv").await;
    let lines: Vec<&str> = csv.split_terminator("\r\n").collect();
    assert_eq!(lines.len(), 251);
    assert_eq!(lines[0], "_messageid,_raw");
    assert_eq!(lines[1], "0,event 0");
    assert_eq!(lines[250], "249,event 249");
    assert_eq!(lines.iter().filter(|l| **l == "_messageid,_raw").count(), 1);

    let sent = notifier.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0, "arn:aws:sns:us-east-1:000000000000:exports");
    assert_eq!(sent[0].1.job_id, "JOB42");
    assert_eq!(sent[0].1.locator.as_str(), "s3://b/p/JOB42_messages.csv");
}

#[tokio::test]
async fn test_records_dump_with_explicit_keys() {
    let api = MockSearchApi::start("JOB7").await;
    let store: Arc<dyn ObjectStore> = Arc::new(InMemory::new());
    let runner = runner(&api, Arc::clone(&store), Arc::new(RecordingNotifier::default()));

    api.mount_page(
        "records",
        0,
        2,
        &["_sourcecategory", "_count"],
        vec![
            json!({"map": {"_sourcecategory": "web", "_count": "12"}}),
            json!({"map": {"_sourcecategory": "db"}}),
        ],
    )
    .await;

    let output = runner
        .run(
            Step::DumpRecords,
            &event(json!({
                "endpoint": "prod",
                "accessId": "id",
                "accessKey": "key",
                "messages": false,
                "records": true,
                "s3Bucket": "reports",
                "s3KeyMessages": "m.csv",
                "s3KeyRecords": "daily/records.csv",
                "cookie": "JSESSIONID=x",
                "id": "JOB7",
                "messageCount": 0,
                "recordCount": 2
            })),
        )
        .await
        .unwrap();

    assert_eq!(output, json!({"recordsPath": "s3://reports/daily/records.csv"}));
    assert_eq!(
        read_object(&store, "daily/records.csv").await,
        "_sourcecategory,_count\r\nweb,12\r\ndb,\r\n"
    );
}

#[tokio::test]
async fn test_step_errors_carry_stable_names() {
    let api = MockSearchApi::start("JOB1").await;
    let store: Arc<dyn ObjectStore> = Arc::new(InMemory::new());
    let runner = runner(&api, store, Arc::new(RecordingNotifier::default()));

    let err = runner
        .run(Step::Poll, &event(json!({"endpoint": "mars"})))
        .await
        .unwrap_err();
    assert_eq!(err.name(), "ValidationError");

    // Nothing mounted for this job: the API answers 404
    let err = runner
        .run(
            Step::Poll,
            &event(json!({
                "endpoint": "de",
                "accessId": "id",
                "accessKey": "key",
                "messages": true,
                "records": true,
                "s3Bucket": "b",
                "s3KeyMessages": "m.csv",
                "s3KeyRecords": "r.csv",
                "cookie": "JSESSIONID=x",
                "id": "JOB1"
            })),
        )
        .await
        .unwrap_err();
    assert_eq!(err.name(), "RemoteError");
}
