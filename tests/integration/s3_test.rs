//! S3 sink integration tests using LocalStack.
//!
//! These tests verify that the object store sink and a full dump step work
//! against a real S3 API (via LocalStack).

use crate::common::{LocalStackTestContext, MockSearchApi, RecordingNotifier, message_rows};
use serde_json::json;
use std::sync::Arc;
use sx_export::{S3Sink, S3StoreConfig, S3StoreProvider, StoreProvider};
use sx_steps::{Step, StepConfig, StepRunner};
use sx_types::{Destination, StepEvent};

const BUCKET: &str = "sx-integration";

#[tokio::test]
#[ignore = "requires LocalStack"]
async fn test_sink_writes_object() {
    let ctx = LocalStackTestContext::new().await;

    if !ctx.is_available().await {
        eprintln!("LocalStack not available, skipping test");
        return;
    }

    ctx.create_bucket(BUCKET).await.unwrap();
    ctx.delete_object(BUCKET, "sink/test.csv").await.ok();

    let provider = S3StoreProvider::new(
        S3StoreConfig::new()
            .with_region(&ctx.region)
            .with_endpoint(&ctx.endpoint),
    );
    let store = provider.store(BUCKET).unwrap();

    let mut sink = S3Sink::new(store, Destination::new(BUCKET, "sink/test.csv"));
    sink.write("a,b\r\n").await.unwrap();
    sink.write("1,2\r\n").await.unwrap();
    let locator = sink.finish().await.unwrap();

    assert_eq!(locator.as_str(), "s3://sx-integration/sink/test.csv");
    assert_eq!(ctx.get_object_text(BUCKET, "sink/test.csv").await, "a,b\r\n1,2\r\n");
}

#[tokio::test]
#[ignore = "requires LocalStack"]
async fn test_dump_step_to_s3() {
    let ctx = LocalStackTestContext::new().await;

    if !ctx.is_available().await {
        eprintln!("LocalStack not available, skipping test");
        return;
    }

    ctx.create_bucket(BUCKET).await.unwrap();

    let api = MockSearchApi::start("LSJOB").await;
    api.mount_page("messages", 0, 100, &["_messageid", "_raw"], message_rows(0, 100)).await;
    api.mount_page("messages", 100, 5, &["_messageid", "_raw"], message_rows(100, 5)).await;

    let config = StepConfig::new()
        .with_api_base_url(api.uri())
        .with_aws_region(&ctx.region)
        .with_s3_endpoint(&ctx.endpoint);
    let runner = StepRunner::new(
        config.clone(),
        Arc::new(S3StoreProvider::new(config.s3_store_config())),
        Arc::new(RecordingNotifier::default()),
    )
    .unwrap();

    let event: StepEvent = serde_json::from_value(json!({
        "endpoint": "us2",
        "accessId": "id",
        "accessKey": "key",
        "messages": true,
        "records": false,
        "s3Bucket": BUCKET,
        "s3KeyMessages": "dump/LSJOB_messages.csv",
        "s3KeyRecords": "dump/LSJOB_records.csv",
        "cookie": "JSESSIONID=x",
        "id": "LSJOB",
        "messageCount": 105,
        "recordCount": 0
    }))
    .unwrap();

    let output = runner.run(Step::DumpMessages, &event).await.unwrap();
    assert_eq!(output["messagesPath"], "s3://sx-integration/dump/LSJOB_messages.csv");

    let csv = ctx.get_object_text(BUCKET, "dump/LSJOB_messages.csv").await;
    assert_eq!(csv.split_terminator("\r\n").count(), 106);
    assert!(csv.starts_with("_messageid,_raw\r\n0,event 0\r\n"));
}
