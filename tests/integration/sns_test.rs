//! SNS notifier integration tests using LocalStack.

use crate::common::LocalStackTestContext;
use sx_export::{CompletionMessage, Notifier, SnsConfig, SnsNotifier};
use sx_types::{Destination, ResultKind, SearchTime};

fn completion_message() -> CompletionMessage {
    CompletionMessage {
        query: Some("error".to_string()),
        from: Some(SearchTime::parse("2019-02-19T00:00:00").unwrap()),
        to: Some(SearchTime::parse("2019-02-19T00:00:01").unwrap()),
        job_id: "JOB1".to_string(),
        kind: ResultKind::Records,
        locator: Destination::new("b", "JOB1_records.csv").locator(),
    }
}

#[tokio::test]
#[ignore = "requires LocalStack"]
async fn test_publish_to_topic() {
    let ctx = LocalStackTestContext::new().await;

    if !ctx.is_available().await {
        eprintln!("LocalStack not available, skipping test");
        return;
    }

    let topic_arn = ctx.create_topic("sx-exports").await.unwrap();
    let notifier = SnsNotifier::new(
        &SnsConfig::new()
            .with_region(&ctx.region)
            .with_endpoint(&ctx.endpoint),
    )
    .await;

    let message = completion_message();
    notifier
        .notify(&topic_arn, &message.subject(), &message)
        .await
        .unwrap();
}

#[tokio::test]
#[ignore = "requires LocalStack"]
async fn test_publish_to_missing_topic_fails() {
    let ctx = LocalStackTestContext::new().await;

    if !ctx.is_available().await {
        eprintln!("LocalStack not available, skipping test");
        return;
    }

    let notifier = SnsNotifier::new(
        &SnsConfig::new()
            .with_region(&ctx.region)
            .with_endpoint(&ctx.endpoint),
    )
    .await;

    let message = completion_message();
    let err = notifier
        .notify(
            "arn:aws:sns:us-east-1:000000000000:does-not-exist",
            &message.subject(),
            &message,
        )
        .await
        .unwrap_err();

    assert_eq!(err.name(), "NotifyError");
}
