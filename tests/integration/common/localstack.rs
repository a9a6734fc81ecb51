//! LocalStack test context and utilities.

use aws_sdk_s3::Client as S3Client;
use aws_sdk_sns::Client as SnsClient;

/// LocalStack test context providing S3 and SNS clients.
pub struct LocalStackTestContext {
    pub s3: S3Client,
    pub sns: SnsClient,
    pub endpoint: String,
    pub region: String,
}

impl LocalStackTestContext {
    /// Create a new LocalStack test context.
    ///
    /// Uses the `LOCALSTACK_ENDPOINT` environment variable if set,
    /// otherwise defaults to `http://localhost:4566`.
    pub async fn new() -> Self {
        let endpoint = std::env::var("LOCALSTACK_ENDPOINT")
            .unwrap_or_else(|_| "http://localhost:4566".to_string());
        let region = "us-east-1".to_string();

        let config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_sdk_s3::config::Region::new(region.clone()))
            .endpoint_url(&endpoint)
            .load()
            .await;

        let s3_config = aws_sdk_s3::config::Builder::from(&config)
            .force_path_style(true)
            .build();

        Self {
            s3: S3Client::from_conf(s3_config),
            sns: SnsClient::new(&config),
            endpoint,
            region,
        }
    }

    /// Check if LocalStack is available and healthy.
    pub async fn is_available(&self) -> bool {
        self.s3.list_buckets().send().await.is_ok()
    }

    /// Create an S3 bucket for testing.
    pub async fn create_bucket(&self, name: &str) -> Result<(), aws_sdk_s3::Error> {
        let buckets = self.s3.list_buckets().send().await?;
        let exists = buckets
            .buckets()
            .iter()
            .any(|b| b.name().unwrap_or_default() == name);

        if !exists {
            self.s3.create_bucket().bucket(name).send().await?;
        }
        Ok(())
    }

    /// Read an S3 object as text.
    pub async fn get_object_text(&self, bucket: &str, key: &str) -> String {
        let object = self
            .s3
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .expect("object should exist");
        let bytes = object
            .body
            .collect()
            .await
            .expect("object body should be readable")
            .into_bytes();
        String::from_utf8(bytes.to_vec()).expect("object should be UTF-8")
    }

    /// Delete an S3 object.
    pub async fn delete_object(&self, bucket: &str, key: &str) -> Result<(), aws_sdk_s3::Error> {
        self.s3
            .delete_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await?;
        Ok(())
    }

    /// Create an SNS topic for testing.
    ///
    /// Returns the topic ARN.
    pub async fn create_topic(&self, name: &str) -> Result<String, aws_sdk_sns::Error> {
        let result = self.sns.create_topic().name(name).send().await?;
        Ok(result.topic_arn.unwrap_or_default())
    }
}
