//! Integration tests for the search export workflow.
//!
//! `workflow_test` drives every step against a mock search API and an
//! in-memory object store and always runs. The S3 and SNS tests require
//! LocalStack and are marked as `#[ignore]`.
//!
//! ## Running the LocalStack tests
//!
//! 1. Start LocalStack:
//!    ```bash
//!    docker run -d -p 4566:4566 localstack/localstack
//!    ```
//!
//! 2. Run the ignored tests:
//!    ```bash
//!    AWS_ACCESS_KEY_ID=test AWS_SECRET_ACCESS_KEY=test \
//!      LOCALSTACK_ENDPOINT=http://localhost:4566 cargo test -p integration-tests -- --ignored
//!    ```

mod common;
mod s3_test;
mod sns_test;
mod workflow_test;
