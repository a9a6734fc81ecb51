//! Common utilities for integration tests.
//!
//! Shared infrastructure for LocalStack-based testing and a mock of the
//! search job API.

pub mod localstack;
pub mod search_api;

pub use localstack::LocalStackTestContext;
pub use search_api::{MockSearchApi, RecordingNotifier, message_rows};
