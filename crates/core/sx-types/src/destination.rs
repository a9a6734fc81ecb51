//! Object store destinations and locators.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Where one dump is written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Destination {
    /// S3 bucket name
    pub bucket: String,

    /// Object key within the bucket
    pub key: String,
}

impl Destination {
    /// Create a destination.
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
        }
    }

    /// Canonical `s3://bucket/key` locator of this destination.
    pub fn locator(&self) -> Locator {
        Locator(format!("s3://{}/{}", self.bucket, self.key))
    }
}

/// Canonical `s3://bucket/key` string identifying a written object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Locator(String);

impl Locator {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Locator> for String {
    fn from(locator: Locator) -> Self {
        locator.0
    }
}
