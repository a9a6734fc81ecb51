//! Streaming object store sink.

use bytes::Bytes;
use object_store::aws::AmazonS3Builder;
use object_store::buffered::BufWriter;
use object_store::path::Path as ObjectPath;
use object_store::{ClientOptions, ObjectStore};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;
use sx_error::{Result, SxError};
use sx_types::{Destination, Locator};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

/// Configuration for the S3 object stores backing sinks.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct S3StoreConfig {
    /// AWS region
    pub region: Option<String>,

    /// Custom endpoint URL (for LocalStack)
    pub endpoint: Option<String>,

    /// Request timeout in seconds
    pub timeout_secs: Option<u64>,
}

impl S3StoreConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the AWS region.
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Set a custom endpoint (for LocalStack).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set the request timeout in seconds.
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = Some(timeout_secs);
        self
    }
}

/// Hands out the object store for a bucket.
pub trait StoreProvider: Send + Sync {
    fn store(&self, bucket: &str) -> Result<Arc<dyn ObjectStore>>;
}

/// S3-backed stores, created on first use and cached per bucket.
pub struct S3StoreProvider {
    config: S3StoreConfig,
    store_cache: RwLock<HashMap<String, Arc<dyn ObjectStore>>>,
}

impl S3StoreProvider {
    pub fn new(config: S3StoreConfig) -> Self {
        Self {
            config,
            store_cache: RwLock::new(HashMap::new()),
        }
    }

    fn build_store(&self, bucket: &str) -> Result<Arc<dyn ObjectStore>> {
        debug!(bucket = bucket, "Creating S3 object store");

        // Credentials come from the standard AWS environment variables
        let mut builder = AmazonS3Builder::from_env()
            .with_bucket_name(bucket)
            .with_client_options(client_options(&self.config));

        if let Some(region) = &self.config.region {
            builder = builder.with_region(region);
        }

        if let Some(endpoint) = &self.config.endpoint {
            builder = builder
                .with_endpoint(endpoint)
                .with_allow_http(true)
                .with_virtual_hosted_style_request(false);
        }

        let store = builder
            .build()
            .map_err(|e| SxError::Sink(format!("Failed to create S3 object store: {e}")))?;
        Ok(Arc::new(store))
    }
}

impl StoreProvider for S3StoreProvider {
    fn store(&self, bucket: &str) -> Result<Arc<dyn ObjectStore>> {
        {
            let cache = self.store_cache.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(store) = cache.get(bucket) {
                return Ok(Arc::clone(store));
            }
        }

        let mut cache = self.store_cache.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(store) = cache.get(bucket) {
            return Ok(Arc::clone(store));
        }

        let store = self.build_store(bucket)?;
        cache.insert(bucket.to_string(), Arc::clone(&store));
        Ok(store)
    }
}

/// One store serving every bucket; used with in-memory stores.
pub struct FixedStoreProvider {
    store: Arc<dyn ObjectStore>,
}

impl FixedStoreProvider {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self { store }
    }
}

impl StoreProvider for FixedStoreProvider {
    fn store(&self, _bucket: &str) -> Result<Arc<dyn ObjectStore>> {
        Ok(Arc::clone(&self.store))
    }
}

fn client_options(config: &S3StoreConfig) -> ClientOptions {
    let options = ClientOptions::new()
        .with_pool_idle_timeout(Duration::from_secs(90))
        .with_connect_timeout(Duration::from_secs(10));

    match config.timeout_secs {
        Some(secs) => options.with_timeout(Duration::from_secs(secs)),
        None => options,
    }
}

/// Append-only writer for one destination object.
///
/// Chunks are buffered and uploaded as multipart parts once the buffer
/// fills; `write` only waits when an upload is in flight. The object becomes
/// visible when `finish` completes. A failed sink leaves whatever was
/// uploaded in place.
pub struct S3Sink {
    writer: BufWriter,
    destination: Destination,
    bytes_written: u64,
}

impl S3Sink {
    pub fn new(store: Arc<dyn ObjectStore>, destination: Destination) -> Self {
        let writer = BufWriter::new(store, ObjectPath::from(destination.key.as_str()));
        Self {
            writer,
            destination,
            bytes_written: 0,
        }
    }

    pub fn destination(&self) -> &Destination {
        &self.destination
    }

    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    /// Append a chunk.
    pub async fn write(&mut self, chunk: &str) -> Result<()> {
        if chunk.is_empty() {
            return Ok(());
        }

        self.writer
            .put(Bytes::copy_from_slice(chunk.as_bytes()))
            .await
            .map_err(|e| {
                warn!(locator = %self.destination.locator(), error = %e, "Sink write failed");
                SxError::Sink(format!("Failed to write to {}: {e}", self.destination.locator()))
            })?;

        self.bytes_written += chunk.len() as u64;
        Ok(())
    }

    /// Complete the upload and return the object's locator.
    pub async fn finish(mut self) -> Result<Locator> {
        let locator = self.destination.locator();

        self.writer.shutdown().await.map_err(|e| {
            warn!(locator = %locator, error = %e, "Sink finalization failed");
            SxError::Sink(format!("Failed to finalize {locator}: {e}"))
        })?;

        info!(locator = %locator, bytes = self.bytes_written, "Upload complete");
        Ok(locator)
    }
}
