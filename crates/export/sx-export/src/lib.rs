//! sx-export - Turning result pages into stored CSV objects.
//!
//! - [`encode`] renders a page of rows against the dump's schema
//! - [`S3Sink`] streams the encoded chunks into one object
//! - [`Notifier`] announces a finished object on a topic

pub mod encoder;
pub mod notifier;
pub mod sink;

pub use encoder::encode;
pub use notifier::{CompletionMessage, Notifier, SnsConfig, SnsNotifier};
pub use sink::{FixedStoreProvider, S3Sink, S3StoreConfig, S3StoreProvider, StoreProvider};
