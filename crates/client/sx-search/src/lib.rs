//! sx-search - Client for the Sumo Logic Search Job API.
//!
//! This crate covers the remote half of the export workflow:
//!
//! - Endpoint resolution from a region identifier
//! - Job creation and status polling with session cookie rotation
//! - Lazy, bounded pagination over message and record result sets
//!
//! # Example
//!
//! ```ignore
//! use futures::StreamExt;
//! use sx_search::{ResultFetcher, SearchClient, build_http_client, resolve_base_url};
//! use sx_types::{Credentials, Region, ResultKind};
//!
//! let http = build_http_client(30)?;
//! let base_url = resolve_base_url(Region::Jp, None)?;
//! let client = SearchClient::new(http, base_url, Credentials::new("id", "key"));
//!
//! let job = client.create_job(&search).await?;
//! let status = client.get_job_status(&job.id, &job.token).await?;
//!
//! let fetcher = ResultFetcher::new(client, 100);
//! let total = status.snapshot.message_count;
//! let mut pages = fetcher.fetch_all(&job.id, ResultKind::Messages, total, &status.token);
//! while let Some(page) = pages.next().await {
//!     let page = page?;
//!     eprintln!("{} rows", page.rows().len());
//! }
//! ```

pub mod client;
pub mod endpoint;
pub mod fetcher;

pub use client::{CreatedJob, JobStatus, SearchClient, build_http_client};
pub use endpoint::{base_url, resolve_base_url};
pub use fetcher::{DEFAULT_PAGE_SIZE, PageStream, PageWindow, ResultFetcher, page_windows};
