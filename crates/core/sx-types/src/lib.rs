//! Core types for the search export pipeline.
//!
//! This crate defines the values threaded through the workflow steps:
//! - [`Region`] - Closed set of search API deployments
//! - [`SessionContext`] - Everything a step hands to the next one
//! - [`JobStatusSnapshot`] - One poll of a search job
//! - [`ResultPage`] / [`Schema`] - Pages of result rows
//! - [`StepEvent`] - Raw flat input accepted by every step

pub mod destination;
pub mod event;
pub mod region;
pub mod result;
pub mod session;
pub mod status;

pub use destination::{Destination, Locator};
pub use event::StepEvent;
pub use region::Region;
pub use result::{ResultKind, ResultPage, ResultRow, Schema};
pub use session::{Credentials, SearchParams, SearchTime, SessionContext, SessionToken};
pub use status::{JobLifecycle, JobStatusSnapshot};
