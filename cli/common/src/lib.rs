//! Shared utilities for the search export CLI binaries.

pub mod args;
pub mod logging;
pub mod report;

pub use args::LogLevel;
pub use logging::init_logging;
pub use report::{ErrorReport, exit_code};
