//! sx-steps - Step entry points of the search export workflow.
//!
//! Each step is invoked with a flat JSON event, validates it into a typed
//! request and returns a flat JSON result:
//!
//! - `start` creates the search job and returns the session context
//! - `poll` refreshes the job status and the session cookie
//! - `dumpMessages` / `dumpRecords` stream a result set into S3 as CSV
//!
//! The external state machine sequences the steps and owns the poll cadence.
//! [`WorkflowLauncher`] starts executions of that state machine.
//!
//! # Example
//!
//! ```ignore
//! use sx_steps::{Step, StepConfig, StepRunner};
//!
//! let runner = StepRunner::from_config(StepConfig::new().with_aws_region("us-east-1")).await?;
//! let context = runner.run(Step::Start, &event).await?;
//! ```

pub mod config;
mod dump;
pub mod request;
pub mod sfn;
pub mod steps;

pub use config::{DEFAULT_HTTP_TIMEOUT_SECS, StepConfig};
pub use request::{DumpRequest, KeyPlan, PollRequest, StartRequest};
pub use sfn::{
    ApiRequest, ApiResponse, ExecutionStarter, LaunchOutput, SfnExecutionStarter,
    StartedExecution, WorkflowLauncher,
};
pub use steps::{DumpOutput, PollOutput, Step, StepRunner};
