//! CLI argument definitions for sx-step.

use clap::{Parser, Subcommand};
use sx_cli_common::LogLevel;

/// Run one step of the search export workflow.
///
/// Reads the step event (a flat JSON object) from a file or stdin, runs the
/// step and writes the resulting JSON object to stdout. Failures are written
/// to stderr as `{"errorType": ..., "errorMessage": ...}`.
///
/// ## Examples
///
/// Start a search job:
///   sx-step start --input start.json
///
/// Chain start and poll:
///   sx-step start < start.json | sx-step poll
///
/// Dump messages to a LocalStack bucket:
///   sx-step --s3-endpoint http://localhost:4566 dump-messages -i polled.json
#[derive(Parser, Debug)]
#[command(name = "sx-step")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Path of the input event, `-` for stdin
    #[arg(short, long, global = true, default_value = "-")]
    pub input: String,

    /// Pretty-print the output object
    #[arg(long, global = true)]
    pub pretty: bool,

    // === Search API Options ===
    /// Send search API calls here instead of the endpoint's address
    #[arg(long, global = true, env = "SX_API_BASE_URL")]
    pub api_base_url: Option<String>,

    /// Rows requested per result page (must be >= 1)
    #[arg(
        long,
        global = true,
        env = "SX_PAGE_SIZE",
        default_value = "100",
        value_parser = parse_positive_u64
    )]
    pub page_size: u64,

    /// Search API request timeout in seconds (must be >= 1)
    #[arg(
        long,
        global = true,
        env = "SX_HTTP_TIMEOUT_SECS",
        default_value = "30",
        value_parser = parse_positive_u64
    )]
    pub http_timeout: u64,

    // === AWS Options ===
    /// AWS region
    #[arg(long, global = true, env = "AWS_REGION")]
    pub region: Option<String>,

    /// Custom S3 endpoint URL (for LocalStack)
    #[arg(long, global = true, env = "SX_S3_ENDPOINT")]
    pub s3_endpoint: Option<String>,

    /// Custom SNS endpoint URL (for LocalStack)
    #[arg(long, global = true, env = "SX_SNS_ENDPOINT")]
    pub sns_endpoint: Option<String>,

    /// State machine started by `launch` and `launch-api`
    #[arg(long, global = true, env = "SX_STATE_MACHINE_ARN")]
    pub state_machine_arn: Option<String>,

    /// Custom Step Functions endpoint URL (for LocalStack)
    #[arg(long, global = true, env = "SX_SFN_ENDPOINT")]
    pub sfn_endpoint: Option<String>,

    // === Logging Options ===
    /// Log level
    #[arg(long, global = true, value_enum, default_value = "info")]
    pub log_level: LogLevel,
}

/// Workflow step to run.
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Create the search job
    Start,
    /// Poll the search job status
    Poll,
    /// Write the message results to S3
    DumpMessages,
    /// Write the record results to S3
    DumpRecords,
    /// Start a workflow execution
    Launch,
    /// Start a workflow execution from an HTTP-style request with a JSON body
    LaunchApi,
}

/// Parse a positive u64 (>= 1).
fn parse_positive_u64(s: &str) -> Result<u64, String> {
    let value: u64 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;
    if value == 0 {
        return Err("value must be at least 1".to_string());
    }
    Ok(value)
}
