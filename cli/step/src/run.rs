//! Step execution for the CLI.

use serde_json::Value;
use sx_error::{Result, SxError, ValidationError};
use sx_steps::{ApiRequest, SfnExecutionStarter, Step, StepConfig, StepRunner, WorkflowLauncher};
use sx_types::StepEvent;
use tokio::io::AsyncReadExt;
use tracing::debug;

use crate::args::{Cli, Command};

/// Build the step configuration from CLI arguments.
pub fn step_config(args: &Cli) -> StepConfig {
    let mut config = StepConfig::new()
        .with_page_size(args.page_size)
        .with_http_timeout(args.http_timeout);

    if let Some(url) = &args.api_base_url {
        config = config.with_api_base_url(url);
    }
    if let Some(region) = &args.region {
        config = config.with_aws_region(region);
    }
    if let Some(endpoint) = &args.s3_endpoint {
        config = config.with_s3_endpoint(endpoint);
    }
    if let Some(endpoint) = &args.sns_endpoint {
        config = config.with_sns_endpoint(endpoint);
    }
    if let Some(arn) = &args.state_machine_arn {
        config = config.with_state_machine_arn(arn);
    }
    if let Some(endpoint) = &args.sfn_endpoint {
        config = config.with_sfn_endpoint(endpoint);
    }

    config
}

/// Execute the selected step and return its output object.
pub async fn execute(args: &Cli) -> Result<Value> {
    let input = read_input(&args.input).await?;
    let config = step_config(args);

    debug!(command = ?args.command, input_len = input.len(), "Running step");

    match args.command {
        Command::Start => run_step(config, Step::Start, &input).await,
        Command::Poll => run_step(config, Step::Poll, &input).await,
        Command::DumpMessages => run_step(config, Step::DumpMessages, &input).await,
        Command::DumpRecords => run_step(config, Step::DumpRecords, &input).await,
        Command::Launch => {
            let launcher = WorkflowLauncher::new(SfnExecutionStarter::from_config(&config).await?);
            let output = launcher.launch(parse_input(&input)?).await?;
            to_value(&output)
        }
        Command::LaunchApi => {
            let launcher = WorkflowLauncher::new(SfnExecutionStarter::from_config(&config).await?);
            let request: ApiRequest = parse_input(&input)?;
            let response = launcher.launch_api(request).await?;
            to_value(&response)
        }
    }
}

async fn run_step(config: StepConfig, step: Step, input: &str) -> Result<Value> {
    let event: StepEvent = parse_input(input)?;
    let runner = StepRunner::from_config(config).await?;
    runner.run(step, &event).await
}

/// Read the event from a file, or stdin for `-`.
async fn read_input(path: &str) -> Result<String> {
    if path == "-" {
        let mut input = String::new();
        tokio::io::stdin()
            .read_to_string(&mut input)
            .await
            .map_err(|e| SxError::Config(format!("Failed to read stdin: {e}")))?;
        Ok(input)
    } else {
        tokio::fs::read_to_string(path)
            .await
            .map_err(|e| SxError::Config(format!("Failed to read input file '{path}': {e}")))
    }
}

/// Parse the input as a JSON object of the expected shape.
pub fn parse_input<T: serde::de::DeserializeOwned>(input: &str) -> Result<T> {
    serde_json::from_str(input).map_err(|e| {
        SxError::from(ValidationError::Constraint(format!(
            "Input is not a valid event object: {e}"
        )))
    })
}

fn to_value<T: serde::Serialize>(output: &T) -> Result<Value> {
    serde_json::to_value(output)
        .map_err(|e| SxError::Encode(format!("Failed to serialize output: {e}")))
}
