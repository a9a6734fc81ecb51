//! sx-step CLI
//!
//! Runs one step of the search export workflow the way a function host would.

use clap::Parser;
use sx_cli_common::{ErrorReport, exit_code, init_logging};
use tracing::error;

mod args;
mod run;

use args::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    // Logs go to stderr, stdout carries only the step output
    init_logging(args.log_level)?;

    match run::execute(&args).await {
        Ok(output) => {
            let rendered = if args.pretty {
                serde_json::to_string_pretty(&output)?
            } else {
                serde_json::to_string(&output)?
            };
            println!("{rendered}");
            Ok(())
        }
        Err(e) => {
            error!(error_type = e.name(), error = %e, "Step failed");
            eprintln!("{}", ErrorReport::from_error(&e).to_json());
            std::process::exit(exit_code(&e));
        }
    }
}
