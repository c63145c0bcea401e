use std::process::ExitCode;

use clap::Parser;

use jira_assign::cli::{self, Cli};
use jira_assign::report::ConsoleReporter;
use jira_assign::telemetry;

#[tokio::main]
async fn main() -> ExitCode {
    // A missing .env is fine; flags and the real environment still apply.
    let _ = dotenvy::dotenv();
    telemetry::init_tracing();

    let cli = Cli::parse();

    match cli::dispatch(cli.command, &ConsoleReporter).await {
        Ok(Some(_)) => ExitCode::SUCCESS,
        Ok(None) => {
            tracing::warn!("finished with errors, continuing because fail_on_error is off");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{err:#}");
            ExitCode::FAILURE
        }
    }
}
