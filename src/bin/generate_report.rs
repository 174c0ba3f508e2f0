use clap::Parser;
use cloud_report::cli::{self, Cli, RunOutcome};
use cloud_report::{CloudReportClient, ReportConfig};
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Cli::parse();

    let default_level = match args.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Checked before configuration so a missing file exits 2 without API settings.
    if !args.input.exists() {
        eprintln!("Input not found: {}", args.input.display());
        return RunOutcome::InputNotFound.exit_code();
    }

    let config = match ReportConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let system_prompt = config.system_prompt().to_string();

    let client = match CloudReportClient::new(config) {
        Ok(client) => client,
        Err(e) => {
            error!("Failed to create report client: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match cli::run(&args, &client, &system_prompt).await {
        Ok(outcome) => outcome.exit_code(),
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}
