//! `generate-report` command: rough notes in, structured markdown report out.

use crate::client::ReportGenerator;
use crate::logging::log_info;
use crate::report::{build_user_prompt, ensure_minimum_sections, write_report, SourceType};
use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

/// Exit status when `--input` does not exist.
pub const EXIT_INPUT_NOT_FOUND: u8 = 2;

/// How a successful [`run`] ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Written,
    InputNotFound,
}

impl RunOutcome {
    pub fn exit_code(self) -> ExitCode {
        match self {
            Self::Written => ExitCode::SUCCESS,
            Self::InputNotFound => ExitCode::from(EXIT_INPUT_NOT_FOUND),
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "generate-report")]
#[command(about = "Generate structured daily report from rough notes using cloud API.")]
pub struct Cli {
    /// Path to rough note file
    #[arg(long)]
    pub input: PathBuf,

    /// Output markdown path
    #[arg(long)]
    pub output: PathBuf,

    /// Report date (ISO format), defaults to today
    #[arg(long, default_value_t = today())]
    pub date: String,

    #[arg(long, value_enum, default_value_t = SourceType::Manual)]
    pub source_type: SourceType,

    #[arg(long, default_value = "local")]
    pub source_id: String,

    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

fn today() -> String {
    chrono::Local::now().date_naive().to_string()
}

/// Run the command against `generator`.
///
/// Returns [`RunOutcome::InputNotFound`] without calling the generator when
/// the input file is missing.
pub async fn run<G>(cli: &Cli, generator: &G, system_prompt: &str) -> anyhow::Result<RunOutcome>
where
    G: ReportGenerator + ?Sized,
{
    if !cli.input.exists() {
        eprintln!("Input not found: {}", cli.input.display());
        return Ok(RunOutcome::InputNotFound);
    }

    let raw_notes = std::fs::read_to_string(&cli.input)
        .with_context(|| format!("Failed to read notes {}", cli.input.display()))?;

    let user_prompt = build_user_prompt(&raw_notes, cli.source_type, &cli.source_id, &cli.date);
    let text = generator
        .generate(system_prompt, &user_prompt)
        .await
        .context("Report generation failed")?;
    let text = ensure_minimum_sections(&text, &cli.date);

    write_report(&cli.output, &text)?;
    log_info!(output = %cli.output.display(), date = %cli.date, "Report generated");
    println!("Wrote report: {}", cli.output.display());

    Ok(RunOutcome::Written)
}
