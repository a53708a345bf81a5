//! `tower-config` entry point: install logging, parse arguments, run.

use std::process::ExitCode;

use clap::Parser;
use tower_defense::cli::{CheckOutcome, Cli, run};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> color_eyre::Result<ExitCode> {
    color_eyre::install()?;
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    match run(&cli).map_err(color_eyre::eyre::Report::from)? {
        CheckOutcome::Valid => Ok(ExitCode::SUCCESS),
        CheckOutcome::Invalid => Ok(ExitCode::FAILURE),
    }
}
