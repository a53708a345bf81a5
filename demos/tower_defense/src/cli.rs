//! Command-line interface of `tower-config`.

use std::io::{self, Write};
use std::sync::Arc;

use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};
use poly_config::ErrorReport;

use crate::catalog::ContentCatalog;
use crate::config::TowerConfig;
use crate::console;
use crate::error::Result;
use crate::provider::{self, TowerConfigProvider};
use crate::schema;

/// Inspect and reload the tower-defense gamemode configuration.
#[derive(Debug, Parser)]
#[command(name = "tower-config", version, about)]
pub struct Cli {
    /// Directory holding `config.yaml`.
    #[arg(long, short = 'd', default_value = ".", global = true)]
    pub config_dir: Utf8PathBuf,

    /// Action to perform.
    #[command(subcommand)]
    pub command: Command,
}

/// Actions of `tower-config`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Decode the configuration and print every collected problem.
    Check,
    /// Decode the configuration and print the resulting snapshot.
    Show,
    /// Load the configuration and accept `reload`, `show` and `quit` on stdin.
    Console,
}

/// Outcome of `check`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckOutcome {
    /// No blocking problem was found.
    Valid,
    /// At least one blocking problem was found.
    Invalid,
}

/// Execute `cli`.
///
/// # Errors
///
/// Returns an error when the configuration cannot be loaded or output cannot
/// be written.
pub fn run(cli: &Cli) -> Result<CheckOutcome> {
    let content = Arc::new(ContentCatalog::vanilla());
    match cli.command {
        Command::Check => check(cli, &content, &mut io::stdout().lock()),
        Command::Show => {
            let provider = TowerConfigProvider::open(cli.config_dir.clone(), &content)?;
            let snapshot = provider.get()?;
            console::write_snapshot(&mut io::stdout().lock(), &snapshot)?;
            Ok(CheckOutcome::Valid)
        }
        Command::Console => {
            let provider = TowerConfigProvider::open(cli.config_dir.clone(), &content)?;
            provider.subscribe(|snapshot| {
                tracing::info!(generation = snapshot.generation(), "TD configuration reloaded");
            });
            console::run(&provider, io::stdin().lock(), &mut io::stdout().lock())?;
            Ok(CheckOutcome::Valid)
        }
    }
}

/// Decode the configuration without publishing it and write the report.
///
/// # Errors
///
/// Returns an error when the file cannot be read or output cannot be written.
pub fn check<W: Write>(cli: &Cli, content: &Arc<ContentCatalog>, output: &mut W) -> Result<CheckOutcome> {
    let engine = schema::engine(content)?;
    let (config, errors) = engine.load::<TowerConfig>(&provider::sources(&cli.config_dir))?.into_parts();
    let report = ErrorReport::from(errors);
    console::write_report(output, &report)?;
    if config.is_some() && !report.is_blocking() {
        writeln!(output, "configuration is valid")?;
        Ok(CheckOutcome::Valid)
    } else {
        writeln!(output, "configuration is invalid: {} blocking problem(s)", report.blocking().count())?;
        Ok(CheckOutcome::Invalid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(&["tower-config", "check"], Command::Check, ".")]
    #[case(&["tower-config", "-d", "plugins/td", "show"], Command::Show, "plugins/td")]
    #[case(&["tower-config", "console", "--config-dir", "srv"], Command::Console, "srv")]
    fn parses_arguments(#[case] args: &[&str], #[case] command: Command, #[case] dir: &str) {
        let cli = Cli::try_parse_from(args).expect("valid arguments");
        assert_eq!(cli.command, command);
        assert_eq!(cli.config_dir, dir);
    }

    #[rstest]
    fn missing_subcommand_is_rejected() {
        assert!(Cli::try_parse_from(["tower-config"]).is_err());
    }
}
