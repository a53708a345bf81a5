//! Operator console reading administrative commands line by line.

use std::io::{BufRead, Write};

use poly_config::{ErrorReport, PolyError, Snapshot};

use crate::config::TowerConfig;
use crate::error::Result;
use crate::provider::TowerConfigProvider;

/// A console command.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Re-run the load pipeline.
    Reload,
    /// Print the active snapshot.
    Show,
    /// List commands.
    Help,
    /// Leave the console.
    Quit,
}

impl Command {
    /// Parse one input line. Blank lines yield `None` and unknown words are
    /// handed back trimmed.
    pub fn parse(line: &str) -> Option<std::result::Result<Self, &str>> {
        let word = line.trim();
        let command = match word.to_ascii_lowercase().as_str() {
            "" => return None,
            "reload" | "td-reload" => Self::Reload,
            "show" => Self::Show,
            "help" | "?" => Self::Help,
            "quit" | "exit" => Self::Quit,
            _ => return Some(Err(word)),
        };
        Some(Ok(command))
    }
}

const HELP: &str = "commands: reload, show, help, quit";

/// Run commands from `input` against `provider` until `quit` or end of input.
///
/// # Errors
///
/// Returns an error only when reading input or writing output fails; rejected
/// reloads are reported on `output` and the console keeps running.
pub fn run<R: BufRead, W: Write>(provider: &TowerConfigProvider, input: R, output: &mut W) -> Result<()> {
    for line in input.lines() {
        let line = line?;
        match Command::parse(&line) {
            None => {}
            Some(Err(unknown)) => writeln!(output, "unknown command `{unknown}`; {HELP}")?,
            Some(Ok(Command::Help)) => writeln!(output, "{HELP}")?,
            Some(Ok(Command::Quit)) => break,
            Some(Ok(Command::Show)) => match provider.get() {
                Ok(snapshot) => write_snapshot(output, &snapshot)?,
                Err(err) => writeln!(output, "{err}")?,
            },
            Some(Ok(Command::Reload)) => match provider.reload() {
                Ok(snapshot) => writeln!(
                    output,
                    "configuration reloaded (generation {})",
                    snapshot.generation()
                )?,
                Err(err) => write_rejection(output, &err)?,
            },
        }
    }
    Ok(())
}

/// Write `snapshot` as pretty JSON followed by its informational entries.
///
/// # Errors
///
/// Fails when the snapshot cannot be serialised or written.
pub fn write_snapshot<W: Write>(output: &mut W, snapshot: &Snapshot<TowerConfig>) -> Result<()> {
    writeln!(output, "generation {}", snapshot.generation())?;
    writeln!(output, "{}", serde_json::to_string_pretty(snapshot.config())?)?;
    write_report(output, snapshot.report())
}

/// Write every entry of `report`, numbered.
///
/// # Errors
///
/// Fails when writing fails.
pub fn write_report<W: Write>(output: &mut W, report: &ErrorReport) -> Result<()> {
    if !report.is_empty() {
        writeln!(output, "{report}")?;
    }
    Ok(())
}

fn write_rejection<W: Write>(output: &mut W, err: &PolyError) -> Result<()> {
    writeln!(output, "failed to reload configuration; keeping the active snapshot")?;
    match err.report() {
        Some(report) => write_report(output, report),
        None => Ok(writeln!(output, "{err}")?),
    }
}
