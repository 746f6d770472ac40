use std::io::{self, Write};

use crate::cli::OutputFormat;
use crate::commands::CommandOutput;
use crate::error::CliError;

pub fn render(output: &CommandOutput, format: OutputFormat, pretty: bool) -> Result<(), CliError> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match format {
        OutputFormat::Json => {
            let payload = if pretty {
                serde_json::to_string_pretty(&output.envelope)?
            } else {
                serde_json::to_string(&output.envelope)?
            };
            writeln!(out, "{payload}")?;
        }
        OutputFormat::Table => {
            out.write_all(output.table.as_bytes())?;
            render_diagnostics(output)?;
        }
        OutputFormat::Csv => {
            out.write_all(output.csv.as_bytes())?;
            render_diagnostics(output)?;
        }
    }

    out.flush()?;
    Ok(())
}

/// Warnings and per-ticker errors go to stderr so table/CSV stdout stays clean.
fn render_diagnostics(output: &CommandOutput) -> Result<(), CliError> {
    let stderr = io::stderr();
    let mut err = stderr.lock();
    for warning in &output.envelope.meta.warnings {
        writeln!(err, "warning: {warning}")?;
    }
    for error in &output.envelope.errors {
        match &error.ticker {
            Some(ticker) => writeln!(err, "skipped {ticker}: {} ({})", error.message, error.code)?,
            None => writeln!(err, "error: {} ({})", error.message, error.code)?,
        }
    }
    Ok(())
}
