mod cli;
mod commands;
mod error;
mod metadata;
mod output;

use std::io::Write;
use std::process::ExitCode;

use clap::Parser;
use tracing::Instrument;
use tracing_subscriber::filter::{EnvFilter, LevelFilter};

use crate::cli::Cli;
use crate::error::CliError;
use crate::metadata::TraceId;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.log_json);

    match run(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => report_failure(&error, &mut std::io::stderr().lock()),
    }
}

/// Writes the single fatal diagnostic line and maps the error to its exit code.
fn report_failure(error: &CliError, stderr: &mut impl Write) -> ExitCode {
    // a closed stderr leaves only the exit code
    let _ = writeln!(stderr, "error: {error}");
    ExitCode::from(error.exit_code())
}

async fn run(cli: &Cli) -> Result<(), CliError> {
    let trace_id = TraceId::new();
    let span = tracing::info_span!("leadlag", trace_id = %trace_id);

    let output = commands::run(cli, trace_id).instrument(span).await?;
    output::render(&output, cli.format, cli.pretty)?;

    let envelope = &output.envelope;
    if cli.strict && envelope.is_partial() {
        return Err(CliError::StrictModeViolation {
            warning_count: envelope.meta.warnings.len(),
            error_count: envelope.errors.len(),
        });
    }

    Ok(())
}

/// Logs go to stderr, filtered by `RUST_LOG` (default `warn`).
fn init_logging(json: bool) {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy();

    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_ansi(cfg!(debug_assertions))
            .init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fatal_error_is_reported_once() {
        let error = CliError::StrictModeViolation {
            warning_count: 1,
            error_count: 2,
        };
        let mut stderr = Vec::new();

        let code = report_failure(&error, &mut stderr);

        let written = String::from_utf8(stderr).expect("utf8");
        assert_eq!(written.lines().count(), 1);
        assert!(written.starts_with("error: "));
        assert_eq!(code, ExitCode::from(5));
    }
}
