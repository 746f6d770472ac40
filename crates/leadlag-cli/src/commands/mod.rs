mod chart;
mod scan;
mod show;

use std::time::Instant;

use leadlag_core::{
    Envelope, EnvelopeError, ProviderId, ScanConfig, SeriesSource, StooqConfig, StooqSource,
    Symbol, SyntheticSource,
};
use serde_json::Value;

use crate::cli::{Cli, Command, UniverseArgs};
use crate::error::CliError;
use crate::metadata::{Metadata, TraceId};

/// Seed of the `--mock` source; fixed so offline runs are reproducible.
const MOCK_SEED: u64 = 0x00B0_A7D5;

pub struct CommandResult {
    pub data: Value,
    /// Text rendering for `--format table`.
    pub table: String,
    /// Bare rendering for `--format csv`.
    pub csv: String,
    pub warnings: Vec<String>,
    pub errors: Vec<EnvelopeError>,
    pub source: ProviderId,
}

impl CommandResult {
    pub fn new(data: Value, source: ProviderId) -> Self {
        Self {
            data,
            table: String::new(),
            csv: String::new(),
            warnings: Vec::new(),
            errors: Vec::new(),
            source,
        }
    }

    pub fn with_table(mut self, table: String) -> Self {
        self.table = table;
        self
    }

    pub fn with_csv(mut self, csv: String) -> Self {
        self.csv = csv;
        self
    }

    pub fn with_warnings(mut self, warnings: Vec<String>) -> Self {
        self.warnings.extend(warnings);
        self
    }

    pub fn with_errors(mut self, errors: Vec<EnvelopeError>) -> Self {
        self.errors.extend(errors);
        self
    }
}

/// Envelope plus the alternative renderings of the same result.
pub struct CommandOutput {
    pub envelope: Envelope<Value>,
    pub table: String,
    pub csv: String,
}

pub async fn run(cli: &Cli, trace_id: TraceId) -> Result<CommandOutput, CliError> {
    let started = Instant::now();

    let command_result = match &cli.command {
        Command::Scan(args) => {
            let source = build_source(cli, &args.universe)?;
            scan::run(args, source.as_ref()).await?
        }
        Command::Chart(args) => {
            let source = build_source(cli, &args.universe)?;
            chart::run(args, source.as_ref()).await?
        }
        Command::Show(args) => show::run(args)?,
    };

    let CommandResult {
        data,
        table,
        csv,
        warnings,
        errors,
        source,
    } = command_result;

    let latency_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
    let mut metadata = Metadata::new(trace_id, source, latency_ms);
    for warning in warnings {
        metadata.push_warning(warning);
    }

    let meta = metadata.into_envelope_meta()?;
    let envelope = Envelope::new(meta, data, errors)?;
    Ok(CommandOutput {
        envelope,
        table,
        csv,
    })
}

/// Validated scan configuration for the tickers and lookback on the command line.
fn universe_config(args: &UniverseArgs) -> Result<ScanConfig, CliError> {
    let tickers = Symbol::parse_list(&args.tickers.join(" "))?;
    let proxy = Symbol::parse(&args.proxy)?;
    let config = ScanConfig::with_proxy(proxy, tickers)?.years_back(args.years)?;
    Ok(config)
}

fn build_source(cli: &Cli, universe: &UniverseArgs) -> Result<Box<dyn SeriesSource>, CliError> {
    if cli.mock {
        let proxy = Symbol::parse(&universe.proxy)?;
        return Ok(Box::new(SyntheticSource::new(proxy, MOCK_SEED)));
    }

    let mut config = StooqConfig::from_env().with_timeout_ms(cli.timeout_ms);
    if cli.no_proxy {
        config = config.without_proxy();
    }
    Ok(Box::new(StooqSource::new(config)))
}

fn ticker_errors(
    failures: &[leadlag_core::TickerFailure],
) -> Result<Vec<EnvelopeError>, CliError> {
    failures
        .iter()
        .map(|failure| EnvelopeError::for_failure(failure).map_err(CliError::from))
        .collect()
}
