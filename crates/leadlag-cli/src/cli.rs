//! CLI argument definitions for leadlag.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `scan` | Estimate each ticker's lead/lag against the proxy |
//! | `chart` | Emit proxy and stock closes rebased to 100 |
//! | `show` | Re-render a previously exported results CSV |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--format` | `json` | Output format (json, table, csv) |
//! | `--pretty` | `false` | Pretty-print JSON output |
//! | `--strict` | `false` | Treat skipped tickers and warnings as errors |
//! | `--mock` | `false` | Use the deterministic offline source |
//! | `--timeout-ms` | `10000` | Per-request HTTP timeout |
//! | `--no-proxy` | `false` | Call Stooq directly instead of through the read-only proxy |
//! | `--log-json` | `false` | Emit logs to stderr as JSON lines |
//!
//! # Examples
//!
//! ```bash
//! leadlag scan GNK SBLK ZIM EGLE --format table
//! leadlag scan "GNK, SBLK" --years 5 --max-lag 90 --output results.csv
//! leadlag chart GNK ZIM --format csv > chart.csv
//! leadlag show results.csv --format table
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Lead/lag between the Baltic Dry proxy (BDRY) and shipping stocks.
#[derive(Debug, Parser)]
#[command(
    name = "leadlag",
    author,
    version,
    about = "Lead/lag correlation between BDRY and shipping stocks",
    long_about = "leadlag fetches daily closes for a freight proxy (BDRY by default) and a set \
of shipping stocks, then finds for each stock the day offset at which its returns correlate \
most strongly with the proxy's.\n\
\n\
A positive lag means the proxy leads the stock by that many trading days.\n\
\n\
Use 'leadlag <command> --help' for command-specific help."
)]
pub struct Cli {
    /// Output format for results.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Treat warnings and skipped tickers as failures (exit code 5).
    #[arg(long, global = true, default_value_t = false)]
    pub strict: bool,

    /// Use deterministic synthetic series instead of fetching from Stooq.
    #[arg(long, global = true, default_value_t = false)]
    pub mock: bool,

    /// Per-request HTTP timeout in milliseconds.
    #[arg(long, global = true, default_value_t = 10_000)]
    pub timeout_ms: u64,

    /// Fetch from Stooq directly rather than through the read-only proxy.
    #[arg(long, global = true, default_value_t = false)]
    pub no_proxy: bool,

    /// Write logs to stderr as JSON lines.
    #[arg(long, global = true, default_value_t = false)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Envelope JSON (default).
    Json,
    /// Aligned text table.
    Table,
    /// Bare CSV, no envelope.
    Csv,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Scan every ticker's lag window and rank by |correlation|.
    ///
    /// # Examples
    ///
    ///   leadlag scan GNK SBLK ZIM EGLE
    ///   leadlag scan GNK --max-lag 20 --format table
    Scan(ScanArgs),

    /// Emit chart data: every series rebased to 100 on the proxy's dates.
    Chart(ChartArgs),

    /// Load an exported results CSV and render it again.
    Show(ShowArgs),
}

/// Ticker list and scan knobs shared by `scan` and `chart`.
#[derive(Debug, Args)]
pub struct UniverseArgs {
    /// Tickers, separated by spaces and/or commas. Repeats are ignored.
    #[arg(required = true, num_args = 1..)]
    pub tickers: Vec<String>,

    /// Proxy ticker the stocks are compared against.
    #[arg(long, default_value = "BDRY")]
    pub proxy: String,

    /// Lookback in years.
    #[arg(long, default_value_t = 3)]
    pub years: u32,
}

#[derive(Debug, Args)]
pub struct ScanArgs {
    #[command(flatten)]
    pub universe: UniverseArgs,

    /// Largest lag tested in each direction, in trading days.
    #[arg(long, default_value_t = 60)]
    pub max_lag: u32,

    /// Aligned closes required before a ticker is scanned.
    #[arg(long, default_value_t = 10)]
    pub min_aligned: usize,

    /// Paired returns required for a correlation to count.
    #[arg(long, default_value_t = 5)]
    pub min_pairs: usize,

    /// Fetch stocks one after another instead of concurrently.
    #[arg(long, default_value_t = false)]
    pub sequential: bool,

    /// Also write the results CSV to this path.
    #[arg(long)]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct ChartArgs {
    #[command(flatten)]
    pub universe: UniverseArgs,
}

#[derive(Debug, Args)]
pub struct ShowArgs {
    /// Results CSV written by `scan --output` or `scan --format csv`.
    pub path: PathBuf,
}
