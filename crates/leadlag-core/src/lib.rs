//! # Leadlag Core
//!
//! Lead/lag estimation between a dry-bulk freight proxy (BDRY by default) and shipping stocks.
//!
//! ## Overview
//!
//! - **Domain models** for tickers, trading dates and daily close series
//! - **Analysis**: date alignment, returns, Pearson correlation and the lag scanner
//! - **Series sources** behind the [`SeriesSource`] trait (Stooq, synthetic, in-memory)
//! - **Scan pipeline** that isolates per-ticker failures
//! - **Reporting**: ranked results, text table, CSV export/import and chart data
//! - **Response envelope** with metadata and structured errors
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`analysis`] | Alignment, returns, correlation, lag scan |
//! | [`chart`] | Rebased chart series |
//! | [`config`] | Scan configuration and date window |
//! | [`data_source`] | Series source trait and request/error types |
//! | [`domain`] | Validated domain types |
//! | [`envelope`] | Response envelope with metadata |
//! | [`error`] | Core error types |
//! | [`http_client`] | HTTP client abstraction |
//! | [`pipeline`] | Per-ticker orchestration |
//! | [`report`] | Results table and CSV |
//! | [`source`] | Provider identifiers |
//! | [`sources`] | Source implementations |
//! | [`throttling`] | Request rate limiting |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use leadlag_core::{run_scan, ScanConfig, StooqConfig, StooqSource, Symbol, TradingDate};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ScanConfig::new(Symbol::parse_list("GNK SBLK ZIM EGLE")?)?;
//!     let source = StooqSource::new(StooqConfig::from_env());
//!
//!     let run = run_scan(&source, &config, config.window(TradingDate::today_utc())).await?;
//!     println!("{}", leadlag_core::status_line(&run.report.results));
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │  CLI / User     │
//! └────────┬────────┘
//!          │ ScanConfig
//!          ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │  Scan Pipeline  │────▶│ Series Source    │──▶ HTTP Client (throttled)
//! └────────┬────────┘     └──────────────────┘
//!          │ per ticker
//!          ▼
//! ┌─────────────────┐
//! │ Align → Returns │
//! │ → Lag Scanner   │
//! └────────┬────────┘
//!          ▼
//! ┌─────────────────┐
//! │ Report / Chart  │
//! └─────────────────┘
//! ```

pub mod analysis;
pub mod chart;
pub mod config;
pub mod data_source;
pub mod domain;
pub mod envelope;
pub mod error;
pub mod http_client;
pub mod pipeline;
pub mod report;
pub mod source;
pub mod sources;
pub mod throttling;

pub use analysis::{AlignedPrices, LagBound, LagEstimate, LagScanner};
pub use chart::{ChartData, ChartLine};
pub use config::{DateWindow, FetchMode, ScanConfig};
pub use data_source::{SeriesRequest, SeriesSource, SourceError, SourceErrorKind};
pub use domain::{PricePoint, PriceSeries, Symbol, TradingDate, UtcDateTime};
pub use envelope::{Envelope, EnvelopeError, EnvelopeMeta};
pub use error::{CoreError, ScanError, ValidationError};
pub use pipeline::{run_scan, ScanReport, ScanRun, TickerFailure};
pub use report::{read_csv, render_table, status_line, write_csv, LagResult};
pub use source::ProviderId;
pub use sources::{StaticSeriesSource, StooqConfig, StooqSource, SyntheticSource};
