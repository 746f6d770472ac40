use thiserror::Error;

use crate::data_source::SourceError;
use crate::pipeline::TickerFailure;
use crate::Symbol;

/// Validation and contract errors exposed by `leadlag-core`.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    #[error("symbol cannot be empty")]
    EmptySymbol,
    #[error("symbol length {len} exceeds max {max}")]
    SymbolTooLong { len: usize, max: usize },
    #[error("symbol must start with an ASCII letter: '{ch}'")]
    SymbolInvalidStart { ch: char },
    #[error("symbol contains invalid character '{ch}' at index {index}")]
    SymbolInvalidChar { ch: char, index: usize },

    #[error("date must be YYYY-MM-DD: '{value}'")]
    InvalidDate { value: String },
    #[error("timestamp must be RFC3339 UTC (suffix Z): '{value}'")]
    TimestampNotUtc { value: String },

    #[error("close price on {date} must be finite and positive, got {value}")]
    InvalidClose { date: String, value: f64 },
    #[error("series dates must be strictly ascending: {previous} is followed by {next}")]
    UnorderedSeries { previous: String, next: String },

    #[error("at least one ticker is required")]
    NoTickers,
    #[error("lookback must be between 1 and {max} years, got {value}")]
    InvalidLookback { value: u32, max: u32 },
    #[error("lag bound must be between 1 and {max}, got {value}")]
    InvalidLagBound { value: u32, max: u32 },
    #[error("minimum overlap '{field}' must be at least {min}, got {value}")]
    InvalidOverlapThreshold {
        field: &'static str,
        value: usize,
        min: usize,
    },

    #[error("request_id must be at least 8 characters")]
    InvalidRequestId,
    #[error("trace_id must be 32 hex characters")]
    InvalidTraceId,
    #[error("schema_version must match vMAJOR.MINOR.PATCH: '{value}'")]
    InvalidSchemaVersion { value: String },

    #[error("error code cannot be empty")]
    EmptyErrorCode,
    #[error("error message cannot be empty")]
    EmptyErrorMessage,
}

/// Top-level error type for core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("csv row {row}: {message}")]
    CsvRow { row: usize, message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Run-level failures of a scan; per-ticker problems are reported, not raised.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("proxy series {symbol} is unavailable: {source}")]
    ProxyUnavailable {
        symbol: Symbol,
        source: SourceError,
    },

    #[error("no usable tickers: all {} fetches failed", .failures.len())]
    NoUsableTickers { failures: Vec<TickerFailure> },
}

impl ScanError {
    pub const fn code(&self) -> &'static str {
        match self {
            Self::ProxyUnavailable { .. } => "scan.proxy_unavailable",
            Self::NoUsableTickers { .. } => "scan.no_usable_tickers",
        }
    }
}
