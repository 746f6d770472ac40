//! Series source contract and request/error types.
//!
//! A [`SeriesSource`] turns "daily closes for ticker X between d1 and d2" into a
//! [`PriceSeries`]. Implementations live in [`crate::sources`]; the scan pipeline only sees
//! this trait.
//!
//! # Example
//!
//! ```rust,ignore
//! use leadlag_core::{SeriesRequest, SeriesSource, StooqSource, Symbol, TradingDate};
//!
//! async fn fetch(source: &StooqSource) -> Result<(), Box<dyn std::error::Error>> {
//!     let request = SeriesRequest::new(
//!         Symbol::parse("BDRY")?,
//!         TradingDate::parse("2023-01-01")?,
//!         TradingDate::parse("2024-01-01")?,
//!     )?;
//!     let series = source.daily_closes(&request).await?;
//!     println!("{} closes", series.len());
//!     Ok(())
//! }
//! ```

use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;

use crate::{PriceSeries, ProviderId, Symbol, TradingDate};

/// Failure classification for a series fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceErrorKind {
    /// Transport failure or non-success HTTP status.
    Unavailable,
    /// The source answered but holds no rows for the ticker/range.
    NoData,
    /// The payload could not be interpreted as a price table.
    Malformed,
    InvalidRequest,
}

/// Structured fetch error; every variant means the ticker's data is unavailable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceError {
    kind: SourceErrorKind,
    message: String,
}

impl SourceError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Unavailable,
            message: message.into(),
        }
    }

    pub fn no_data(symbol: &Symbol) -> Self {
        Self {
            kind: SourceErrorKind::NoData,
            message: format!("no data for {symbol}"),
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Malformed,
            message: message.into(),
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::InvalidRequest,
            message: message.into(),
        }
    }

    pub const fn kind(&self) -> SourceErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            SourceErrorKind::Unavailable => "source.unavailable",
            SourceErrorKind::NoData => "source.no_data",
            SourceErrorKind::Malformed => "source.malformed",
            SourceErrorKind::InvalidRequest => "source.invalid_request",
        }
    }
}

impl Display for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for SourceError {}

/// Daily closes for one ticker over an inclusive date window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesRequest {
    pub symbol: Symbol,
    pub start: TradingDate,
    pub end: TradingDate,
}

impl SeriesRequest {
    pub fn new(symbol: Symbol, start: TradingDate, end: TradingDate) -> Result<Self, SourceError> {
        if start > end {
            return Err(SourceError::invalid_request(format!(
                "series window starts after it ends ({start} > {end})"
            )));
        }
        Ok(Self { symbol, start, end })
    }
}

/// Boxed future returned by [`SeriesSource::daily_closes`].
pub type SeriesFuture<'a> =
    Pin<Box<dyn Future<Output = Result<PriceSeries, SourceError>> + Send + 'a>>;

/// Source of daily close series.
///
/// Returned series are ascending by date with one close per date. Implementations must be
/// `Send + Sync`; the pipeline may issue several requests concurrently.
pub trait SeriesSource: Send + Sync {
    fn id(&self) -> ProviderId;

    fn daily_closes<'a>(&'a self, request: &'a SeriesRequest) -> SeriesFuture<'a>;
}
