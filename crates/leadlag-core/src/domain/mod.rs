//! # Domain Models
//!
//! Canonical, validated types shared by the fetchers, the estimator and the report layer.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Symbol`] | Validated listing ticker |
//! | [`TradingDate`] | Calendar date of a daily close |
//! | [`UtcDateTime`] | UTC timestamp used in output metadata |
//! | [`PricePoint`] | One daily close |
//! | [`PriceSeries`] | Date-ordered closes for one ticker |
//!
//! Construction validates invariants: closes are finite and positive, series dates are strictly
//! ascending, tickers are upper-case ASCII.

mod date;
mod series;
mod symbol;

pub use date::{TradingDate, UtcDateTime};
pub use series::{PricePoint, PriceSeries};
pub use symbol::Symbol;
