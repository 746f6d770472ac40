//! [`SeriesSource`](crate::SeriesSource) implementations.
//!
//! - [`StooqSource`]: live daily CSV downloads, optionally through a read-only proxy.
//! - [`SyntheticSource`]: deterministic offline walks with planted leads.
//! - [`StaticSeriesSource`]: caller-supplied series held in memory.

mod static_source;
mod stooq;
mod synthetic;

pub use static_source::StaticSeriesSource;
pub use stooq::{
    parse_daily_csv, StooqConfig, StooqSource, DEFAULT_BASE_URL, DEFAULT_PROXY_PREFIX,
};
pub use synthetic::SyntheticSource;
