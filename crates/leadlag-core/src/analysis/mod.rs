//! Lead/lag estimation between the proxy series and one stock.
//!
//! The pipeline per ticker is:
//!
//! ```text
//! PriceSeries x2 ──▶ AlignedPrices ──▶ pct_returns x2 ──▶ LagScanner ──▶ LagEstimate
//!                    (common dates)                       (pearson per lag)
//! ```
//!
//! Everything here is synchronous and allocation-light; a full ±120 scan over three years of
//! daily closes is a few hundred thousand multiply-adds.

mod alignment;
mod correlation;
mod lag_scan;
mod returns;

pub use alignment::{date_price_map, intersect_dates, AlignedPrices, DatePriceMap};
pub use correlation::{pearson, pearson_with_minimum, MIN_PAIRED_OBSERVATIONS};
pub use lag_scan::{lagged_pairs, LagBound, LagEstimate, LagScanner, MIN_ALIGNED_DATES};
pub use returns::{finite_pairs, pct_returns};
