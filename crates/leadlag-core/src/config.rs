use serde::{Deserialize, Serialize};

use crate::analysis::{LagBound, MIN_ALIGNED_DATES, MIN_PAIRED_OBSERVATIONS};
use crate::{Symbol, TradingDate, ValidationError};

/// Ticker of the Baltic Dry proxy ETF.
pub const DEFAULT_PROXY: &str = "BDRY";
pub const DEFAULT_YEARS_BACK: u32 = 3;
pub const MAX_YEARS_BACK: u32 = 30;

/// Extra calendar days fetched before the lookback so the first returns are usable.
const WINDOW_PADDING_DAYS: u32 = 30;

/// How stock series are fetched once the proxy is in hand.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchMode {
    #[default]
    Concurrent,
    Sequential,
}

/// Everything one scan run needs, validated up front.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanConfig {
    pub proxy: Symbol,
    pub tickers: Vec<Symbol>,
    pub years_back: u32,
    pub max_lag: LagBound,
    pub min_aligned_dates: usize,
    pub min_paired_returns: usize,
    pub fetch_mode: FetchMode,
}

impl ScanConfig {
    /// Defaults around the given tickers. The proxy itself is dropped from the list.
    pub fn new(tickers: Vec<Symbol>) -> Result<Self, ValidationError> {
        let proxy = Symbol::parse(DEFAULT_PROXY)?;
        Self::with_proxy(proxy, tickers)
    }

    pub fn with_proxy(proxy: Symbol, tickers: Vec<Symbol>) -> Result<Self, ValidationError> {
        let tickers: Vec<Symbol> = tickers.into_iter().filter(|t| *t != proxy).collect();
        if tickers.is_empty() {
            return Err(ValidationError::NoTickers);
        }
        Ok(Self {
            proxy,
            tickers,
            years_back: DEFAULT_YEARS_BACK,
            max_lag: LagBound::default(),
            min_aligned_dates: MIN_ALIGNED_DATES,
            min_paired_returns: MIN_PAIRED_OBSERVATIONS,
            fetch_mode: FetchMode::default(),
        })
    }

    pub fn years_back(mut self, years: u32) -> Result<Self, ValidationError> {
        if years == 0 || years > MAX_YEARS_BACK {
            return Err(ValidationError::InvalidLookback {
                value: years,
                max: MAX_YEARS_BACK,
            });
        }
        self.years_back = years;
        Ok(self)
    }

    pub fn max_lag(mut self, max_lag: LagBound) -> Self {
        self.max_lag = max_lag;
        self
    }

    /// Overlap thresholds: aligned closes before scanning, paired returns per correlation.
    pub fn min_overlap(
        mut self,
        min_aligned_dates: usize,
        min_paired_returns: usize,
    ) -> Result<Self, ValidationError> {
        if min_aligned_dates < 2 {
            return Err(ValidationError::InvalidOverlapThreshold {
                field: "min_aligned_dates",
                value: min_aligned_dates,
                min: 2,
            });
        }
        if min_paired_returns < 2 {
            return Err(ValidationError::InvalidOverlapThreshold {
                field: "min_paired_returns",
                value: min_paired_returns,
                min: 2,
            });
        }
        self.min_aligned_dates = min_aligned_dates;
        self.min_paired_returns = min_paired_returns;
        Ok(self)
    }

    pub fn fetch_mode(mut self, fetch_mode: FetchMode) -> Self {
        self.fetch_mode = fetch_mode;
        self
    }

    /// Fetch window ending at `today`.
    pub fn window(&self, today: TradingDate) -> DateWindow {
        DateWindow::from_years(today, self.years_back)
    }
}

/// Inclusive calendar window requested from the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    pub start: TradingDate,
    pub end: TradingDate,
}

impl DateWindow {
    /// `years` of 365 days plus a 30-day pad, ending at `end`.
    pub fn from_years(end: TradingDate, years: u32) -> Self {
        let days = years
            .saturating_mul(365)
            .saturating_add(WINDOW_PADDING_DAYS);
        Self {
            start: end.days_before(days),
            end,
        }
    }
}
