//! Per-ticker orchestration: fetch the proxy, then fetch, align and scan every stock.
//!
//! A ticker whose fetch fails is dropped from the results and recorded as a
//! [`TickerFailure`]; the run only fails as a whole when the proxy is missing or when no
//! ticker could be fetched at all.

use std::time::Instant;

use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::analysis::{AlignedPrices, LagBound, LagScanner};
use crate::chart::ChartData;
use crate::config::{DateWindow, FetchMode, ScanConfig};
use crate::data_source::{SeriesRequest, SeriesSource, SourceError};
use crate::report::{rank_by_strength, LagResult};
use crate::{PriceSeries, ProviderId, ScanError, Symbol, TradingDate};

/// A ticker that was skipped because its series could not be fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickerFailure {
    pub ticker: Symbol,
    pub code: String,
    pub message: String,
}

impl TickerFailure {
    pub fn from_source_error(ticker: Symbol, error: &SourceError) -> Self {
        Self {
            ticker,
            code: error.code().to_owned(),
            message: error.message().to_owned(),
        }
    }
}

/// Serializable outcome of one scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanReport {
    pub proxy: Symbol,
    pub source: ProviderId,
    pub start: TradingDate,
    pub end: TradingDate,
    pub max_lag: LagBound,
    /// Ranked by descending |correlation|, undefined last.
    pub results: Vec<LagResult>,
    pub failures: Vec<TickerFailure>,
}

/// Report plus the fetched series, kept for chart building.
#[derive(Debug, Clone)]
pub struct ScanRun {
    pub report: ScanReport,
    pub proxy_series: PriceSeries,
    /// Successfully fetched stocks, in input order.
    pub stock_series: Vec<PriceSeries>,
}

impl ScanRun {
    pub fn chart(&self) -> ChartData {
        ChartData::build(&self.proxy_series, &self.stock_series)
    }
}

/// Runs a full scan against `source` over `window`.
pub async fn run_scan(
    source: &dyn SeriesSource,
    config: &ScanConfig,
    window: DateWindow,
) -> Result<ScanRun, ScanError> {
    let started = Instant::now();
    let scanner = LagScanner::new(config.max_lag)
        .with_min_aligned_dates(config.min_aligned_dates)
        .with_min_pairs(config.min_paired_returns);

    let proxy_series = fetch(source, &config.proxy, window)
        .await
        .map_err(|source_error| ScanError::ProxyUnavailable {
            symbol: config.proxy.clone(),
            source: source_error,
        })?;
    info!(
        ticker = %config.proxy,
        rows = proxy_series.len(),
        source = %source.id(),
        "fetched proxy series"
    );

    let outcomes = match config.fetch_mode {
        FetchMode::Concurrent => {
            join_all(
                config
                    .tickers
                    .iter()
                    .map(|ticker| scan_ticker(source, &proxy_series, &scanner, ticker, window)),
            )
            .await
        }
        FetchMode::Sequential => {
            let mut outcomes = Vec::with_capacity(config.tickers.len());
            for ticker in &config.tickers {
                outcomes.push(scan_ticker(source, &proxy_series, &scanner, ticker, window).await);
            }
            outcomes
        }
    };

    let mut results = Vec::new();
    let mut stock_series = Vec::new();
    let mut failures = Vec::new();
    for outcome in outcomes {
        match outcome {
            Ok((result, series)) => {
                results.push(result);
                stock_series.push(series);
            }
            Err(failure) => failures.push(failure),
        }
    }

    if results.is_empty() {
        return Err(ScanError::NoUsableTickers { failures });
    }
    rank_by_strength(&mut results);

    info!(
        scanned = results.len(),
        failed = failures.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "scan complete"
    );

    Ok(ScanRun {
        report: ScanReport {
            proxy: config.proxy.clone(),
            source: source.id(),
            start: window.start,
            end: window.end,
            max_lag: config.max_lag,
            results,
            failures,
        },
        proxy_series,
        stock_series,
    })
}

async fn scan_ticker(
    source: &dyn SeriesSource,
    proxy: &PriceSeries,
    scanner: &LagScanner,
    ticker: &Symbol,
    window: DateWindow,
) -> Result<(LagResult, PriceSeries), TickerFailure> {
    let series = match fetch(source, ticker, window).await {
        Ok(series) => series,
        Err(error) => {
            warn!(ticker = %ticker, error = %error, "skipping ticker");
            return Err(TickerFailure::from_source_error(ticker.clone(), &error));
        }
    };

    let aligned = AlignedPrices::from_series(proxy, &series);
    let estimate = scanner.scan_aligned(&aligned);
    if estimate.correlation.is_none() {
        warn!(
            ticker = %ticker,
            aligned = aligned.len(),
            "no defined correlation for ticker"
        );
    } else {
        info!(
            ticker = %ticker,
            lag = estimate.lag,
            correlation = estimate.correlation,
            sample_size = estimate.sample_size,
            "scanned ticker"
        );
    }

    Ok((LagResult::from_estimate(ticker.clone(), estimate), series))
}

async fn fetch(
    source: &dyn SeriesSource,
    symbol: &Symbol,
    window: DateWindow,
) -> Result<PriceSeries, SourceError> {
    let request = SeriesRequest::new(symbol.clone(), window.start, window.end)?;
    source.daily_closes(&request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::{StaticSeriesSource, SyntheticSource};
    use crate::PricePoint;

    fn symbol(raw: &str) -> Symbol {
        Symbol::parse(raw).expect("symbol")
    }

    fn window() -> DateWindow {
        DateWindow {
            start: TradingDate::parse("2023-01-02").expect("date"),
            end: TradingDate::parse("2023-12-29").expect("date"),
        }
    }

    fn config(tickers: &str) -> ScanConfig {
        ScanConfig::new(Symbol::parse_list(tickers).expect("tickers"))
            .expect("config")
            .max_lag(LagBound::new(8).expect("bound"))
    }

    #[tokio::test]
    async fn failed_ticker_is_reported_not_raised() {
        let synthetic = SyntheticSource::new(symbol("BDRY"), 11);
        let mut source = StaticSeriesSource::new();
        for ticker in ["BDRY", "GNK", "SBLK"] {
            let request = SeriesRequest::new(symbol(ticker), window().start, window().end)
                .expect("request");
            source = source.with_series(synthetic.daily_closes(&request).await.expect("series"));
        }
        let source = source.with_failure(symbol("ZIM"), SourceError::unavailable("HTTP 503"));

        let run = run_scan(&source, &config("GNK ZIM SBLK"), window())
            .await
            .expect("run");

        assert_eq!(run.report.results.len(), 2);
        assert_eq!(run.report.failures.len(), 1);
        assert_eq!(run.report.failures[0].ticker, symbol("ZIM"));
        assert_eq!(run.report.failures[0].code, "source.unavailable");
        assert_eq!(run.stock_series.len(), 2);
    }

    #[tokio::test]
    async fn missing_proxy_aborts_the_run() {
        let source = StaticSeriesSource::new();
        let err = run_scan(&source, &config("GNK"), window())
            .await
            .expect_err("must fail");
        assert!(matches!(err, ScanError::ProxyUnavailable { .. }));
    }

    #[tokio::test]
    async fn all_failures_yield_no_usable_tickers() {
        let proxy = PriceSeries::new(
            symbol("BDRY"),
            vec![PricePoint::new(window().start, 10.0).expect("point")],
        )
        .expect("series");
        let source = StaticSeriesSource::new().with_series(proxy);

        let err = run_scan(&source, &config("GNK, ZIM"), window())
            .await
            .expect_err("must fail");
        match err {
            ScanError::NoUsableTickers { failures } => assert_eq!(failures.len(), 2),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn sequential_and_concurrent_runs_agree() {
        let source = SyntheticSource::new(symbol("BDRY"), 3);
        let concurrent = run_scan(&source, &config("GNK EGLE SBLK"), window())
            .await
            .expect("run");
        let sequential = run_scan(
            &source,
            &config("GNK EGLE SBLK").fetch_mode(FetchMode::Sequential),
            window(),
        )
        .await
        .expect("run");

        assert_eq!(concurrent.report, sequential.report);
    }

    #[tokio::test]
    async fn results_are_ranked_by_strength() {
        let source = SyntheticSource::new(symbol("BDRY"), 5);
        let run = run_scan(&source, &config("GNK EGLE SBLK ZIM"), window())
            .await
            .expect("run");

        let strengths: Vec<f64> = run
            .report
            .results
            .iter()
            .filter_map(LagResult::strength)
            .collect();
        assert!(strengths.windows(2).all(|pair| pair[0] >= pair[1]));
    }
}
