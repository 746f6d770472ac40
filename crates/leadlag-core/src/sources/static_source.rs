use std::collections::HashMap;

use crate::data_source::{SeriesFuture, SeriesRequest, SeriesSource, SourceError};
use crate::{PriceSeries, ProviderId, Symbol};

/// In-memory series keyed by ticker, trimmed to the requested window on every call.
///
/// Tickers registered with [`StaticSeriesSource::with_failure`] always fail with that error.
#[derive(Debug, Clone, Default)]
pub struct StaticSeriesSource {
    series: HashMap<Symbol, PriceSeries>,
    failures: HashMap<Symbol, SourceError>,
}

impl StaticSeriesSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_series(mut self, series: PriceSeries) -> Self {
        self.series.insert(series.symbol().clone(), series);
        self
    }

    pub fn with_failure(mut self, symbol: Symbol, error: SourceError) -> Self {
        self.failures.insert(symbol, error);
        self
    }

    fn lookup(&self, request: &SeriesRequest) -> Result<PriceSeries, SourceError> {
        if let Some(error) = self.failures.get(&request.symbol) {
            return Err(error.clone());
        }
        let series = self
            .series
            .get(&request.symbol)
            .ok_or_else(|| SourceError::no_data(&request.symbol))?;

        let points = series
            .points()
            .iter()
            .filter(|point| point.date >= request.start && point.date <= request.end)
            .copied()
            .collect::<Vec<_>>();
        if points.is_empty() {
            return Err(SourceError::no_data(&request.symbol));
        }
        Ok(PriceSeries::from_unordered(request.symbol.clone(), points))
    }
}

impl SeriesSource for StaticSeriesSource {
    fn id(&self) -> ProviderId {
        ProviderId::Static
    }

    fn daily_closes<'a>(&'a self, request: &'a SeriesRequest) -> SeriesFuture<'a> {
        let result = self.lookup(request);
        Box::pin(async move { result })
    }
}
