use time::Weekday;

use crate::data_source::{SeriesFuture, SeriesRequest, SeriesSource, SourceError};
use crate::{PricePoint, PriceSeries, ProviderId, Symbol, TradingDate};

const BASE_PRICE: f64 = 100.0;
const PROXY_VOLATILITY: f64 = 0.03;
const NOISE_VOLATILITY: f64 = 0.01;
const MAX_LEAD: u64 = 5;

/// Offline source producing repeatable random walks.
///
/// The proxy walks on its own; every other ticker follows the proxy's returns after a lead of
/// 1 to 5 weekdays derived from the ticker, plus independent noise. Dates are weekdays only.
#[derive(Debug, Clone)]
pub struct SyntheticSource {
    proxy: Symbol,
    seed: u64,
}

impl SyntheticSource {
    pub fn new(proxy: Symbol, seed: u64) -> Self {
        Self { proxy, seed }
    }

    /// Lead, in trading days, that `symbol` lags the proxy by. Zero for the proxy itself.
    pub fn lead_of(&self, symbol: &Symbol) -> i32 {
        if *symbol == self.proxy {
            return 0;
        }
        // bounded by MAX_LEAD
        (symbol_seed(symbol) % MAX_LEAD + 1) as i32
    }

    fn build(&self, request: &SeriesRequest) -> Result<PriceSeries, SourceError> {
        let dates = weekdays(request.start, request.end);
        if dates.is_empty() {
            return Err(SourceError::no_data(&request.symbol));
        }

        let proxy_returns = walk(self.seed, dates.len(), PROXY_VOLATILITY);
        let returns = if request.symbol == self.proxy {
            proxy_returns
        } else {
            let lead = self.lead_of(&request.symbol) as usize;
            let noise = walk(
                self.seed ^ symbol_seed(&request.symbol),
                dates.len(),
                NOISE_VOLATILITY,
            );
            noise
                .iter()
                .enumerate()
                .map(|(index, eps)| {
                    let driver = index
                        .checked_sub(lead)
                        .and_then(|source| proxy_returns.get(source))
                        .copied()
                        .unwrap_or_default();
                    0.8 * driver + eps
                })
                .collect()
        };

        let mut close = BASE_PRICE;
        let mut points = Vec::with_capacity(dates.len());
        for (date, ret) in dates.into_iter().zip(returns) {
            close *= 1.0 + ret;
            let point = PricePoint::new(date, close).map_err(|e| {
                SourceError::malformed(format!("synthetic walk left valid range: {e}"))
            })?;
            points.push(point);
        }

        PriceSeries::new(request.symbol.clone(), points)
            .map_err(|e| SourceError::malformed(e.to_string()))
    }
}

impl SeriesSource for SyntheticSource {
    fn id(&self) -> ProviderId {
        ProviderId::Synthetic
    }

    fn daily_closes<'a>(&'a self, request: &'a SeriesRequest) -> SeriesFuture<'a> {
        let result = self.build(request);
        Box::pin(async move { result })
    }
}

fn walk(seed: u64, len: usize, volatility: f64) -> Vec<f64> {
    let mut rng = fastrand::Rng::with_seed(seed);
    (0..len)
        .map(|_| (rng.f64() * 2.0 - 1.0) * volatility)
        .collect()
}

fn weekdays(start: TradingDate, end: TradingDate) -> Vec<TradingDate> {
    let mut dates = Vec::new();
    let mut current = start.into_inner();
    let last = end.into_inner();
    while current <= last {
        if !matches!(current.weekday(), Weekday::Saturday | Weekday::Sunday) {
            dates.push(TradingDate::from_date(current));
        }
        match current.next_day() {
            Some(next) => current = next,
            None => break,
        }
    }
    dates
}

fn symbol_seed(symbol: &Symbol) -> u64 {
    symbol.as_str().bytes().fold(0_u64, |acc, byte| {
        acc.wrapping_mul(33).wrapping_add(u64::from(byte))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{AlignedPrices, LagBound, LagScanner};

    fn source() -> SyntheticSource {
        SyntheticSource::new(Symbol::parse("BDRY").expect("symbol"), 7)
    }

    fn request(ticker: &str) -> SeriesRequest {
        SeriesRequest::new(
            Symbol::parse(ticker).expect("symbol"),
            TradingDate::parse("2023-01-02").expect("date"),
            TradingDate::parse("2023-12-29").expect("date"),
        )
        .expect("request")
    }

    #[tokio::test]
    async fn series_are_repeatable_and_skip_weekends() {
        let first = source().daily_closes(&request("GNK")).await.expect("series");
        let second = source().daily_closes(&request("GNK")).await.expect("series");

        assert_eq!(first, second);
        let weekend = |p: &PricePoint| {
            matches!(
                p.date.into_inner().weekday(),
                Weekday::Saturday | Weekday::Sunday
            )
        };
        assert!(!first.points().iter().any(weekend));
    }

    #[tokio::test]
    async fn scanner_recovers_the_planted_lead() {
        let source = source();
        let proxy = source.daily_closes(&request("BDRY")).await.expect("proxy");
        let stock = source.daily_closes(&request("SBLK")).await.expect("stock");

        let aligned = AlignedPrices::from_series(&proxy, &stock);
        let estimate = LagScanner::new(LagBound::new(10).expect("bound")).scan_aligned(&aligned);

        assert_eq!(estimate.lag, source.lead_of(stock.symbol()));
        assert!(estimate.correlation.expect("defined") > 0.8);
    }

    #[test]
    fn empty_window_is_no_data() {
        let saturday = TradingDate::parse("2023-01-07").expect("date");
        let request = SeriesRequest::new(Symbol::parse("GNK").expect("symbol"), saturday, saturday)
            .expect("request");
        let err = source().build(&request).expect_err("must fail");
        assert_eq!(err.code(), "source.no_data");
    }
}
