use std::sync::Arc;

use tracing::{debug, warn};

use crate::data_source::{SeriesFuture, SeriesRequest, SeriesSource, SourceError};
use crate::http_client::{HttpClient, HttpRequest, ReqwestHttpClient};
use crate::throttling::FetchThrottle;
use crate::{PricePoint, PriceSeries, ProviderId, Symbol, TradingDate};

pub const DEFAULT_BASE_URL: &str = "http://stooq.com/q/d/l/";
pub const DEFAULT_PROXY_PREFIX: &str = "https://r.jina.ai/";

const BASE_URL_ENV: &str = "LEADLAG_STOOQ_URL";
const PROXY_PREFIX_ENV: &str = "LEADLAG_PROXY_PREFIX";

/// Endpoint and transport settings for [`StooqSource`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StooqConfig {
    pub base_url: String,
    /// Prepended verbatim to the download URL; the inner URL is not encoded.
    pub proxy_prefix: Option<String>,
    pub timeout_ms: u64,
    pub requests_per_second: u32,
}

impl Default for StooqConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            proxy_prefix: Some(DEFAULT_PROXY_PREFIX.to_owned()),
            timeout_ms: 10_000,
            requests_per_second: 5,
        }
    }
}

impl StooqConfig {
    /// Defaults overridden by `LEADLAG_STOOQ_URL` and `LEADLAG_PROXY_PREFIX`.
    ///
    /// An empty `LEADLAG_PROXY_PREFIX` disables the proxy.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(base_url) = std::env::var(BASE_URL_ENV) {
            let base_url = base_url.trim();
            if !base_url.is_empty() {
                config.base_url = base_url.to_owned();
            }
        }
        if let Ok(prefix) = std::env::var(PROXY_PREFIX_ENV) {
            config.proxy_prefix = Some(prefix.trim().to_owned()).filter(|p| !p.is_empty());
        }
        config
    }

    pub fn without_proxy(mut self) -> Self {
        self.proxy_prefix = None;
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Full download URL for one ticker and window.
    pub fn download_url(&self, symbol: &Symbol, start: TradingDate, end: TradingDate) -> String {
        let ticker = symbol.as_str().to_ascii_lowercase();
        let raw = format!(
            "{}?s={}.us&d1={}&d2={}&i=d",
            self.base_url,
            urlencoding::encode(&ticker),
            start.format_compact(),
            end.format_compact()
        );
        match &self.proxy_prefix {
            Some(prefix) => format!("{prefix}{raw}"),
            None => raw,
        }
    }
}

/// Daily closes from Stooq's CSV download endpoint (US listings).
#[derive(Clone)]
pub struct StooqSource {
    config: StooqConfig,
    http_client: Arc<dyn HttpClient>,
    throttle: FetchThrottle,
}

impl StooqSource {
    pub fn new(config: StooqConfig) -> Self {
        Self::with_http_client(config, Arc::new(ReqwestHttpClient::new()))
    }

    pub fn with_http_client(config: StooqConfig, http_client: Arc<dyn HttpClient>) -> Self {
        let throttle = FetchThrottle::per_second(config.requests_per_second);
        Self {
            config,
            http_client,
            throttle,
        }
    }

    pub fn config(&self) -> &StooqConfig {
        &self.config
    }

    async fn fetch(&self, request: &SeriesRequest) -> Result<PriceSeries, SourceError> {
        let url = self
            .config
            .download_url(&request.symbol, request.start, request.end);

        self.throttle.acquire().await;
        let http_request = HttpRequest::get(url)
            .with_header("Cache-Control", "no-store")
            .with_timeout_ms(self.config.timeout_ms);

        let response = self.http_client.execute(http_request).await.map_err(|e| {
            SourceError::unavailable(format!(
                "stooq transport error for {}: {}",
                request.symbol,
                e.message()
            ))
        })?;

        if !response.is_success() {
            return Err(SourceError::unavailable(format!(
                "stooq returned HTTP {} for {}",
                response.status, request.symbol
            )));
        }

        parse_daily_csv(&request.symbol, &response.body)
    }
}

impl std::fmt::Debug for StooqSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StooqSource")
            .field("config", &self.config)
            .field("throttle", &self.throttle)
            .finish_non_exhaustive()
    }
}

impl SeriesSource for StooqSource {
    fn id(&self) -> ProviderId {
        ProviderId::Stooq
    }

    fn daily_closes<'a>(&'a self, request: &'a SeriesRequest) -> SeriesFuture<'a> {
        Box::pin(self.fetch(request))
    }
}

/// Parses a Stooq daily CSV body into a date-ordered series.
///
/// Anything before the `Date,` header line is ignored (the read-only proxy prepends its own
/// preamble). Rows whose date or close cannot be read are skipped. Repeated dates keep the
/// last row.
pub fn parse_daily_csv(symbol: &Symbol, body: &str) -> Result<PriceSeries, SourceError> {
    let Some(table) = locate_table(body) else {
        return Err(SourceError::no_data(symbol));
    };

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(table.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| SourceError::malformed(format!("unreadable header for {symbol}: {e}")))?
        .clone();
    let column = |name: &str| headers.iter().position(|header| header == name);
    let (Some(date_column), Some(close_column)) = (column("Date"), column("Close")) else {
        return Err(SourceError::malformed(format!(
            "stooq table for {symbol} lacks Date/Close columns"
        )));
    };

    let mut points = Vec::new();
    let mut skipped = 0_usize;
    for record in reader.records() {
        let Ok(record) = record else {
            skipped += 1;
            continue;
        };
        let point = record
            .get(date_column)
            .zip(record.get(close_column))
            .and_then(|(date, close)| {
                let date = TradingDate::parse(date).ok()?;
                let close = close.parse::<f64>().ok()?;
                PricePoint::new(date, close).ok()
            });
        match point {
            Some(point) => points.push(point),
            None => skipped += 1,
        }
    }

    if skipped > 0 {
        warn!(ticker = %symbol, skipped, "skipped unreadable stooq rows");
    }
    if points.is_empty() {
        return Err(SourceError::no_data(symbol));
    }

    debug!(ticker = %symbol, rows = points.len(), "parsed stooq series");
    Ok(PriceSeries::from_unordered(symbol.clone(), points))
}

fn locate_table(body: &str) -> Option<&str> {
    let mut offset = 0;
    for line in body.split_inclusive('\n') {
        if line.trim_start().starts_with("Date,") {
            return Some(body[offset..].trim());
        }
        offset += line.len();
    }
    None
}
