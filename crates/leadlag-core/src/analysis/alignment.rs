use std::collections::BTreeMap;

use crate::{PriceSeries, TradingDate};

/// Date-keyed closes for one series. One price per date.
pub type DatePriceMap = BTreeMap<TradingDate, f64>;

/// Collapses a series to one close per date; a later point on the same date overwrites.
pub fn date_price_map(series: &PriceSeries) -> DatePriceMap {
    let mut map = DatePriceMap::new();
    for point in series.points() {
        map.insert(point.date, point.close);
    }
    map
}

/// Ascending dates present in both maps. Empty when they do not overlap.
pub fn intersect_dates(a: &DatePriceMap, b: &DatePriceMap) -> Vec<TradingDate> {
    a.keys().filter(|date| b.contains_key(date)).copied().collect()
}

/// Two price sequences re-indexed onto their common dates.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedPrices {
    pub dates: Vec<TradingDate>,
    pub proxy: Vec<f64>,
    pub stock: Vec<f64>,
}

impl AlignedPrices {
    pub fn from_series(proxy: &PriceSeries, stock: &PriceSeries) -> Self {
        let proxy_map = date_price_map(proxy);
        let stock_map = date_price_map(stock);
        let dates = intersect_dates(&proxy_map, &stock_map);

        // every date came from both key sets
        let proxy = dates.iter().filter_map(|date| proxy_map.get(date)).copied().collect();
        let stock = dates.iter().filter_map(|date| stock_map.get(date)).copied().collect();

        Self {
            dates,
            proxy,
            stock,
        }
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}
