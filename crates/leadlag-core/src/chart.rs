//! Chart-ready price data: every series rebased to 100 and laid on the proxy's date axis.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{CoreError, PriceSeries, Symbol, TradingDate};

/// Value every series starts from after rebasing.
pub const REBASE_LEVEL: f64 = 100.0;

/// Rescales so the first close maps to [`REBASE_LEVEL`].
pub fn rebase(closes: &[f64]) -> Vec<f64> {
    let Some(&base) = closes.first() else {
        return Vec::new();
    };
    closes.iter().map(|close| close / base * REBASE_LEVEL).collect()
}

/// One line on the chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartLine {
    pub symbol: Symbol,
    pub is_proxy: bool,
    /// One entry per axis date; `None` where the ticker did not trade.
    pub values: Vec<Option<f64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartData {
    pub dates: Vec<TradingDate>,
    pub lines: Vec<ChartLine>,
}

impl ChartData {
    /// Builds the chart with the proxy's dates as the x-axis.
    pub fn build(proxy: &PriceSeries, stocks: &[PriceSeries]) -> Self {
        let dates: Vec<TradingDate> = proxy.points().iter().map(|point| point.date).collect();

        let mut lines = Vec::with_capacity(stocks.len() + 1);
        lines.push(ChartLine {
            symbol: proxy.symbol().clone(),
            is_proxy: true,
            values: rebase(&proxy.closes()).into_iter().map(Some).collect(),
        });

        for stock in stocks {
            let by_date: HashMap<TradingDate, f64> = stock
                .points()
                .iter()
                .map(|point| point.date)
                .zip(rebase(&stock.closes()))
                .collect();
            lines.push(ChartLine {
                symbol: stock.symbol().clone(),
                is_proxy: false,
                values: dates.iter().map(|date| by_date.get(date).copied()).collect(),
            });
        }

        Self { dates, lines }
    }

    /// `Date,<ticker>,…` with one row per axis date and empty cells for gaps.
    pub fn to_csv(&self) -> Result<String, CoreError> {
        let mut writer = csv::Writer::from_writer(Vec::new());

        let mut header = vec![String::from("Date")];
        header.extend(self.lines.iter().map(|line| line.symbol.to_string()));
        writer.write_record(&header)?;

        for (row, date) in self.dates.iter().enumerate() {
            let mut record = vec![date.format_iso()];
            for line in &self.lines {
                record.push(
                    line.values
                        .get(row)
                        .copied()
                        .flatten()
                        .map(|value| format!("{value:.4}"))
                        .unwrap_or_default(),
                );
            }
            writer.write_record(&record)?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|error| CoreError::Io(error.into_error()))?;
        String::from_utf8(bytes).map_err(|error| CoreError::CsvRow {
            row: 0,
            message: error.to_string(),
        })
    }
}
