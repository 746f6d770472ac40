//! Per-ticker lag results and their table/CSV renderings.

use std::cmp::Ordering;
use std::fmt::Write as _;
use std::io;

use serde::{Deserialize, Serialize};

use crate::analysis::LagEstimate;
use crate::{CoreError, Symbol};

/// Column titles of the exported results table.
pub const CSV_HEADER: [&str; 4] = ["Stock", "Best Lag (days)", "Max Corr", "N (overlap)"];

const UNDEFINED: &str = "—";

/// Best lead/lag for one ticker against the proxy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LagResult {
    pub ticker: Symbol,
    pub lag: i32,
    pub correlation: Option<f64>,
    pub sample_size: usize,
}

impl LagResult {
    pub fn from_estimate(ticker: Symbol, estimate: LagEstimate) -> Self {
        Self {
            ticker,
            lag: estimate.lag,
            correlation: estimate.correlation,
            sample_size: estimate.sample_size,
        }
    }

    /// |correlation|, the ranking key.
    pub fn strength(&self) -> Option<f64> {
        self.correlation.map(f64::abs)
    }
}

/// Orders by descending |correlation|; undefined correlations go last. Stable.
pub fn rank_by_strength(results: &mut [LagResult]) {
    results.sort_by(|a, b| match (a.strength(), b.strength()) {
        (Some(x), Some(y)) => y.total_cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}

/// `+3`, `0`, `-12`.
pub fn format_lag(lag: i32) -> String {
    if lag > 0 {
        format!("+{lag}")
    } else {
        lag.to_string()
    }
}

/// Three decimals, or a dash when undefined.
pub fn format_correlation(correlation: Option<f64>) -> String {
    correlation
        .map(|value| format!("{value:.3}"))
        .unwrap_or_else(|| String::from(UNDEFINED))
}

/// One-line summary: `GNK: lag=+2, corr=0.913 (N=741) | ZIM: …`.
pub fn status_line(results: &[LagResult]) -> String {
    results
        .iter()
        .map(|result| {
            format!(
                "{}: lag={}, corr={} (N={})",
                result.ticker,
                format_lag(result.lag),
                format_correlation(result.correlation),
                result.sample_size
            )
        })
        .collect::<Vec<_>>()
        .join(" | ")
}

/// Fixed-width text table with the export columns.
pub fn render_table(results: &[LagResult]) -> String {
    let rows: Vec<[String; 4]> = results
        .iter()
        .map(|result| {
            [
                result.ticker.to_string(),
                format_lag(result.lag),
                format_correlation(result.correlation),
                result.sample_size.to_string(),
            ]
        })
        .collect();

    let mut widths = CSV_HEADER.map(|title| title.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let header = CSV_HEADER.map(String::from);
    for row in std::iter::once(&header).chain(rows.iter()) {
        let cells: Vec<String> = row
            .iter()
            .zip(widths)
            .enumerate()
            .map(|(column, (cell, width))| {
                let pad = width.saturating_sub(cell.chars().count());
                if column == 0 {
                    format!("{cell}{}", " ".repeat(pad))
                } else {
                    format!("{}{cell}", " ".repeat(pad))
                }
            })
            .collect();
        let _ = writeln!(out, "{}", cells.join("  ").trim_end());
    }
    out
}

#[derive(Debug, Serialize, Deserialize)]
struct CsvRow {
    #[serde(rename = "Stock")]
    stock: String,
    #[serde(rename = "Best Lag (days)")]
    lag: String,
    #[serde(rename = "Max Corr")]
    max_corr: String,
    #[serde(rename = "N (overlap)")]
    overlap: usize,
}

/// Writes the results as CSV, header first. Undefined correlations are empty cells.
pub fn write_csv<W: io::Write>(results: &[LagResult], writer: W) -> Result<(), CoreError> {
    let mut writer = csv::Writer::from_writer(writer);
    if results.is_empty() {
        writer.write_record(CSV_HEADER)?;
    }
    for result in results {
        writer.serialize(CsvRow {
            stock: result.ticker.to_string(),
            lag: format_lag(result.lag),
            max_corr: result
                .correlation
                .map(|value| format!("{value:.3}"))
                .unwrap_or_default(),
            overlap: result.sample_size,
        })?;
    }
    writer.flush()?;
    Ok(())
}

pub fn to_csv_string(results: &[LagResult]) -> Result<String, CoreError> {
    let mut buffer = Vec::new();
    write_csv(results, &mut buffer)?;
    String::from_utf8(buffer).map_err(|error| CoreError::CsvRow {
        row: 0,
        message: error.to_string(),
    })
}

/// Reads a results CSV written by [`write_csv`] (or edited by hand).
pub fn read_csv<R: io::Read>(reader: R) -> Result<Vec<LagResult>, CoreError> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

    let mut results = Vec::new();
    for (index, row) in reader.deserialize::<CsvRow>().enumerate() {
        let row = row?;
        let line = index + 2;
        let ticker = Symbol::parse(&row.stock)?;
        let lag = row.lag.parse::<i32>().map_err(|error| CoreError::CsvRow {
            row: line,
            message: format!("invalid lag '{}': {error}", row.lag),
        })?;
        let correlation = match row.max_corr.as_str() {
            "" | UNDEFINED | "NaN" => None,
            raw => Some(raw.parse::<f64>().map_err(|error| CoreError::CsvRow {
                row: line,
                message: format!("invalid correlation '{raw}': {error}"),
            })?),
        };
        results.push(LagResult {
            ticker,
            lag,
            correlation,
            sample_size: row.overlap,
        });
    }
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(ticker: &str, lag: i32, correlation: Option<f64>, sample_size: usize) -> LagResult {
        LagResult {
            ticker: Symbol::parse(ticker).expect("symbol"),
            lag,
            correlation,
            sample_size,
        }
    }

    #[test]
    fn ranks_strongest_first_and_undefined_last() {
        let mut results = vec![
            result("GNK", 1, Some(0.2), 700),
            result("EGLE", 0, None, 0),
            result("SBLK", -4, Some(-0.6), 690),
            result("ZIM", 7, Some(0.4), 680),
        ];

        rank_by_strength(&mut results);

        let order: Vec<&str> = results.iter().map(|r| r.ticker.as_str()).collect();
        assert_eq!(order, vec!["SBLK", "ZIM", "GNK", "EGLE"]);
    }

    #[test]
    fn status_line_marks_undefined_correlation() {
        let line = status_line(&[result("GNK", 2, Some(0.91234), 740), result("ZIM", 0, None, 0)]);
        assert_eq!(line, "GNK: lag=+2, corr=0.912 (N=740) | ZIM: lag=0, corr=— (N=0)");
    }

    #[test]
    fn csv_has_expected_header_and_formatting() {
        let rendered =
            to_csv_string(&[result("GNK", 3, Some(-0.45678), 512), result("ZIM", 0, None, 0)])
                .expect("csv");
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(lines[0], "Stock,Best Lag (days),Max Corr,N (overlap)");
        assert_eq!(lines[1], "GNK,+3,-0.457,512");
        assert_eq!(lines[2], "ZIM,0,,0");
    }

    #[test]
    fn empty_export_still_has_header() {
        let rendered = to_csv_string(&[]).expect("csv");
        assert_eq!(rendered.trim_end(), "Stock,Best Lag (days),Max Corr,N (overlap)");
    }

    #[test]
    fn reads_back_dash_and_signed_lags() {
        let input = "Stock,Best Lag (days),Max Corr,N (overlap)\n\
                     SBLK,+12,0.301,300\n\
                     EGLE,-3,—,0\n";
        let results = read_csv(input.as_bytes()).expect("parse");

        assert_eq!(results[0], result("SBLK", 12, Some(0.301), 300));
        assert_eq!(results[1], result("EGLE", -3, None, 0));
    }

    #[test]
    fn rejects_bad_lag_cells() {
        let input = "Stock,Best Lag (days),Max Corr,N (overlap)\nSBLK,soon,0.3,10\n";
        let err = read_csv(input.as_bytes()).expect_err("must fail");
        assert!(matches!(err, CoreError::CsvRow { row: 2, .. }));
    }

    #[test]
    fn table_aligns_columns() {
        let table = render_table(&[result("GNK", -2, Some(0.5), 99)]);
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("Stock"));
        assert!(lines[1].starts_with("GNK"));
        assert!(lines[1].ends_with("99"));
        assert!(lines[1].contains("0.500"));
    }
}
