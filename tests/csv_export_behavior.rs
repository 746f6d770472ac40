//! Behaviour tests for the results CSV export.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};

use leadlag_core::report::CSV_HEADER;
use leadlag_core::{read_csv, write_csv, LagResult};
use leadlag_tests::symbol;
use tempfile::tempdir;

fn result(ticker: &str, lag: i32, correlation: Option<f64>, sample_size: usize) -> LagResult {
    LagResult {
        ticker: symbol(ticker),
        lag,
        correlation,
        sample_size,
    }
}

#[test]
fn exported_results_read_back_to_the_same_tuples() {
    // Given: ranked results including a negative lag and an undefined correlation
    let results = vec![
        result("SBLK", 4, Some(0.612_345), 730),
        result("GNK", -2, Some(-0.401_9), 744),
        result("EGLE", 0, None, 0),
    ];
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("bdry_leadlag_results.csv");

    // When: they are exported and loaded again
    {
        let mut writer = BufWriter::new(File::create(&path).expect("create"));
        write_csv(&results, &mut writer).expect("export");
        writer.flush().expect("flush");
    }
    let loaded = read_csv(BufReader::new(File::open(&path).expect("open"))).expect("import");

    // Then: ticker, lag and sample size survive and correlations are kept to 3 decimals
    assert_eq!(loaded.len(), results.len());
    for (got, want) in loaded.iter().zip(&results) {
        assert_eq!(got.ticker, want.ticker);
        assert_eq!(got.lag, want.lag);
        assert_eq!(got.sample_size, want.sample_size);
        match (got.correlation, want.correlation) {
            (Some(got), Some(want)) => {
                assert!((got - (want * 1000.0).round() / 1000.0).abs() < 1e-9)
            }
            (None, None) => {}
            other => panic!("correlation mismatch: {other:?}"),
        }
    }
}

#[test]
fn export_text_uses_signed_lags_and_three_decimals() {
    let mut buffer = Vec::new();
    write_csv(&[result("ZIM", 12, Some(0.5), 100)], &mut buffer).expect("export");
    let text = String::from_utf8(buffer).expect("utf8");

    let mut lines = text.lines();
    assert_eq!(lines.next(), Some(CSV_HEADER.join(",").as_str()));
    assert_eq!(lines.next(), Some("ZIM,+12,0.500,100"));
}
