use std::fmt::Write as _;

use leadlag_core::{run_scan, status_line, ChartData, SeriesSource, TradingDate};

use super::{ticker_errors, universe_config, CommandResult};
use crate::cli::ChartArgs;
use crate::error::CliError;

pub async fn run(args: &ChartArgs, source: &dyn SeriesSource) -> Result<CommandResult, CliError> {
    let config = universe_config(&args.universe)?;
    let window = config.window(TradingDate::today_utc());

    let run = run_scan(source, &config, window).await?;
    let chart = run.chart();

    let mut table = render_chart_table(&chart);
    let _ = writeln!(table, "{}", status_line(&run.report.results));
    let csv = chart.to_csv()?;
    let errors = ticker_errors(&run.report.failures)?;

    Ok(CommandResult::new(serde_json::to_value(&chart)?, run.report.source)
        .with_table(table)
        .with_csv(csv)
        .with_errors(errors))
}

fn render_chart_table(chart: &ChartData) -> String {
    let mut out = String::new();
    let _ = write!(out, "{:<10}", "Date");
    for line in &chart.lines {
        let _ = write!(out, " {:>9}", line.symbol.as_str());
    }
    out.push('\n');

    for (row, date) in chart.dates.iter().enumerate() {
        let _ = write!(out, "{:<10}", date.format_iso());
        for line in &chart.lines {
            match line.values.get(row).copied().flatten() {
                Some(value) => {
                    let _ = write!(out, " {value:>9.2}");
                }
                None => {
                    let _ = write!(out, " {:>9}", "");
                }
            }
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use leadlag_core::{ChartLine, Symbol};

    #[test]
    fn chart_table_leaves_gaps_blank() {
        let chart = ChartData {
            dates: vec![
                TradingDate::parse("2024-01-02").expect("date"),
                TradingDate::parse("2024-01-03").expect("date"),
            ],
            lines: vec![
                ChartLine {
                    symbol: Symbol::parse("BDRY").expect("symbol"),
                    is_proxy: true,
                    values: vec![Some(100.0), Some(104.5)],
                },
                ChartLine {
                    symbol: Symbol::parse("GNK").expect("symbol"),
                    is_proxy: false,
                    values: vec![None, Some(100.0)],
                },
            ],
        };

        let table = render_chart_table(&chart);
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("Date"));
        assert!(lines[1].contains("100.00"));
        assert_eq!(lines[1].trim_end().matches("100.00").count(), 1);
        assert!(lines[2].ends_with("100.00"));
    }
}
