use std::fs::File;
use std::io::BufWriter;

use leadlag_core::report::{format_lag, to_csv_string};
use leadlag_core::{
    render_table, run_scan, status_line, write_csv, FetchMode, LagBound, SeriesSource,
    TradingDate,
};
use tracing::info;

use super::{ticker_errors, universe_config, CommandResult};
use crate::cli::ScanArgs;
use crate::error::CliError;

pub async fn run(args: &ScanArgs, source: &dyn SeriesSource) -> Result<CommandResult, CliError> {
    let fetch_mode = if args.sequential {
        FetchMode::Sequential
    } else {
        FetchMode::Concurrent
    };
    let config = universe_config(&args.universe)?
        .max_lag(LagBound::new(args.max_lag)?)
        .min_overlap(args.min_aligned, args.min_pairs)?
        .fetch_mode(fetch_mode);
    let window = config.window(TradingDate::today_utc());

    let run = run_scan(source, &config, window).await?;
    let report = run.report;

    if let Some(path) = &args.output {
        let file = File::create(path)?;
        write_csv(&report.results, BufWriter::new(file))?;
        info!(path = %path.display(), rows = report.results.len(), "wrote results csv");
    }

    let warnings = report
        .results
        .iter()
        .filter(|result| result.correlation.is_none())
        .map(|result| {
            format!(
                "{}: correlation undefined (lag {}, N={})",
                result.ticker,
                format_lag(result.lag),
                result.sample_size
            )
        })
        .collect();
    let errors = ticker_errors(&report.failures)?;

    let table = format!(
        "{}\n{}\n",
        render_table(&report.results).trim_end(),
        status_line(&report.results)
    );
    let csv = to_csv_string(&report.results)?;

    Ok(CommandResult::new(serde_json::to_value(&report)?, report.source)
        .with_table(table)
        .with_csv(csv)
        .with_warnings(warnings)
        .with_errors(errors))
}
