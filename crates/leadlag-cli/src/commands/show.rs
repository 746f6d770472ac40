use std::fs::File;
use std::io::BufReader;

use leadlag_core::report::to_csv_string;
use leadlag_core::{read_csv, render_table, status_line, ProviderId};

use super::CommandResult;
use crate::cli::ShowArgs;
use crate::error::CliError;

pub fn run(args: &ShowArgs) -> Result<CommandResult, CliError> {
    let file = File::open(&args.path)?;
    let results = read_csv(BufReader::new(file))?;

    let mut warnings = Vec::new();
    if results.is_empty() {
        warnings.push(format!("{} holds no result rows", args.path.display()));
    }

    let table = format!(
        "{}\n{}\n",
        render_table(&results).trim_end(),
        status_line(&results)
    );
    let csv = to_csv_string(&results)?;

    Ok(CommandResult::new(serde_json::to_value(&results)?, ProviderId::File)
        .with_table(table)
        .with_csv(csv)
        .with_warnings(warnings))
}
