use crate::cli::{Cli, ShortfallArgs};
use crate::output::OutputWriter;
use crate::output_types::{ShortfallTableRow, ShortfallsOutput};
use anyhow::Result;

use super::load_session;

pub async fn execute(cli: &Cli, args: &ShortfallArgs, output: &OutputWriter) -> Result<()> {
    let mut loaded = load_session(cli).await?;
    let limit = args.limit.unwrap_or(loaded.config.shortfall_limit.value);

    let filter = args.scope.to_filter();
    let report = loaded.session.report(&filter);
    let shortfalls = report.shortfalls(limit);

    if output.is_json() {
        return output.result(ShortfallsOutput {
            filter,
            limit,
            shortfalls,
        });
    }

    output.section(format!("Localities without providers (top {})", limit));
    if shortfalls.is_empty() {
        output.success("Every locality with members has at least one provider");
        return Ok(());
    }

    let bars: Vec<(String, usize)> = shortfalls
        .iter()
        .map(|row| (row.locality.clone(), row.member_count))
        .collect();
    output.bar_chart(&bars);
    println!();

    output.table(
        shortfalls
            .iter()
            .enumerate()
            .map(|(idx, row)| ShortfallTableRow::new(idx + 1, row))
            .collect(),
    );

    Ok(())
}
