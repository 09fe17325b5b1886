use crate::cli::{Cli, ReportArgs};
use crate::format::{format_count, format_km};
use crate::interactive::interactive_filter;
use crate::output::OutputWriter;
use crate::output_types::LocalityTableRow;
use anyhow::Result;

use super::load_session;

pub async fn execute(cli: &Cli, args: &ReportArgs, output: &OutputWriter) -> Result<()> {
    let mut loaded = load_session(cli).await?;

    let filter = if args.interactive {
        interactive_filter(&loaded.session)?
    } else {
        args.scope.to_filter()
    };

    let report = loaded.session.report(&filter);

    if output.is_json() {
        return output.result(&report);
    }

    output.section("Coverage by locality");
    output.kv("Localities", format_count(report.summary.localities));
    output.kv(
        "Members located",
        format_count(report.summary.members.located),
    );
    output.kv(
        "Providers located",
        format_count(report.summary.clinics.located),
    );
    output.kv("Mean distance", format_km(report.summary.mean_distance_km));
    println!();

    let localities = &report.localities;
    output.table(localities.iter().map(LocalityTableRow::from).collect());

    let uncovered = report.summary.localities_without_providers;
    if uncovered > 0 {
        output.warning(format!(
            "{} localities have members and no provider (see: cobertura shortfalls)",
            format_count(uncovered)
        ));
    }
    if report.summary.index_size == 0 {
        output.warning("No located providers match the filter; distances are undefined");
    }

    Ok(())
}
