use crate::cli::{Cli, ScopeArgs};
use crate::format::{format_count, format_km};
use crate::output::OutputWriter;
use crate::output_types::PopulationTableRow;
use anyhow::Result;
use cobertura_core::models::GeoStatus;
use cobertura_pipeline::PopulationSummary;

use super::load_session;

const REASONS: [GeoStatus; 3] = [
    GeoStatus::EmptyCoordinates,
    GeoStatus::Unparsable,
    GeoStatus::OutOfBounds,
];

pub async fn execute(cli: &Cli, args: &ScopeArgs, output: &OutputWriter) -> Result<()> {
    let mut loaded = load_session(cli).await?;
    let report = loaded.session.report(&args.to_filter());
    let summary = &report.summary;

    if output.is_json() {
        return output.result(summary);
    }

    output.section("Geolocation");
    output.table(vec![
        PopulationTableRow::new("Members", &summary.members),
        PopulationTableRow::new("Clinics", &summary.clinics),
        PopulationTableRow::new("Pharmacies", &summary.pharmacies),
    ]);

    output.section("Unlocated members by reason");
    for reason in REASONS {
        output.kv(reason, format_count(unlocated(&summary.members, reason)));
    }

    output.section("Cleaning");
    output.kv(
        "Duplicate members removed",
        format_count(summary.duplicates_removed),
    );
    output.kv(
        "Foreign records excluded",
        format_count(summary.foreign_excluded),
    );
    output.kv(
        "Coordinates repaired",
        format_count(summary.repaired_records),
    );

    output.section("Coverage");
    output.kv("Providers indexed", format_count(summary.index_size));
    output.kv("Mean distance", format_km(summary.mean_distance_km));
    output.kv("Localities", format_count(summary.localities));
    output.kv(
        "Localities without providers",
        format_count(summary.localities_without_providers),
    );

    Ok(())
}

fn unlocated(population: &PopulationSummary, reason: GeoStatus) -> usize {
    population.reasons.get(&reason).copied().unwrap_or(0)
}
