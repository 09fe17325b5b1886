use crate::cli::{Cli, ScopeArgs};
use crate::format::format_count;
use crate::output::OutputWriter;
use crate::output_types::MarkerTableRow;
use anyhow::Result;
use cobertura_pipeline::MapLayer;

use super::load_session;

pub async fn execute(cli: &Cli, args: &ScopeArgs, output: &OutputWriter) -> Result<()> {
    let mut loaded = load_session(cli).await?;
    let report = loaded.session.report(&args.to_filter());
    let layer = MapLayer::from_report(&report);

    if output.is_json() {
        return output.result(&layer);
    }

    output.section("Map");
    let center = &layer.center;
    output.kv(
        "Center",
        format!("{:.4}, {:.4}", center.latitude, center.longitude),
    );
    output.kv("Zoom", layer.zoom);
    output.kv("Heat points", format_count(layer.heat.len()));
    println!();

    output.table(layer.markers.iter().map(MarkerTableRow::from).collect());

    Ok(())
}
