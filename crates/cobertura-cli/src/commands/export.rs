use crate::cli::{Cli, ExportArgs, ExportFormat, ExportTable};
use crate::errors;
use crate::format::format_count;
use crate::output::OutputWriter;
use crate::output_types::{ExportOutput, LocalityCsvRow};
use anyhow::{anyhow, Context, Result};
use cobertura_pipeline::localities_geojson;
use serde::Serialize;
use std::io::Write;

use super::{load_session, open_dev_session};

pub async fn execute(cli: &Cli, args: &ExportArgs, output: &OutputWriter) -> Result<()> {
    if args.format == ExportFormat::Geojson && args.table != ExportTable::Localities {
        return Err(errors::unsupported_export(table_name(args.table), "geojson").into());
    }

    let mut loaded = load_session(cli).await?;
    let filter = args.scope.to_filter();

    // The whole export is rendered before anything is written
    let (buffer, rows) = match args.table {
        ExportTable::Localities => {
            let report = loaded.session.report(&filter);
            let buffer = match args.format {
                ExportFormat::Csv => csv_bytes(report.localities.iter().map(LocalityCsvRow::from))?,
                ExportFormat::Geojson => {
                    serde_json::to_vec_pretty(&localities_geojson(&report.localities))?
                }
            };
            (buffer, report.localities.len())
        }
        ExportTable::UnlocatedMembers => {
            let dev = open_dev_session(&loaded.config, args.dev_key.as_deref())?;
            let audit = loaded.session.audit(&filter, &dev);
            (csv_bytes(&audit.unlocated_members)?, audit.unlocated_members.len())
        }
        ExportTable::UnlocatedProviders => {
            let dev = open_dev_session(&loaded.config, args.dev_key.as_deref())?;
            let audit = loaded.session.audit(&filter, &dev);
            (csv_bytes(&audit.unlocated_providers)?, audit.unlocated_providers.len())
        }
    };

    let Some(path) = &args.output else {
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(&buffer)?;
        stdout.flush()?;
        return Ok(());
    };

    std::fs::write(path, &buffer)
        .with_context(|| format!("Failed to write export to {}", path.display()))?;
    tracing::info!(path = %path.display(), rows, "Wrote export");

    if output.is_json() {
        output.result(ExportOutput {
            table: table_name(args.table).to_string(),
            format: format_name(args.format).to_string(),
            rows,
            path: path.display().to_string(),
        })
    } else {
        output.success(format!(
            "Exported {} rows of {} to {}",
            format_count(rows),
            table_name(args.table),
            path.display()
        ));
        Ok(())
    }
}

fn csv_bytes<T: Serialize>(rows: impl IntoIterator<Item = T>) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in rows {
        writer.serialize(row)?;
    }
    writer
        .into_inner()
        .map_err(|err| anyhow!("Failed to flush CSV export: {}", err.error()))
}

fn table_name(table: ExportTable) -> &'static str {
    match table {
        ExportTable::Localities => "localities",
        ExportTable::UnlocatedMembers => "unlocated-members",
        ExportTable::UnlocatedProviders => "unlocated-providers",
    }
}

fn format_name(format: ExportFormat) -> &'static str {
    match format {
        ExportFormat::Csv => "csv",
        ExportFormat::Geojson => "geojson",
    }
}
