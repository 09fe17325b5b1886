use crate::cli::{AuditArgs, Cli};
use crate::format::format_count;
use crate::output::OutputWriter;
use crate::output_types::{UnlocatedMemberRow, UnlocatedProviderRow};
use anyhow::Result;

use super::{load_session, open_dev_session};

pub async fn execute(cli: &Cli, args: &AuditArgs, output: &OutputWriter) -> Result<()> {
    let mut loaded = load_session(cli).await?;
    let dev = open_dev_session(&loaded.config, args.dev_key.as_deref())?;

    let audit = loaded.session.audit(&args.scope.to_filter(), &dev);

    if output.is_json() {
        return output.result(&audit);
    }

    output.section(format!(
        "Unlocated members ({})",
        format_count(audit.unlocated_members.len())
    ));
    let members = &audit.unlocated_members;
    output.table(members.iter().map(UnlocatedMemberRow::from).collect());

    output.section(format!(
        "Unlocated providers ({})",
        format_count(audit.unlocated_providers.len())
    ));
    let providers = &audit.unlocated_providers;
    output.table(providers.iter().map(UnlocatedProviderRow::from).collect());

    output.section("Cleaning");
    output.kv(
        "Duplicate members removed",
        format_count(audit.summary.duplicates_removed),
    );
    output.kv(
        "Foreign records excluded",
        format_count(audit.summary.foreign_excluded),
    );
    output.kv(
        "Coordinates repaired",
        format_count(audit.summary.repaired_records),
    );

    Ok(())
}
