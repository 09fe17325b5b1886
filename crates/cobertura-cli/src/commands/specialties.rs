use crate::cli::{Cli, ScopeArgs};
use crate::output::OutputWriter;
use crate::output_types::{SpecialtiesOutput, SpecialtyTableRow};
use anyhow::Result;

use super::load_session;

pub async fn execute(cli: &Cli, args: &ScopeArgs, output: &OutputWriter) -> Result<()> {
    let mut loaded = load_session(cli).await?;

    let filter = args.to_filter().without_specialty();
    if args.specialty.is_some() {
        output.warning("--specialty is ignored; every specialty is listed");
    }

    let specialties = loaded.session.specialty_breakdown(&filter);

    if output.is_json() {
        return output.result(SpecialtiesOutput {
            filter,
            specialties,
        });
    }

    output.section("Coverage by specialty");
    output.table(specialties.iter().map(SpecialtyTableRow::from).collect());

    Ok(())
}
