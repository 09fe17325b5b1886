use crate::cli::{Cli, PlacesArgs};
use crate::output::OutputWriter;
use crate::output_types::{NameRow, PlacesOutput};
use anyhow::Result;

use super::load_session;

pub async fn execute(cli: &Cli, args: &PlacesArgs, output: &OutputWriter) -> Result<()> {
    let loaded = load_session(cli).await?;

    let places = match args.province.as_deref() {
        Some(province) => loaded.session.localities(Some(province)),
        None => loaded.session.provinces(),
    };

    if output.is_json() {
        return output.result(PlacesOutput {
            province: args.province.clone(),
            places,
        });
    }

    match &args.province {
        Some(province) => output.section(format!("Localities of {}", province)),
        None => output.section("Provinces"),
    }
    output.table(places.into_iter().map(|name| NameRow { name }).collect());

    Ok(())
}
