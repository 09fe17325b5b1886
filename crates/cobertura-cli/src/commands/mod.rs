//! Command implementations

mod audit;
mod config;
mod export;
mod map;
mod places;
mod report;
mod shortfalls;
mod specialties;
mod summary;

use crate::cli::{Cli, Commands};
use crate::config::{build_source, load_config};
use crate::errors;
use crate::interactive;
use crate::output::OutputWriter;
use anyhow::Result;
use cobertura_core::config::LayeredConfig;
use cobertura_core::session::{DevAccess, DevSession};
use cobertura_pipeline::{CoverageSession, CoverageSettings};
use cobertura_source::RecordSource;

/// Execute a CLI command
pub async fn execute(cli: Cli) -> Result<()> {
    let output = OutputWriter::new(cli.json);

    match &cli.command {
        Commands::Report(args) => report::execute(&cli, args, &output).await,
        Commands::Summary(args) => summary::execute(&cli, args, &output).await,
        Commands::Shortfalls(args) => shortfalls::execute(&cli, args, &output).await,
        Commands::Specialties(args) => specialties::execute(&cli, args, &output).await,
        Commands::Map(args) => map::execute(&cli, args, &output).await,
        Commands::Places(args) => places::execute(&cli, args, &output).await,
        Commands::Audit(args) => audit::execute(&cli, args, &output).await,
        Commands::Export(args) => export::execute(&cli, args, &output).await,
        Commands::Config => config::execute(&cli, &output),
    }
}

/// Configuration plus a session over the loaded records
pub(crate) struct Loaded {
    pub config: LayeredConfig,
    pub session: CoverageSession,
}

/// Resolve configuration, read both CSV sources and classify the records
pub(crate) async fn load_session(cli: &Cli) -> Result<Loaded> {
    let config = load_config(cli)?;
    let source = build_source(cli)?;

    tracing::debug!(source = %source.describe(), "Loading records");
    let records = source.load().await.map_err(errors::from_core)?;

    let settings = CoverageSettings::from_config(&config);
    let session = CoverageSession::new(records, settings);
    Ok(Loaded { config, session })
}

/// Log in with the given key, prompting for it when absent
pub(crate) fn open_dev_session(config: &LayeredConfig, key: Option<&str>) -> Result<DevSession> {
    let access = DevAccess::new(config.dev_key.value.clone());
    if !access.is_enabled() {
        return Err(errors::dev_access_disabled().into());
    }

    let attempt = match key {
        Some(key) => key.to_string(),
        None => interactive::prompt_dev_key()?,
    };
    Ok(access.login(&attempt).map_err(errors::from_core)?)
}
