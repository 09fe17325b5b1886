//! Configuration and source loading for CLI commands

use anyhow::{Context, Result};
use cobertura_core::config::{CliConfigOverrides, LayeredConfig};
use cobertura_source::CsvSource;
use std::path::{Path, PathBuf};

use crate::cli::Cli;
use crate::errors;

/// Looked up in the working directory when `--config` is not given
pub const DEFAULT_CONFIG_FILE: &str = "cobertura.toml";

/// Load layered configuration: defaults, file, environment, then CLI flags
pub fn load_config(cli: &Cli) -> Result<LayeredConfig> {
    let mut config = LayeredConfig::with_defaults();

    if let Some(path) = config_path(cli) {
        config = config
            .load_from_file(&path)
            .with_context(|| format!("Failed to load configuration file {}", path.display()))?;
    }

    let mut config = config.load_from_env();
    config.update_from_cli(cli_overrides(cli));
    Ok(config)
}

/// Explicit `--config`, else the default file when it exists
fn config_path(cli: &Cli) -> Option<PathBuf> {
    match &cli.config {
        Some(path) => Some(path.clone()),
        None => Some(PathBuf::from(DEFAULT_CONFIG_FILE)).filter(|path| path.is_file()),
    }
}

fn cli_overrides(cli: &Cli) -> CliConfigOverrides {
    CliConfigOverrides {
        distance_metric: cli.metric.map(Into::into),
        country: cli.country.clone(),
        coordinate_repairs: if cli.repairs.is_empty() {
            None
        } else {
            Some(cli.repairs.iter().copied().map(Into::into).collect())
        },
        ..Default::default()
    }
}

/// CSV source from `--members`, `--providers` and `--delimiter`
pub fn build_source(cli: &Cli) -> Result<CsvSource> {
    if cli.members.is_empty() {
        return Err(errors::source_not_configured("member", "--members").into());
    }
    if cli.providers.is_empty() {
        return Err(errors::source_not_configured("provider", "--providers").into());
    }
    for path in cli.members.iter().chain(&cli.providers) {
        ensure_exists(path)?;
    }

    let delimiter = u8::try_from(cli.delimiter)
        .ok()
        .filter(u8::is_ascii)
        .with_context(|| {
            format!(
                "Delimiter must be a single ASCII character, got '{}'",
                cli.delimiter
            )
        })?;

    Ok(CsvSource::new(cli.members.clone(), cli.providers.clone()).with_delimiter(delimiter))
}

fn ensure_exists(path: &Path) -> Result<()> {
    if path.is_file() {
        Ok(())
    } else {
        Err(errors::source_file_not_found(&path.display().to_string()).into())
    }
}
