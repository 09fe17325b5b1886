//! Cobertura CLI - Command-line interface
//!
//! This is the main CLI adapter for the coverage dashboard core.

mod cli;
mod commands;
mod config;
mod errors;
mod format;
mod interactive;
mod output;
mod output_types;

use clap::Parser;
use cli::Cli;
use console::style;
use errors::CliError;

fn main() {
    // Initialize tracing; logs go to stderr so JSON output stays parseable
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    // Parse CLI arguments
    let cli = Cli::parse();

    if let Err(err) = run(cli) {
        match err.downcast_ref::<CliError>() {
            Some(cli_error) => cli_error.display(),
            None => eprintln!("{} {:#}", style("✗").red().bold(), err),
        }
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    // Create async runtime
    let runtime = tokio::runtime::Runtime::new()?;

    // Execute the command
    runtime.block_on(commands::execute(cli))
}
