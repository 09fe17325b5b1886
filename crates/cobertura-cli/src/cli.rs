use clap::{Args, Parser, Subcommand, ValueEnum};
use cobertura_core::config::{MetricKind, RepairKind};
use cobertura_pipeline::CoverageFilter;
use std::path::PathBuf;

/// Cobertura - Geographic coverage of members by healthcare providers
#[derive(Parser, Debug)]
#[command(name = "cobertura")]
#[command(about = "Geographic coverage of members by healthcare providers", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Output results in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Configuration file (defaults to ./cobertura.toml when present)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Member CSV file; repeat for multi-part sources
    #[arg(long = "members", global = true, value_name = "CSV")]
    pub members: Vec<PathBuf>,

    /// Provider CSV file; repeat for multi-part sources
    #[arg(long = "providers", global = true, value_name = "CSV")]
    pub providers: Vec<PathBuf>,

    /// CSV field delimiter
    #[arg(long, global = true, default_value = ",")]
    pub delimiter: char,

    /// Distance metric override
    #[arg(long, global = true)]
    pub metric: Option<MetricArg>,

    /// Country filter override
    #[arg(long, global = true)]
    pub country: Option<String>,

    /// Coordinate repair to apply before classification; repeatable
    #[arg(long = "repair", global = true)]
    pub repairs: Vec<RepairArg>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Distance metric selection
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum MetricArg {
    /// Degree-space Euclidean distance times km per degree
    Scaled,
    /// Great-circle distance
    Haversine,
}

impl From<MetricArg> for MetricKind {
    fn from(arg: MetricArg) -> Self {
        match arg {
            MetricArg::Scaled => MetricKind::Scaled,
            MetricArg::Haversine => MetricKind::Haversine,
        }
    }
}

/// Coordinate repair selection
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum RepairArg {
    /// Insert the decimal point into digit strings such as -34565076
    MissingDecimalPoint,
    /// Read -34,6037 as -34.6037
    DecimalComma,
}

impl From<RepairArg> for RepairKind {
    fn from(arg: RepairArg) -> Self {
        match arg {
            RepairArg::MissingDecimalPoint => RepairKind::MissingDecimalPoint,
            RepairArg::DecimalComma => RepairKind::DecimalComma,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Locality coverage table
    Report(ReportArgs),

    /// Headline counters: located records, duplicates, mean distance
    Summary(ScopeArgs),

    /// Localities with members and no provider, largest first
    Shortfalls(ShortfallArgs),

    /// Coverage per provider specialty
    Specialties(ScopeArgs),

    /// Map centre, zoom and locality markers
    Map(ScopeArgs),

    /// List provinces, or the localities of one province
    Places(PlacesArgs),

    /// Unlocated members and providers (developer access)
    Audit(AuditArgs),

    /// Export a table or the map layer to a file
    Export(ExportArgs),

    /// Show effective configuration values and their sources
    Config,
}

/// Province, locality and specialty selection
#[derive(Args, Debug, Clone, Default)]
pub struct ScopeArgs {
    /// Restrict to one province
    #[arg(long)]
    pub province: Option<String>,

    /// Restrict to one locality
    #[arg(long)]
    pub locality: Option<String>,

    /// Only count and measure to providers of this specialty
    #[arg(long)]
    pub specialty: Option<String>,
}

impl ScopeArgs {
    pub fn to_filter(&self) -> CoverageFilter {
        CoverageFilter {
            province: self.province.clone(),
            locality: self.locality.clone(),
            specialty: self.specialty.clone(),
        }
    }
}

#[derive(Args, Debug)]
pub struct ReportArgs {
    #[command(flatten)]
    pub scope: ScopeArgs,

    /// Interactive mode - pick province, locality and specialty from lists
    #[arg(long, short = 'i')]
    pub interactive: bool,
}

#[derive(Args, Debug)]
pub struct ShortfallArgs {
    #[command(flatten)]
    pub scope: ScopeArgs,

    /// Number of localities to show (defaults to shortfall_limit)
    #[arg(long, short = 'n')]
    pub limit: Option<usize>,
}

#[derive(Args, Debug)]
pub struct PlacesArgs {
    /// List the localities of this province instead of provinces
    #[arg(long)]
    pub province: Option<String>,
}

#[derive(Args, Debug)]
pub struct AuditArgs {
    #[command(flatten)]
    pub scope: ScopeArgs,

    /// Developer key; prompted for when omitted
    #[arg(long, value_name = "KEY")]
    pub dev_key: Option<String>,
}

/// Export payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportTable {
    /// Locality coverage table
    Localities,
    /// Unlocated members (developer access)
    UnlocatedMembers,
    /// Unlocated providers (developer access)
    UnlocatedProviders,
}

/// Export encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Csv,
    Geojson,
}

#[derive(Args, Debug)]
pub struct ExportArgs {
    #[command(flatten)]
    pub scope: ScopeArgs,

    /// Table to export
    #[arg(long, default_value = "localities")]
    pub table: ExportTable,

    /// Output encoding; GeoJSON is only available for the locality table
    #[arg(long, default_value = "csv")]
    pub format: ExportFormat,

    /// Destination file (stdout when omitted)
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Developer key for the unlocated tables
    #[arg(long, value_name = "KEY")]
    pub dev_key: Option<String>,
}
