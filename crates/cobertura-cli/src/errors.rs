use cobertura_core::error::CoberturaError;
use console::style;
use std::fmt;

/// Enhanced error type with suggestions
pub struct CliError {
    pub message: String,
    pub context: Option<String>,
    pub suggestions: Vec<String>,
    pub help_command: Option<String>,
}

impl CliError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            context: None,
            suggestions: Vec::new(),
            help_command: None,
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    pub fn with_help(mut self, command: impl Into<String>) -> Self {
        self.help_command = Some(command.into());
        self
    }

    pub fn display(&self) {
        eprintln!(
            "{} {}\n",
            style("✗").red().bold(),
            style(&self.message).red().bold()
        );

        if let Some(ref context) = self.context {
            eprintln!("{}", context);
            eprintln!();
        }

        if !self.suggestions.is_empty() {
            eprintln!("{}", style("To fix this:").yellow().bold());
            for (i, suggestion) in self.suggestions.iter().enumerate() {
                eprintln!("  {}. {}", i + 1, suggestion);
            }
            eprintln!();
        }

        if let Some(ref help_cmd) = self.help_command {
            eprintln!(
                "{} {}",
                style("Need help?").cyan(),
                style(help_cmd).cyan().bold()
            );
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl fmt::Debug for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// No CSV given for one population
pub fn source_not_configured(population: &str, flag: &str) -> CliError {
    CliError::new(format!("No {} source given", population))
        .with_context(format!(
            "Coverage needs both the member and the provider tables.\n\nMissing: {}",
            flag
        ))
        .with_suggestion(format!(
            "Pass the CSV file: cobertura {} data/{}s.csv ...",
            flag, population
        ))
        .with_suggestion("Repeat the flag for sources split into several files")
        .with_help("Run: cobertura --help")
}

/// CSV path that does not exist
pub fn source_file_not_found(path: &str) -> CliError {
    CliError::new("Source file not found")
        .with_context(format!("The specified CSV file does not exist.\n\nPath: {}", path))
        .with_suggestion("Check the file path and try again")
        .with_suggestion("Use absolute path or path relative to current directory")
        .with_help("Run: cobertura --help")
}

/// Source without its identifier column
pub fn missing_column(source_name: &str, column: &str) -> CliError {
    CliError::new(format!("Column {} not found", column))
        .with_context(format!(
            "The identifier column is required to read the table.\n\nSource: {}",
            source_name
        ))
        .with_suggestion("Check the header row of the CSV file")
        .with_suggestion("Check --delimiter if the file is not comma separated")
}

/// Wrong developer key
pub fn unauthorized() -> CliError {
    CliError::new("Developer key rejected")
        .with_context("The audit panel lists unlocated rows and requires the developer key.")
        .with_suggestion("Retry with the correct key: --dev-key <KEY>")
        .with_help("Run: cobertura audit --help")
}

/// No developer key configured at all
pub fn dev_access_disabled() -> CliError {
    CliError::new("Developer access is not configured")
        .with_context("No developer key is set, so the audit panel is unavailable.")
        .with_suggestion("Set the key: export COBERTURA_DEV_KEY=\"...\"")
        .with_suggestion("Or add to cobertura.toml:\n  dev_key = \"...\"")
        .with_help("Run: cobertura config")
}

/// Export format the table does not support
pub fn unsupported_export(table: &str, format: &str) -> CliError {
    CliError::new(format!("Cannot export {} as {}", table, format))
        .with_context("GeoJSON carries point geometries and is only available for localities.")
        .with_suggestion("Use --format csv for this table")
        .with_help("Run: cobertura export --help")
}

/// Invalid configuration value
pub fn invalid_config(key: &str, reason: &str) -> CliError {
    CliError::new(format!("Invalid configuration: {}", key))
        .with_context(format!("Configuration value is invalid.\n\nReason: {}", reason))
        .with_suggestion("Check cobertura.toml for syntax errors")
        .with_suggestion("Check COBERTURA_* environment variables")
        .with_help("Run: cobertura config")
}

/// Convert a domain error to a CliError with suggestions
pub fn from_core(error: CoberturaError) -> CliError {
    match error {
        CoberturaError::SourceNotFound { path } => {
            source_file_not_found(&path.display().to_string())
        }
        CoberturaError::MissingColumn {
            source_name,
            column,
        } => missing_column(&source_name, &column),
        CoberturaError::SourceMissing { population } => {
            source_not_configured(&population, &format!("--{}s", population))
        }
        CoberturaError::Unauthorized => unauthorized(),
        CoberturaError::DevAccessDisabled => dev_access_disabled(),
        CoberturaError::ConfigInvalid { key, reason } => invalid_config(&key, &reason),
        other => CliError::new(other.to_string()),
    }
}
