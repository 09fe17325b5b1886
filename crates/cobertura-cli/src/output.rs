use console::style;
use serde::Serialize;
use std::fmt::Display;
use tabled::{settings::Style, Table, Tabled};

/// Output format mode
#[derive(Debug, Clone, Copy)]
pub enum OutputFormat {
    Human,
    Json,
}

const BAR_WIDTH: usize = 40;

pub struct OutputWriter {
    format: OutputFormat,
}

impl OutputWriter {
    pub fn new(json: bool) -> Self {
        Self {
            format: if json {
                OutputFormat::Json
            } else {
                OutputFormat::Human
            },
        }
    }

    pub fn success(&self, message: impl Display) {
        match self.format {
            OutputFormat::Human => {
                println!("{} {}", style("✓").green().bold(), message);
            }
            OutputFormat::Json => print_status("success", message),
        }
    }

    /// Warnings go to stderr in both modes so stdout stays a single JSON document
    pub fn warning(&self, message: impl Display) {
        match self.format {
            OutputFormat::Human => {
                eprintln!("{} {}", style("⚠").yellow().bold(), message);
            }
            OutputFormat::Json => {
                let output = serde_json::json!({
                    "status": "warning",
                    "message": message.to_string(),
                });
                if let Ok(text) = serde_json::to_string_pretty(&output) {
                    eprintln!("{}", text);
                }
            }
        }
    }

    pub fn table<T: Tabled>(&self, data: Vec<T>) {
        if let OutputFormat::Human = self.format {
            if data.is_empty() {
                println!("{}", style("(no data)").dim());
            } else {
                let mut table = Table::new(data);
                table.with(Style::rounded());
                println!("{}", table);
            }
        }
    }

    /// Horizontal bars scaled to the largest value
    pub fn bar_chart(&self, rows: &[(String, usize)]) {
        if let OutputFormat::Human = self.format {
            let max = rows.iter().map(|(_, value)| *value).max().unwrap_or(0);
            if max == 0 {
                return;
            }
            let label_width = rows.iter().map(|(label, _)| label.chars().count()).max();
            let label_width = label_width.unwrap_or(0);
            for (label, value) in rows {
                let width = (value * BAR_WIDTH).div_ceil(max);
                println!(
                    "{:<label_width$}  {} {}",
                    label,
                    style("█".repeat(width)).red(),
                    crate::format::format_count(*value),
                );
            }
        }
    }

    /// `{status, data}` envelope in JSON mode; nothing in human mode
    pub fn result<T: Serialize>(&self, data: T) -> anyhow::Result<()> {
        if let OutputFormat::Json = self.format {
            let output = serde_json::json!({
                "status": "success",
                "data": data,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        Ok(())
    }

    pub fn kv(&self, key: impl Display, value: impl Display) {
        if let OutputFormat::Human = self.format {
            println!("{}: {}", style(key).bold(), value);
        }
    }

    pub fn section(&self, title: impl Display) {
        match self.format {
            OutputFormat::Human => {
                println!("\n{}", style(title).bold().underlined());
            }
            OutputFormat::Json => {}
        }
    }

    pub fn is_json(&self) -> bool {
        matches!(self.format, OutputFormat::Json)
    }
}

fn print_status(status: &str, message: impl Display) {
    let output = serde_json::json!({
        "status": status,
        "message": message.to_string(),
    });
    if let Ok(text) = serde_json::to_string_pretty(&output) {
        println!("{}", text);
    }
}
