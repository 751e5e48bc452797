//! Output formatting module
//!
//! Table and JSON rendering for CLI commands.

use serde::Serialize;
use std::fmt::Display;
use tabled::{Table, Tabled};

/// Output format enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Invalid format: {}. Use 'table' or 'json'", s)),
        }
    }
}

impl Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Print rows as a table, or `json_value` as pretty JSON
pub fn print_rows<R, J>(
    rows: &[R],
    json_value: &J,
    format: OutputFormat,
    empty: &str,
) -> anyhow::Result<()>
where
    R: Tabled,
    J: Serialize + ?Sized,
{
    match format {
        OutputFormat::Table => {
            if rows.is_empty() {
                println!("{}", empty);
            } else {
                println!("{}", Table::new(rows));
            }
        }
        OutputFormat::Json => print_json(json_value)?,
    }
    Ok(())
}

/// Print any serializable value as pretty JSON
pub fn print_json<J: Serialize + ?Sized>(value: &J) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print a section heading (respects quiet mode)
pub fn print_heading(title: &str, quiet: bool) {
    if !quiet {
        println!("{}", colored::Colorize::bold(title));
    }
}

/// Print a success message (respects quiet mode)
pub fn print_success(message: &str, quiet: bool) {
    if !quiet {
        println!("{}", colored::Colorize::green(message));
    }
}

/// Print a warning to stderr
pub fn print_warning(message: &str) {
    eprintln!("{}", colored::Colorize::yellow(message));
}

/// Print an error message
pub fn print_error(message: &str) {
    eprintln!("{}", colored::Colorize::red(message));
}
