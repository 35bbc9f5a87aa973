use anyhow::Result;
use clap::ValueEnum;
use comfy_table::{Attribute, Cell, Color as TableColor, Table};
use serde::Serialize;

use crate::theme::{BULLET, Tone};

/// Output format options for CLI commands
#[derive(Clone, Debug, ValueEnum, Default, PartialEq)]
pub enum OutputFormat {
    /// Formatted table output (default)
    #[default]
    Table,
    /// JSON output for scripting
    Json,
    /// Compact single-line output
    Compact,
}

/// Global CLI options that affect output and behavior
#[derive(Clone, Debug, Default)]
pub struct GlobalOptions {
    pub output_format: OutputFormat,
    pub quiet: bool,
    pub verbose: bool,
    pub no_color: bool,
}

/// Trait for data that can be displayed as a table
pub trait TableDisplay {
    fn to_table(&self, options: &GlobalOptions) -> Table;
    fn to_compact(&self) -> String;
}

/// Output manager handles formatting and display
pub struct OutputManager {
    pub options: GlobalOptions,
}

impl OutputManager {
    pub fn new(options: GlobalOptions) -> Self {
        Self { options }
    }

    /// Display data according to the configured output format
    pub fn display<T>(&self, data: &T) -> Result<()>
    where
        T: Serialize + TableDisplay,
    {
        if self.options.quiet {
            return Ok(());
        }
        println!("{}", self.render(data)?);
        Ok(())
    }

    fn render<T>(&self, data: &T) -> Result<String>
    where
        T: Serialize + TableDisplay,
    {
        Ok(match self.options.output_format {
            OutputFormat::Json => serde_json::to_string_pretty(data)?,
            OutputFormat::Table => data.to_table(&self.options).to_string(),
            OutputFormat::Compact => data.to_compact(),
        })
    }

    /// Display an error message with color and icon
    pub fn error(&self, message: &str) {
        eprintln!("{}", self.message(Tone::Error, message));
    }

    /// Display a warning message
    pub fn warning(&self, message: &str) {
        if !self.options.quiet {
            eprintln!("{}", self.message(Tone::Warning, message));
        }
    }

    /// Display verbose information (only if verbose mode is enabled)
    pub fn verbose(&self, message: &str) {
        if self.options.verbose && !self.options.quiet {
            eprintln!("{}", self.message(Tone::Detail, message));
        }
    }

    /// Display info message with color and icon
    pub fn info(&self, message: &str) {
        if !self.options.quiet {
            println!("{}", self.message(Tone::Info, message));
        }
    }

    /// Display a heading, table output only
    pub fn heading(&self, text: &str) {
        if self.options.quiet || self.options.output_format != OutputFormat::Table {
            return;
        }
        let output = if self.options.no_color {
            format!("\n{text}\n{}", "=".repeat(text.chars().count()))
        } else {
            format!("\n{}", Tone::Heading.paint(text))
        };
        println!("{output}");
    }

    /// Display a key-value pair
    pub fn key_value(&self, key: &str, value: &str) {
        if !self.options.quiet {
            let output = if self.options.no_color {
                format!("{key}: {value}")
            } else {
                format!("{}: {}", Tone::Key.paint(key), Tone::Value.paint(value))
            };
            println!("{output}");
        }
    }

    /// Display a bullet list item
    pub fn bullet(&self, text: &str) {
        if !self.options.quiet {
            let output = if self.options.no_color {
                format!("  {BULLET} {text}")
            } else {
                format!("  {} {text}", Tone::Detail.paint(BULLET))
            };
            println!("{output}");
        }
    }

    fn message(&self, tone: Tone, message: &str) -> String {
        if self.options.no_color {
            format!("{} {message}", tone.marker())
        } else {
            format!("{} {}", tone.paint(tone.marker()), tone.paint(message))
        }
    }
}

/// Create a themed table
pub fn create_table(options: &GlobalOptions) -> Table {
    let mut table = Table::new();

    if !options.no_color {
        table.load_preset(comfy_table::presets::UTF8_FULL_CONDENSED);
    } else {
        table.load_preset(comfy_table::presets::ASCII_FULL);
    }

    table
}

/// Add themed header to table
pub fn add_table_header(options: &GlobalOptions, table: &mut Table, headers: &[&str]) {
    let header_cells: Vec<Cell> = headers
        .iter()
        .map(|h| {
            let cell = Cell::new(h).add_attribute(Attribute::Bold);
            if options.no_color { cell } else { cell.fg(TableColor::Cyan) }
        })
        .collect();
    table.set_header(header_cells);
}
