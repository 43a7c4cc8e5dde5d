//! Output formatting and writing utilities
//!
//! Every command renders one serializable value. Human output gets a short
//! text form (and tables where that reads better); the machine formats
//! (JSON, pretty JSON, YAML) serialize the value as-is.

use crate::cli::OutputFormat;
use crate::error::Result;
use colored::Colorize;
use serde::Serialize;
use sobind_core::{InterfaceDescriptor, SymbolSpec};
use std::io::{self, Write};
use tracing::trace;

/// Trait for formatting output with specialized support for common types
pub trait OutputFormatter {
    /// Format a serializable value
    fn format<T: Serialize>(&self, value: &T) -> Result<String>;
}

impl OutputFormatter for OutputFormat {
    fn format<T: Serialize>(&self, value: &T) -> Result<String> {
        match self {
            OutputFormat::Json => Ok(serde_json::to_string(value)?),
            OutputFormat::JsonPretty => Ok(serde_json::to_string_pretty(value)?),
            OutputFormat::Yaml => Ok(serde_yaml::to_string(value)?),
            OutputFormat::Human => {
                // For human format, use pretty JSON as fallback
                Ok(serde_json::to_string_pretty(value)?)
            }
        }
    }
}

/// Output writer that handles different output formats and colors
pub struct OutputWriter {
    format: OutputFormat,
    use_color: bool,
    quiet: bool,
    writer: Box<dyn Write>,
}

impl OutputWriter {
    /// Create a new output writer on stdout
    pub fn new(format: OutputFormat, use_color: bool, quiet: bool) -> Self {
        Self::with_writer(format, use_color, quiet, Box::new(io::stdout()))
    }

    /// Create an output writer with a custom writer
    pub fn with_writer(
        format: OutputFormat,
        use_color: bool,
        quiet: bool,
        writer: Box<dyn Write>,
    ) -> Self {
        Self {
            format,
            use_color,
            quiet,
            writer,
        }
    }

    /// Get the output format
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Whether human-readable text is being produced
    pub fn is_human(&self) -> bool {
        self.format == OutputFormat::Human
    }

    /// Write raw output
    pub fn write(&mut self, content: &str) -> Result<()> {
        write!(self.writer, "{}", content)?;
        self.writer.flush()?;
        Ok(())
    }

    /// Write a line of output
    pub fn writeln(&mut self, content: &str) -> Result<()> {
        writeln!(self.writer, "{}", content)?;
        self.writer.flush()?;
        Ok(())
    }

    /// Write a success message
    pub fn success(&mut self, message: &str) -> Result<()> {
        if self.quiet || !self.is_human() {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&message.green().to_string())
        } else {
            self.writeln(message)
        }
    }

    /// Write a warning message
    pub fn warning(&mut self, message: &str) -> Result<()> {
        if !self.is_human() {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&message.yellow().to_string())
        } else {
            self.writeln(&format!("WARNING: {}", message))
        }
    }

    /// Write data in the configured format
    pub fn data<T: Serialize>(&mut self, value: &T) -> Result<()> {
        let formatted = self.format.format(value)?;
        trace!(bytes = formatted.len(), "Outputting data");

        if self.is_human() || !formatted.ends_with('\n') {
            self.writeln(&formatted)
        } else {
            self.write(&formatted)
        }
    }

    /// Write a command result: `human` text in human mode, `value` otherwise
    ///
    /// The human text is the result itself, so quiet mode does not hide it.
    pub fn result<T: Serialize>(&mut self, human: &str, value: &T) -> Result<()> {
        if self.is_human() {
            self.writeln(human)
        } else {
            self.data(value)
        }
    }

    /// Write an interface descriptor, as a symbol table in human format
    pub fn interface(&mut self, descriptor: &InterfaceDescriptor) -> Result<()> {
        if !self.is_human() {
            return self.data(descriptor);
        }

        self.writeln(&format!("library: {}", descriptor.library))?;
        self.writeln(&format!("abi version: {}", descriptor.abi_version))?;
        self.writeln(&format!("encoding: {}", descriptor.encoding))?;
        let rows = descriptor.symbols.iter().map(symbol_row).collect();
        self.table(&["symbol", "params", "returns", "ownership"], rows)
    }

    /// Write a table (human format only)
    pub fn table(&mut self, headers: &[&str], rows: Vec<Vec<String>>) -> Result<()> {
        if !self.is_human() {
            return Ok(());
        }

        // Calculate column widths
        let mut widths = headers.iter().map(|h| h.chars().count()).collect::<Vec<_>>();
        for row in &rows {
            for (i, cell) in row.iter().enumerate() {
                if i < widths.len() {
                    widths[i] = widths[i].max(cell.chars().count());
                }
            }
        }

        let header_row = headers
            .iter()
            .enumerate()
            .map(|(i, h)| format!("{:width$}", h, width = widths[i]))
            .collect::<Vec<_>>()
            .join(" │ ");

        if self.use_color {
            self.writeln(header_row.trim_end().bold().to_string().as_str())?;
        } else {
            self.writeln(header_row.trim_end())?;
        }

        let separator = widths
            .iter()
            .map(|w| "─".repeat(*w))
            .collect::<Vec<_>>()
            .join("─┼─");
        self.writeln(&separator)?;

        for row in rows {
            let row_str = row
                .iter()
                .enumerate()
                .map(|(i, cell)| {
                    if i < widths.len() {
                        format!("{:width$}", cell, width = widths[i])
                    } else {
                        cell.clone()
                    }
                })
                .collect::<Vec<_>>()
                .join(" │ ");
            self.writeln(row_str.trim_end())?;
        }

        Ok(())
    }
}

fn symbol_row(symbol: &SymbolSpec) -> Vec<String> {
    let params = symbol
        .params
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    let ownership = if symbol.allocates() { "caller frees" } else { "" };

    vec![
        symbol.name.clone(),
        params,
        symbol.returns.to_string(),
        ownership.to_string(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{buffered_writer, SharedBuffer};
    use pretty_assertions::assert_eq;

    fn writer(format: OutputFormat, quiet: bool) -> (OutputWriter, SharedBuffer) {
        buffered_writer(format, quiet)
    }

    #[derive(Serialize)]
    struct Sample {
        operation: &'static str,
        result: i64,
    }

    #[test]
    fn test_result_human_and_json() {
        let sample = Sample {
            operation: "factorial",
            result: 120,
        };

        let (mut out, buffer) = writer(OutputFormat::Human, false);
        out.result("5! = 120", &sample).unwrap();
        assert_eq!(buffer.contents(), "5! = 120\n");

        let (mut out, buffer) = writer(OutputFormat::Json, false);
        out.result("5! = 120", &sample).unwrap();
        assert_eq!(buffer.contents(), "{\"operation\":\"factorial\",\"result\":120}\n");
    }

    #[test]
    fn test_yaml_output_is_not_double_terminated() {
        let (mut out, buffer) = writer(OutputFormat::Yaml, false);
        out.data(&Sample {
            operation: "factorial",
            result: 1,
        })
        .unwrap();
        assert_eq!(buffer.contents(), "operation: factorial\nresult: 1\n");
    }

    #[test]
    fn test_quiet_hides_messages_but_not_results() {
        let (mut out, buffer) = writer(OutputFormat::Human, true);
        out.success("done").unwrap();
        out.result("Hello, World!", &"Hello, World!").unwrap();
        assert_eq!(buffer.contents(), "Hello, World!\n");
    }

    #[test]
    fn test_messages_are_suppressed_for_machine_formats() {
        let (mut out, buffer) = writer(OutputFormat::JsonPretty, false);
        out.success("done").unwrap();
        out.warning("careful").unwrap();
        out.table(&["a"], vec![vec!["1".to_string()]]).unwrap();
        assert_eq!(buffer.contents(), "");
    }

    #[test]
    fn test_table_layout() {
        let (mut out, buffer) = writer(OutputFormat::Human, false);
        out.table(
            &["n", "n!"],
            vec![
                vec!["1".to_string(), "1".to_string()],
                vec!["10".to_string(), "3628800".to_string()],
            ],
        )
        .unwrap();

        let expected = "n  │ n!\n───┼────────\n1  │ 1\n10 │ 3628800\n";
        assert_eq!(buffer.contents(), expected);
    }

    #[test]
    fn test_interface_human_marks_allocating_symbols() {
        let (mut out, buffer) = writer(OutputFormat::Human, false);
        out.interface(&InterfaceDescriptor::current()).unwrap();

        let text = buffer.contents();
        assert!(text.starts_with("library: example\nabi version: 1\nencoding: UTF-8\nsymbol"));
        let greet_line = text.lines().find(|l| l.starts_with("greet ")).unwrap();
        assert!(greet_line.ends_with("caller frees"));
        let free_line = text.lines().find(|l| l.starts_with("free_result ")).unwrap();
        assert!(!free_line.ends_with("caller frees"));
    }

    #[test]
    fn test_interface_json_round_trips() {
        let (mut out, buffer) = writer(OutputFormat::Json, false);
        let descriptor = InterfaceDescriptor::current();
        out.interface(&descriptor).unwrap();
        assert_eq!(
            InterfaceDescriptor::from_json(buffer.contents().trim_end()).unwrap(),
            descriptor
        );
    }
}
