//! Output formatting and writing utilities
//!
//! This module provides utilities for formatting and writing output
//! in various formats (JSON, YAML, human-readable), with specialized
//! support for validation results, test results and session summaries.

use crate::cli::OutputFormat;
use crate::error::Result;
use crate::logging::redaction;
use benchline_core::{TestResult, TestSummary, ValidationResult};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use serde_json::Value;
use std::io::{self, IsTerminal, Write};
use std::time::Duration;
use tracing::{debug, trace};

/// Trait for formatting output with specialized support for common types
pub trait OutputFormatter {
    /// Format a serializable value
    fn format<T: Serialize>(&self, value: &T) -> Result<String>;

    /// Format a validation result with one line per error
    fn format_validation_result(&self, result: &ValidationResult) -> Result<String>;

    /// Format one endpoint test result
    fn format_test_result(&self, result: &TestResult) -> Result<String>;

    /// Format a session summary
    fn format_summary(&self, summary: &TestSummary) -> Result<String>;
}

impl OutputFormatter for OutputFormat {
    fn format<T: Serialize>(&self, value: &T) -> Result<String> {
        match self {
            OutputFormat::Json => Ok(serde_json::to_string(value)?),
            OutputFormat::JsonPretty => Ok(serde_json::to_string_pretty(value)?),
            OutputFormat::Yaml => Ok(serde_yaml::to_string(value)?),
            OutputFormat::Human => Ok(serde_json::to_string_pretty(value)?),
        }
    }

    fn format_validation_result(&self, result: &ValidationResult) -> Result<String> {
        match self {
            OutputFormat::Human => Ok(format_validation_result_human(result)),
            _ => self.format(result),
        }
    }

    fn format_test_result(&self, result: &TestResult) -> Result<String> {
        match self {
            OutputFormat::Human => Ok(format_test_result_human(result)),
            _ => self.format(result),
        }
    }

    fn format_summary(&self, summary: &TestSummary) -> Result<String> {
        match self {
            OutputFormat::Human => Ok(format_summary_human(summary)),
            _ => self.format(summary),
        }
    }
}

/// Output writer that handles different output formats and colors
pub struct OutputWriter {
    format: OutputFormat,
    use_color: bool,
    show_progress: bool,
    quiet: bool,
    redact: bool,
    writer: Box<dyn Write>,
}

impl OutputWriter {
    /// Create a new output writer on stdout
    pub fn new(format: OutputFormat, use_color: bool, quiet: bool) -> Self {
        Self {
            format,
            use_color,
            show_progress: !quiet && io::stdout().is_terminal(),
            quiet,
            redact: true,
            writer: Box::new(io::stdout()),
        }
    }

    /// Create an output writer with a custom writer
    pub fn with_writer(format: OutputFormat, use_color: bool, quiet: bool, writer: Box<dyn Write>) -> Self {
        Self {
            format,
            use_color,
            show_progress: false,
            quiet,
            redact: true,
            writer,
        }
    }

    /// Enable or disable redaction of secrets in printed values
    pub fn with_redaction(mut self, redact: bool) -> Self {
        self.redact = redact;
        self
    }

    /// Enable or disable progress indicators
    pub fn with_progress(mut self, progress: bool) -> Self {
        self.show_progress = self.show_progress && progress;
        self
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

    /// Write an info message
    pub fn info(&mut self, message: &str) -> Result<()> {
        debug!("Output info: {}", message);

        if self.quiet || self.format != OutputFormat::Human {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&format!("{} {}", "ℹ".blue(), message))
        } else {
            self.writeln(&format!("INFO: {}", message))
        }
    }

    /// Write a success message
    pub fn success(&mut self, message: &str) -> Result<()> {
        if self.quiet || self.format != OutputFormat::Human {
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
        if self.format != OutputFormat::Human {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&message.yellow().to_string())
        } else {
            self.writeln(&format!("WARNING: {}", message))
        }
    }

    /// Write a section header
    pub fn section(&mut self, title: &str) -> Result<()> {
        if self.quiet || self.format != OutputFormat::Human {
            return Ok(());
        }

        self.writeln("")?;
        if self.use_color {
            self.writeln(&format!("═══ {} ═══", title).bright_blue().to_string())
        } else {
            self.writeln(&format!("=== {} ===", title))
        }
    }

    /// Write data in the configured format
    pub fn data<T: Serialize>(&mut self, value: &T) -> Result<()> {
        let value = self.printable(serde_json::to_value(value)?);
        trace!("Outputting data: {}", value);

        let formatted = self.format.format(&value)?;
        self.write_formatted(&formatted)
    }

    /// Write a validation result
    pub fn validation_result(&mut self, result: &ValidationResult) -> Result<()> {
        let formatted = self.format.format_validation_result(result)?;
        self.write_formatted(&formatted)
    }

    /// Write an endpoint test result, redacting its input and output
    pub fn test_result(&mut self, result: &TestResult) -> Result<()> {
        let mut printable = result.clone();
        printable.input = self.printable(printable.input);
        printable.output = self.printable(printable.output);

        let formatted = self.format.format_test_result(&printable)?;
        self.write_formatted(&formatted)
    }

    /// Write a session summary
    pub fn summary(&mut self, summary: &TestSummary) -> Result<()> {
        let formatted = self.format.format_summary(summary)?;
        self.write_formatted(&formatted)
    }

    /// Create a spinner for indeterminate progress
    pub fn spinner(&self, message: &str) -> Option<ProgressBar> {
        if !self.show_progress {
            return None;
        }

        let pb = ProgressBar::new_spinner();
        pb.set_style(default_spinner_style());
        pb.set_message(message.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));
        Some(pb)
    }

    fn printable(&self, mut value: Value) -> Value {
        if self.redact {
            redaction::redact_json_value(&mut value);
        }
        value
    }

    fn write_formatted(&mut self, formatted: &str) -> Result<()> {
        // YAML output already ends with a newline
        if formatted.ends_with('\n') {
            self.write(formatted)
        } else {
            self.writeln(formatted)
        }
    }
}

/// Helper function to create a spinner style
pub fn default_spinner_style() -> ProgressStyle {
    ProgressStyle::default_spinner()
        .template("{spinner:.green} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}

/// Format a validation result for human reading
fn format_validation_result_human(result: &ValidationResult) -> String {
    if result.is_valid() {
        return "✅ Input is valid\n".to_string();
    }

    let mut output = format!(
        "❌ Validation Failed - {} Error(s)\n\n",
        result.errors().len()
    );
    for (i, error) in result.errors().iter().enumerate() {
        output.push_str(&format!("{}. {}\n", i + 1, error));
    }
    output
}

/// Format a test result for human reading
fn format_test_result_human(result: &TestResult) -> String {
    let mut output = String::new();

    let status = if result.success { "✅ PASS" } else { "❌ FAIL" };
    output.push_str(&format!(
        "{} {} ({})\n",
        status, result.endpoint_name, result.endpoint_id
    ));
    output.push_str(&format!("  Result ID: {}\n", result.id));
    output.push_str(&format!("  Started: {}\n", result.started_at.to_rfc3339()));

    match result.latency_ms {
        Some(latency) => output.push_str(&format!("  Latency: {}ms\n", latency)),
        None => output.push_str("  Latency: not measured\n"),
    }

    if let Some(total) = result.total_tokens() {
        output.push_str(&format!(
            "  Tokens: {} in / {} out ({} total)\n",
            format_count(result.input_tokens),
            format_count(result.output_tokens),
            total
        ));
    }

    if let Some(error) = &result.error {
        output.push_str(&format!("  Error: {}\n", error));
    }

    output.push_str(&format!("  Input: {}\n", format_value_compact(&result.input)));
    if result.success {
        output.push_str(&format!("  Output: {}\n", format_value_compact(&result.output)));
    }

    output
}

/// Format a session summary for human reading
fn format_summary_human(summary: &TestSummary) -> String {
    let mut output = String::new();

    output.push_str(&format!("  Total: {}\n", summary.total));
    output.push_str(&format!("  Passed: {}\n", summary.passed));
    output.push_str(&format!("  Failed: {}\n", summary.failed));

    if let Some(rate) = summary.pass_rate() {
        output.push_str(&format!("  Pass Rate: {:.1}%\n", rate * 100.0));
    }
    if let Some(latency) = summary.average_latency_ms {
        output.push_str(&format!("  Average Latency: {:.1}ms\n", latency));
    }
    if summary.input_tokens > 0 || summary.output_tokens > 0 {
        output.push_str(&format!(
            "  Tokens: {} in / {} out\n",
            summary.input_tokens, summary.output_tokens
        ));
    }

    output
}

fn format_count(count: Option<u64>) -> String {
    count.map_or_else(|| "?".to_string(), |c| c.to_string())
}

/// Format a JSON value in a compact, human-readable way
fn format_value_compact(value: &Value) -> String {
    match value {
        Value::String(s) => format!("\"{}\"", s),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Array(arr) => {
            if arr.len() <= 3 {
                format!(
                    "[{}]",
                    arr.iter()
                        .map(format_value_compact)
                        .collect::<Vec<_>>()
                        .join(", ")
                )
            } else {
                format!("[{} items]", arr.len())
            }
        }
        Value::Object(obj) => {
            if obj.len() <= 3 {
                let items: Vec<String> = obj
                    .iter()
                    .map(|(k, v)| format!("{}: {}", k, format_value_compact(v)))
                    .collect();
                format!("{{{}}}", items.join(", "))
            } else {
                format!("{{{} fields}}", obj.len())
            }
        }
    }
}
