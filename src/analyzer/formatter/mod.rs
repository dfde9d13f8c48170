//! Output formatters for analysis reports.
//!
//! - **TTY**: grouped, colored terminal output for humans
//! - **JSON**: machine-readable output for CI pipelines

mod json;
mod tty;

pub use json::JsonFormatter;
pub use tty::TtyFormatter;

use crate::analyzer::Severity;
use crate::analyzer::build_history::HistoryReport;
use crate::analyzer::report::Report;
use crate::analyzer::size_estimator::SizeEstimate;
use serde::{Deserialize, Serialize};
use std::io::Write;

/// Output format for reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Colored terminal output (default)
    #[default]
    Tty,
    /// JSON for CI/CD
    Json,
}

/// Everything rendered for one analyzed file.
#[derive(Debug, Clone, Copy)]
pub struct FileOutput<'a> {
    pub file: &'a str,
    pub report: &'a Report,
    pub size_estimate: Option<&'a SizeEstimate>,
    pub history: Option<&'a HistoryReport>,
}

impl<'a> FileOutput<'a> {
    pub fn new(file: &'a str, report: &'a Report) -> Self {
        Self {
            file,
            report,
            size_estimate: None,
            history: None,
        }
    }
}

/// Trait for formatting reports.
pub trait Formatter {
    /// Format the reports and write to the given writer.
    fn format<W: Write>(&self, outputs: &[FileOutput<'_>], writer: &mut W) -> std::io::Result<()>;

    /// Format the reports to a string.
    fn format_to_string(&self, outputs: &[FileOutput<'_>]) -> String {
        let mut buf = Vec::new();
        self.format(outputs, &mut buf).unwrap_or_default();
        String::from_utf8(buf).unwrap_or_default()
    }
}

/// Format reports using the specified output format.
///
/// Only suggestions at or above `min_severity` are rendered.
pub fn format_reports<W: Write>(
    outputs: &[FileOutput<'_>],
    format: OutputFormat,
    min_severity: Severity,
    colors: bool,
    writer: &mut W,
) -> std::io::Result<()> {
    match format {
        OutputFormat::Tty => TtyFormatter::new(min_severity)
            .with_colors(colors)
            .format(outputs, writer),
        OutputFormat::Json => JsonFormatter::pretty(min_severity).format(outputs, writer),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_serde() {
        let format: OutputFormat = serde_json::from_str("\"json\"").unwrap();
        assert_eq!(format, OutputFormat::Json);
        assert!(serde_json::from_str::<OutputFormat>("\"sarif\"").is_err());
        assert_eq!(OutputFormat::default(), OutputFormat::Tty);
    }
}
