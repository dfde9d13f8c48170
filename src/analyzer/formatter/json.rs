//! JSON formatter.
//!
//! Emits one array with an object per file, so several Dockerfiles still
//! produce a single JSON document.

use crate::analyzer::Severity;
use crate::analyzer::build_history::HistoryReport;
use crate::analyzer::formatter::{FileOutput, Formatter};
use crate::analyzer::parser::Stage;
use crate::analyzer::report::Summary;
use crate::analyzer::size_estimator::SizeEstimate;
use crate::analyzer::types::Suggestion;
use serde::Serialize;
use std::io::Write;

/// JSON output formatter.
#[derive(Debug, Clone)]
pub struct JsonFormatter {
    /// Pretty-print the JSON output.
    pub pretty: bool,
    pub min_severity: Severity,
}

impl JsonFormatter {
    pub fn new(min_severity: Severity) -> Self {
        Self {
            pretty: false,
            min_severity,
        }
    }

    pub fn pretty(min_severity: Severity) -> Self {
        Self {
            pretty: true,
            min_severity,
        }
    }
}

#[derive(Debug, Serialize)]
struct JsonFile<'a> {
    file: &'a str,
    summary: &'a Summary,
    base_images: &'a [String],
    stages: &'a [Stage],
    suggestions: Vec<&'a Suggestion>,
    #[serde(skip_serializing_if = "Option::is_none")]
    size_estimate: Option<&'a SizeEstimate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    history: Option<&'a HistoryReport>,
}

impl Formatter for JsonFormatter {
    fn format<W: Write>(&self, outputs: &[FileOutput<'_>], writer: &mut W) -> std::io::Result<()> {
        let files: Vec<JsonFile<'_>> = outputs
            .iter()
            .map(|out| {
                let parse = out.report.parse_result();
                JsonFile {
                    file: out.file,
                    summary: out.report.summary(),
                    base_images: &parse.base_images,
                    stages: &parse.stages,
                    suggestions: out.report.suggestions_at_least(self.min_severity).collect(),
                    size_estimate: out.size_estimate,
                    history: out.history,
                }
            })
            .collect();

        let json = if self.pretty {
            serde_json::to_string_pretty(&files)
        } else {
            serde_json::to_string(&files)
        }
        .map_err(std::io::Error::other)?;

        writeln!(writer, "{}", json)
    }
}
