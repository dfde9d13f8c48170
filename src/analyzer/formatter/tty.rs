//! TTY formatter.
//!
//! Suggestions are grouped by the stage they apply to, each followed by its
//! recommendation and, when a rule provides them, before/after snippets.

use crate::analyzer::Severity;
use crate::analyzer::build_history::{HistoryReport, format_bytes};
use crate::analyzer::formatter::{FileOutput, Formatter};
use crate::analyzer::report::Report;
use crate::analyzer::size_estimator::SizeEstimate;
use crate::analyzer::types::Suggestion;
use colored::{ColoredString, Colorize};
use std::io::Write;

/// TTY (terminal) output formatter.
#[derive(Debug, Clone)]
pub struct TtyFormatter {
    /// Use colors in output.
    pub colors: bool,
    pub min_severity: Severity,
}

impl TtyFormatter {
    pub fn new(min_severity: Severity) -> Self {
        Self {
            colors: true,
            min_severity,
        }
    }

    pub fn with_colors(mut self, colors: bool) -> Self {
        self.colors = colors;
        self
    }

    fn paint(&self, text: &str, style: fn(ColoredString) -> ColoredString) -> String {
        if self.colors {
            style(text.normal()).to_string()
        } else {
            text.to_string()
        }
    }

    fn badge(&self, severity: Severity) -> String {
        let label = format!("{:<6}", severity.as_str().to_uppercase());
        match severity {
            Severity::High => self.paint(&label, |s| s.red().bold()),
            Severity::Medium => self.paint(&label, |s| s.yellow().bold()),
            Severity::Low => self.paint(&label, |s| s.cyan()),
        }
    }

    fn write_suggestion<W: Write>(&self, s: &Suggestion, writer: &mut W) -> std::io::Result<()> {
        let lines = s
            .lines
            .iter()
            .map(|l| l.to_string())
            .collect::<Vec<_>>()
            .join(",");
        writeln!(
            writer,
            "  {} {} {} {}",
            self.badge(s.severity),
            self.paint(s.code.as_str(), |c| c.dimmed()),
            self.paint(&format!("line {}", lines), |c| c.dimmed()),
            s.title
        )?;
        writeln!(writer, "         {}", s.recommendation)?;

        if let (Some(before), Some(after)) = (&s.before, &s.after) {
            writeln!(writer, "         {}", self.paint("before:", |c| c.dimmed()))?;
            for line in before.lines() {
                writeln!(writer, "           {}", self.paint(line, |c| c.red()))?;
            }
            writeln!(writer, "         {}", self.paint("after:", |c| c.dimmed()))?;
            for line in after.lines() {
                writeln!(writer, "           {}", self.paint(line, |c| c.green()))?;
            }
        }
        Ok(())
    }

    fn write_report<W: Write>(&self, file: &str, report: &Report, writer: &mut W) -> std::io::Result<()> {
        let summary = report.summary();
        writeln!(
            writer,
            "{}: {} instruction{}, {} stage{}",
            self.paint(file, |c| c.bold()),
            summary.total_instructions,
            if summary.total_instructions == 1 { "" } else { "s" },
            summary.total_stages,
            if summary.total_stages == 1 { "" } else { "s" },
        )?;

        let groups = report.by_stage(self.min_severity);
        if groups.is_empty() {
            writeln!(writer, "  No suggestions at or above {} severity.", self.min_severity)?;
        }
        for group in &groups {
            writeln!(writer)?;
            match group.stage {
                Some(stage) => {
                    let mut header = format!("Stage {}", stage.name);
                    if !stage.base_image.is_empty() {
                        header.push_str(&format!(" (FROM {})", stage.base_image));
                    }
                    writeln!(writer, "{}", self.paint(&header, |c| c.bold()))?;
                }
                None => writeln!(writer, "{}", self.paint("General", |c| c.bold()))?,
            }
            for suggestion in &group.suggestions {
                self.write_suggestion(suggestion, writer)?;
            }
        }

        writeln!(writer)?;
        let mut parts = Vec::new();
        for severity in Severity::all() {
            let count = summary.count(severity);
            if count > 0 {
                parts.push(format!("{} {}", count, severity));
            }
        }
        if parts.is_empty() {
            writeln!(writer, "{}", self.paint("No optimization suggestions.", |c| c.green()))?;
        } else {
            writeln!(
                writer,
                "{} suggestion{}: {}",
                summary.total_suggestions,
                if summary.total_suggestions == 1 { "" } else { "s" },
                parts.join(", ")
            )?;
        }
        Ok(())
    }

    fn write_size<W: Write>(&self, estimate: &SizeEstimate, writer: &mut W) -> std::io::Result<()> {
        writeln!(writer)?;
        writeln!(
            writer,
            "{} ~{:.0}MB (base {} ~{:.0}MB)",
            self.paint("Estimated image size:", |c| c.bold()),
            estimate.estimated_mb,
            estimate.base_image,
            estimate.base_mb
        )?;
        for item in &estimate.breakdown {
            writeln!(writer, "  line {:<4} {:>7.1}MB  {}", item.line, item.mb, item.label)?;
        }
        for rec in &estimate.recommendations {
            writeln!(writer, "  - {}", rec)?;
        }
        Ok(())
    }

    fn write_history<W: Write>(&self, history: &HistoryReport, writer: &mut W) -> std::io::Result<()> {
        writeln!(writer)?;
        writeln!(
            writer,
            "{} {} layers, {} total",
            self.paint("Image history:", |c| c.bold()),
            history.layer_count,
            format_bytes(history.total_bytes)
        )?;
        for finding in &history.findings {
            writeln!(
                writer,
                "  {} {}",
                self.paint(&format!("{:>9}", format_bytes(finding.size_bytes)), |c| c.yellow()),
                finding.created_by
            )?;
            writeln!(writer, "            {}", finding.recommendation)?;
        }
        Ok(())
    }
}

impl Formatter for TtyFormatter {
    fn format<W: Write>(&self, outputs: &[FileOutput<'_>], writer: &mut W) -> std::io::Result<()> {
        for (i, out) in outputs.iter().enumerate() {
            if i > 0 {
                writeln!(writer)?;
            }
            self.write_report(out.file, out.report, writer)?;
            if let Some(estimate) = out.size_estimate {
                self.write_size(estimate, writer)?;
            }
            if let Some(history) = out.history {
                self.write_history(history, writer)?;
            }
        }
        Ok(())
    }
}
