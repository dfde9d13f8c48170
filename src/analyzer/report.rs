//! Report aggregation.
//!
//! A `Report` bundles the parse result with the severity-sorted suggestions
//! and summary counts. It is built once and only read afterwards.

use crate::analyzer::parser::{ParseResult, Stage};
use crate::analyzer::types::{Severity, Suggestion};
use serde::Serialize;

/// Summary counts for a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Summary {
    pub total_instructions: usize,
    pub total_stages: usize,
    pub multi_stage: bool,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
    pub total_suggestions: usize,
}

impl Summary {
    /// Count for a single severity.
    pub fn count(&self, severity: Severity) -> usize {
        match severity {
            Severity::High => self.high,
            Severity::Medium => self.medium,
            Severity::Low => self.low,
        }
    }
}

/// Suggestions belonging to one stage, for grouped display.
#[derive(Debug, Clone, Serialize)]
pub struct StageGroup<'a> {
    /// `None` for suggestions that cite no line.
    pub stage: Option<&'a Stage>,
    pub suggestions: Vec<&'a Suggestion>,
}

/// The result of analyzing one Dockerfile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    parse: ParseResult,
    suggestions: Vec<Suggestion>,
    summary: Summary,
}

impl Report {
    /// Combine a parse result with rule output.
    ///
    /// `suggestions` must already be in canonical order (see `run_rules`).
    pub fn new(parse: ParseResult, suggestions: Vec<Suggestion>) -> Self {
        let count = |severity: Severity| suggestions.iter().filter(|s| s.severity == severity).count();
        let summary = Summary {
            total_instructions: parse.instructions.len(),
            total_stages: parse.stages.len(),
            multi_stage: parse.multi_stage,
            high: count(Severity::High),
            medium: count(Severity::Medium),
            low: count(Severity::Low),
            total_suggestions: suggestions.len(),
        };

        Self {
            parse,
            suggestions,
            summary,
        }
    }

    pub fn parse_result(&self) -> &ParseResult {
        &self.parse
    }

    /// All suggestions, sorted by severity (high first), stable within a severity.
    pub fn suggestions(&self) -> &[Suggestion] {
        &self.suggestions
    }

    pub fn summary(&self) -> &Summary {
        &self.summary
    }

    /// Suggestions at or above `min`, in canonical order.
    pub fn suggestions_at_least(&self, min: Severity) -> impl Iterator<Item = &Suggestion> {
        self.suggestions.iter().filter(move |s| s.severity >= min)
    }

    /// Check if any high-severity suggestion is present.
    pub fn has_high(&self) -> bool {
        self.summary.high > 0
    }

    /// Group suggestions at or above `min` by the stage of their first cited line.
    ///
    /// Groups follow stage order; within a group the canonical order is kept.
    /// Suggestions citing no line go into a trailing group with no stage.
    pub fn by_stage(&self, min: Severity) -> Vec<StageGroup<'_>> {
        let mut groups: Vec<StageGroup<'_>> = self
            .parse
            .stages
            .iter()
            .map(|stage| StageGroup {
                stage: Some(stage),
                suggestions: Vec::new(),
            })
            .collect();
        let mut unplaced = Vec::new();

        for suggestion in self.suggestions_at_least(min) {
            let stage = suggestion
                .first_line()
                .and_then(|line| self.parse.stage_for_line(line));
            match stage.and_then(|s| groups.get_mut(s.index)) {
                Some(group) => group.suggestions.push(suggestion),
                None => unplaced.push(suggestion),
            }
        }

        groups.retain(|g| !g.suggestions.is_empty());
        if !unplaced.is_empty() {
            groups.push(StageGroup {
                stage: None,
                suggestions: unplaced,
            });
        }
        groups
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::parser::parse_dockerfile;

    fn suggestion(code: &str, severity: Severity, line: u32) -> Suggestion {
        Suggestion::new(code, severity, "t", "r", vec![line])
    }

    #[test]
    fn test_summary_counts() {
        let parse = parse_dockerfile("FROM a AS one\nRUN x\nFROM b\nRUN y\n");
        let report = Report::new(
            parse,
            vec![
                suggestion("DFO001", Severity::High, 2),
                suggestion("DFO004", Severity::Medium, 4),
                suggestion("DFO009", Severity::Low, 2),
                suggestion("DFO010", Severity::Low, 4),
            ],
        );
        let summary = report.summary();
        assert_eq!(summary.total_instructions, 4);
        assert_eq!(summary.total_stages, 2);
        assert!(summary.multi_stage);
        assert_eq!(summary.count(Severity::High), 1);
        assert_eq!(summary.medium, 1);
        assert_eq!(summary.low, 2);
        assert_eq!(summary.total_suggestions, 4);
        assert!(report.has_high());
    }

    #[test]
    fn test_suggestions_at_least() {
        let report = Report::new(
            parse_dockerfile("FROM a\nRUN x\n"),
            vec![
                suggestion("DFO002", Severity::High, 2),
                suggestion("DFO011", Severity::Medium, 2),
                suggestion("DFO005", Severity::Low, 2),
            ],
        );
        let codes: Vec<&str> = report
            .suggestions_at_least(Severity::Medium)
            .map(|s| s.code.as_str())
            .collect();
        assert_eq!(codes, vec!["DFO002", "DFO011"]);
        assert_eq!(report.suggestions().len(), 3);
    }

    #[test]
    fn test_by_stage_keeps_canonical_list() {
        let parse = parse_dockerfile("FROM a AS one\nRUN x\nFROM b AS two\nRUN y\n");
        let report = Report::new(
            parse,
            vec![
                suggestion("DFO001", Severity::High, 4),
                suggestion("DFO004", Severity::Medium, 2),
                suggestion("DFO009", Severity::Low, 4),
                Suggestion::new("DFO007", Severity::Low, "t", "r", vec![]),
            ],
        );
        let before = report.suggestions().to_vec();
        let groups = report.by_stage(Severity::Low);

        assert_eq!(groups.len(), 3);
        assert_eq!(groups[0].stage.map(|s| s.name.as_str()), Some("one"));
        assert_eq!(groups[0].suggestions.len(), 1);
        assert_eq!(groups[1].stage.map(|s| s.name.as_str()), Some("two"));
        let codes: Vec<&str> = groups[1].suggestions.iter().map(|s| s.code.as_str()).collect();
        assert_eq!(codes, vec!["DFO001", "DFO009"]);
        assert!(groups[2].stage.is_none());
        assert_eq!(report.suggestions(), before.as_slice());
    }
}
