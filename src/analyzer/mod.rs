//! Dockerfile layer-caching and image-size analyzer.
//!
//! Parses a Dockerfile into instructions and stages, runs the optimization
//! rules over the result and aggregates the findings into a `Report`.
//!
//! # Example
//!
//! ```rust
//! use dockerfile_optimizer::analyzer::{analyze, AnalysisOptions, Severity};
//!
//! let dockerfile = "FROM ubuntu:22.04\nRUN apt-get update\nRUN apt-get install -y curl\n";
//! let report = analyze(dockerfile, &AnalysisOptions::default());
//!
//! assert!(report.has_high());
//! for suggestion in report.suggestions_at_least(Severity::Medium) {
//!     println!("{:?} {} {}", suggestion.lines, suggestion.code, suggestion.title);
//! }
//! ```
//!
//! # Rules
//!
//! - DFO001: Combine installs of the same package manager within a stage
//! - DFO002: Package index update not in the same RUN as the install
//! - DFO003: Source tree copied before the dependency manifest
//! - DFO004: Package install without cache cleanup
//! - DFO005: ADD used where COPY would do
//! - DFO006: Build tooling in a single-stage build
//! - DFO007: Whole build context copied (check .dockerignore)
//! - DFO008: WORKDIR set after COPY/RUN
//! - DFO009: RUN chaining more than four commands
//! - DFO010: Consecutive COPY instructions
//! - DFO011: npm/yarn install without a cache mount

pub mod build_history;
pub mod formatter;
pub mod parser;
pub mod report;
pub mod rules;
pub mod size_estimator;
pub mod types;

pub use parser::{ParseResult, parse_dockerfile};
pub use report::{Report, Summary};
pub use types::{RuleCode, Severity, Suggestion};

use crate::error::{OptimizerError, Result};
use log::debug;
use std::path::Path;

/// Options the core analysis honours.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnalysisOptions {
    /// Rule codes that are not run at all.
    pub ignore_rules: Vec<String>,
}

impl AnalysisOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a rule to ignore.
    pub fn ignore(mut self, code: impl Into<String>) -> Self {
        self.ignore_rules.push(code.into());
        self
    }

    /// Check if a rule is ignored (case-insensitive).
    pub fn is_rule_ignored(&self, code: &str) -> bool {
        self.ignore_rules.iter().any(|r| r.eq_ignore_ascii_case(code))
    }
}

/// Analyze Dockerfile text.
///
/// Pure and deterministic: the same input always produces the same report.
pub fn analyze(content: &str, options: &AnalysisOptions) -> Report {
    let parse = parse_dockerfile(content);
    let suggestions = rules::run_rules(&parse, |code| options.is_rule_ignored(code));
    debug!(
        "{} suggestion(s) for {} instruction(s)",
        suggestions.len(),
        parse.instructions.len()
    );
    Report::new(parse, suggestions)
}

/// Read a Dockerfile from disk and analyze it.
pub fn analyze_file(path: &Path, options: &AnalysisOptions) -> Result<Report> {
    let content = std::fs::read_to_string(path).map_err(|source| OptimizerError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(analyze(&content, options))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analyze_dockerfile(content: &str) -> Report {
        analyze(content, &AnalysisOptions::default())
    }

    fn has_rule(report: &Report, code: &str) -> bool {
        report.suggestions().iter().any(|s| s.code.as_str() == code)
    }

    #[test]
    fn test_analyze_empty() {
        let report = analyze_dockerfile("");
        assert!(report.suggestions().is_empty());
        assert_eq!(report.summary().total_stages, 1);
        assert_eq!(report.summary().total_instructions, 0);
    }

    #[test]
    fn test_update_install_split_cites_both_lines() {
        let report = analyze_dockerfile(
            "FROM ubuntu:22.04\nRUN apt-get update\nRUN apt-get install -y curl\n",
        );
        let found = report
            .suggestions()
            .iter()
            .find(|s| s.code.as_str() == "DFO002")
            .unwrap();
        assert_eq!(found.severity, Severity::High);
        assert_eq!(found.lines, vec![2, 3]);
    }

    #[test]
    fn test_copy_order_cites_earlier_copy() {
        let report = analyze_dockerfile("FROM node:18\nCOPY . .\nCOPY package.json .\n");
        let found = report
            .suggestions()
            .iter()
            .find(|s| s.code.as_str() == "DFO003")
            .unwrap();
        assert_eq!(found.severity, Severity::High);
        assert_eq!(found.first_line(), Some(2));
    }

    #[test]
    fn test_prefer_copy() {
        assert!(has_rule(&analyze_dockerfile("FROM alpine\nADD ./app /app\n"), "DFO005"));
        assert!(!has_rule(
            &analyze_dockerfile("FROM alpine\nADD https://example.com/x.tar.gz /app\n"),
            "DFO005"
        ));
    }

    #[test]
    fn test_exec_form_run_is_checked() {
        let exec = analyze_dockerfile("FROM node\nRUN [\"npm\", \"ci\"]\n");
        let shell = analyze_dockerfile("FROM node\nRUN npm ci\n");
        let codes = |report: &Report| -> Vec<String> {
            report.suggestions().iter().map(|s| s.code.to_string()).collect()
        };
        assert_eq!(codes(&exec), vec!["DFO004", "DFO011"]);
        assert_eq!(codes(&exec), codes(&shell));
    }

    #[test]
    fn test_ignore_rules() {
        let options = AnalysisOptions::new().ignore("dfo005");
        let report = analyze("FROM alpine\nADD ./app /app\n", &options);
        assert!(!has_rule(&report, "DFO005"));
    }

    #[test]
    fn test_realistic_node_dockerfile() {
        let dockerfile = r#"
# syntax=docker/dockerfile:1
FROM node:18
COPY . .
WORKDIR /app
RUN apt-get update
RUN apt-get install -y build-essential python3
RUN npm install
COPY package.json .
COPY tsconfig.json .
RUN npm run build && npm prune --production && rm -rf /tmp/* && echo done && ls
CMD ["node", "dist/index.js"]
"#;
        let report = analyze_dockerfile(dockerfile);
        for code in [
            "DFO002", "DFO003", "DFO004", "DFO006", "DFO007", "DFO008", "DFO009", "DFO010",
            "DFO011",
        ] {
            assert!(has_rule(&report, code), "{} not triggered", code);
        }
        assert!(!has_rule(&report, "DFO001"));
        assert!(!has_rule(&report, "DFO005"));

        let ranks: Vec<u8> = report.suggestions().iter().map(|s| s.severity.rank()).collect();
        assert!(ranks.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_deterministic() {
        let dockerfile = "FROM node:18\nCOPY . .\nRUN npm install\nCOPY package.json .\n";
        let first = serde_json::to_string(&analyze_dockerfile(dockerfile)).unwrap();
        let second = serde_json::to_string(&analyze_dockerfile(dockerfile)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_analyze_file_missing() {
        let err = analyze_file(Path::new("/nonexistent/Dockerfile"), &AnalysisOptions::default())
            .unwrap_err();
        assert!(matches!(err, OptimizerError::Io { .. }));
    }
}
