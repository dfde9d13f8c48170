//! DFO008: Set WORKDIR before COPY and RUN

use super::codes;
use crate::analyzer::parser::{Directive, ParseResult};
use crate::analyzer::types::{Severity, Suggestion};

pub fn detect(result: &ParseResult) -> Vec<Suggestion> {
    let mut suggestions = Vec::new();

    for (stage, instructions) in result.stages_with_instructions() {
        let mut seen_copy_or_run = false;
        for instr in instructions {
            match instr.directive {
                Directive::Copy | Directive::Run => seen_copy_or_run = true,
                Directive::Workdir if seen_copy_or_run => suggestions.push(Suggestion::new(
                    codes::WORKDIR_POSITION,
                    Severity::Low,
                    format!("WORKDIR set after COPY/RUN in stage `{}`", stage.name),
                    "Set WORKDIR right after FROM so every later instruction uses the same, explicit directory.",
                    vec![instr.line],
                )),
                _ => {}
            }
        }
    }

    suggestions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::parser::parse_dockerfile;

    fn analyze_dockerfile(content: &str) -> Vec<Suggestion> {
        detect(&parse_dockerfile(content))
    }

    #[test]
    fn test_workdir_after_copy() {
        let found = analyze_dockerfile("FROM node:18\nCOPY . /app\nWORKDIR /app\n");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].lines, vec![3]);
    }

    #[test]
    fn test_workdir_first() {
        assert!(analyze_dockerfile("FROM node:18\nWORKDIR /app\nCOPY . .\nRUN npm ci\n").is_empty());
    }

    #[test]
    fn test_reset_per_stage() {
        let found = analyze_dockerfile(
            "FROM node:18 AS a\nRUN echo\nFROM node:18 AS b\nWORKDIR /app\n",
        );
        assert!(found.is_empty());
    }
}
