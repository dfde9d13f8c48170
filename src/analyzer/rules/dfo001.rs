//! DFO001: Combine package installs
//!
//! Several RUN instructions in one stage installing packages with the same
//! package manager each produce a layer, and each one re-resolves the
//! package index. One RUN per manager caches better and keeps the image
//! smaller.

use super::commands::{PackageManager, install_managers};
use super::{codes, join_raw};
use crate::analyzer::parser::{Directive, Instruction, ParseResult};
use crate::analyzer::types::{Severity, Suggestion};

pub fn detect(result: &ParseResult) -> Vec<Suggestion> {
    let mut suggestions = Vec::new();

    for (stage, instructions) in result.stages_with_instructions() {
        // Managers in order of first appearance, with the RUNs using them.
        let mut by_manager: Vec<(PackageManager, Vec<&Instruction>)> = Vec::new();

        for instr in instructions.iter().filter(|i| i.is(Directive::Run)) {
            for manager in install_managers(&instr.command()) {
                match by_manager.iter_mut().find(|(pm, _)| *pm == manager) {
                    Some((_, runs)) => runs.push(instr),
                    None => by_manager.push((manager, vec![instr])),
                }
            }
        }

        for (manager, runs) in by_manager.into_iter().filter(|(_, runs)| runs.len() >= 2) {
            let before = join_raw(runs.iter().map(|i| i.raw.as_str()));
            let after = format!(
                "RUN {}",
                runs.iter()
                    .map(|i| i.command())
                    .collect::<Vec<_>>()
                    .join(" \\\n    && ")
            );

            suggestions.push(
                Suggestion::new(
                    codes::COMBINE_INSTALLS,
                    Severity::High,
                    format!(
                        "{} separate `{}` install layers in stage `{}`",
                        runs.len(),
                        manager.command(),
                        stage.name
                    ),
                    format!(
                        "Combine the `{}` installs into a single RUN so packages are resolved once and cached as one layer.",
                        manager.command()
                    ),
                    runs.iter().map(|i| i.line).collect(),
                )
                .with_snippets(before, after),
            );
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
    fn test_two_apt_installs() {
        let found = analyze_dockerfile(
            "FROM ubuntu:22.04\nRUN apt-get install -y curl\nRUN apt-get install -y git\n",
        );
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].severity, Severity::High);
        assert_eq!(found[0].lines, vec![2, 3]);
        assert!(found[0].title.contains("apt-get"));
        assert!(found[0].after.as_deref().unwrap().contains("&& apt-get install -y git"));
    }

    #[test]
    fn test_different_managers() {
        let found = analyze_dockerfile(
            "FROM python:3.12\nRUN apt-get install -y libpq-dev\nRUN pip install psycopg2\n",
        );
        assert!(found.is_empty());
    }

    #[test]
    fn test_separate_stages() {
        let found = analyze_dockerfile(
            "FROM node:18 AS a\nRUN npm install\nFROM node:18 AS b\nRUN npm ci\n",
        );
        assert!(found.is_empty());
    }

    #[test]
    fn test_one_finding_per_manager() {
        let found = analyze_dockerfile(
            "FROM node:18\nRUN npm install -g pm2\nRUN apt-get install -y curl\nRUN npm ci\nRUN apt-get install -y git\n",
        );
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].lines, vec![2, 4]);
        assert_eq!(found[1].lines, vec![3, 5]);
    }
}
