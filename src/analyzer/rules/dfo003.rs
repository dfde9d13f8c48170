//! DFO003: Copy dependency manifests before the source tree
//!
//! Copying the whole build context before the dependency manifest means
//! every source change invalidates the dependency-install layer. Copy the
//! manifest, install, then copy the rest.

use super::codes;
use crate::analyzer::parser::{Instruction, ParseResult};
use crate::analyzer::types::{Severity, Suggestion};

/// Dependency manifest and lock file names.
const MANIFESTS: &[&str] = &[
    "package.json",
    "package-lock.json",
    "yarn.lock",
    "pnpm-lock.yaml",
    "npm-shrinkwrap.json",
    "requirements.txt",
    "Pipfile",
    "Pipfile.lock",
    "pyproject.toml",
    "poetry.lock",
    "go.mod",
    "go.sum",
    "Cargo.toml",
    "Cargo.lock",
    "Gemfile",
    "Gemfile.lock",
    "composer.json",
    "composer.lock",
    "pom.xml",
    "build.gradle",
    "build.gradle.kts",
];

fn is_manifest(source: &str) -> bool {
    let file = source.rsplit('/').next().unwrap_or(source);
    MANIFESTS.contains(&file) || (file.starts_with("requirements") && file.ends_with(".txt"))
}

fn copies_manifest(instr: &Instruction) -> bool {
    instr.is_copy_like() && instr.copy_sources().iter().any(|s| is_manifest(s))
}

pub fn detect(result: &ParseResult) -> Vec<Suggestion> {
    let mut suggestions = Vec::new();

    for (stage, instructions) in result.stages_with_instructions() {
        for (idx, whole) in instructions.iter().enumerate() {
            if !whole.copies_whole_context() {
                continue;
            }
            let Some(manifest) = instructions[idx + 1..].iter().find(|i| copies_manifest(i)) else {
                continue;
            };

            suggestions.push(
                Suggestion::new(
                    codes::COPY_ORDER,
                    Severity::High,
                    format!(
                        "Source tree copied before dependency manifest in stage `{}`",
                        stage.name
                    ),
                    "Copy the dependency manifest and install dependencies before copying the rest of the source, so code changes don't invalidate the install layer.",
                    vec![whole.line, manifest.line],
                )
                .with_snippets(
                    format!("{}\n...\n{}", whole.raw, manifest.raw),
                    format!("{}\n# install dependencies here\n{}", manifest.raw, whole.raw),
                ),
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
    fn test_source_before_manifest() {
        let found = analyze_dockerfile(
            "FROM node:18\nWORKDIR /app\nCOPY . .\nRUN echo build\nCOPY package.json .\n",
        );
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].severity, Severity::High);
        assert_eq!(found[0].lines[0], 3);
        assert_eq!(found[0].lines, vec![3, 5]);
    }

    #[test]
    fn test_manifest_first() {
        let found = analyze_dockerfile(
            "FROM node:18\nCOPY package.json package-lock.json ./\nRUN npm ci\nCOPY . .\n",
        );
        assert!(found.is_empty());
    }

    #[test]
    fn test_different_stages() {
        let found = analyze_dockerfile(
            "FROM node:18 AS build\nCOPY . .\nFROM node:18\nCOPY package.json .\n",
        );
        assert!(found.is_empty());
    }

    #[test]
    fn test_requirements_variant_and_add() {
        let found = analyze_dockerfile(
            "FROM python:3.12\nADD ./ /srv\nCOPY requirements-dev.txt /srv/\n",
        );
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].lines, vec![2, 3]);
    }

    #[test]
    fn test_is_manifest() {
        assert!(is_manifest("app/package.json"));
        assert!(is_manifest("go.sum"));
        assert!(!is_manifest("src/"));
    }
}
