//! DFO002: Package index update separate from install
//!
//! A RUN that refreshes the package index (`apt-get update`, `apk update`,
//! `yum makecache`) without installing in the same RUN leaves a cached layer
//! that goes stale: later installs can be served from an old index.
//!
//! An update RUN is flagged whenever the matching install is not in the same
//! RUN. When the very next instruction of the stage is a RUN with the
//! matching install, both lines are cited and a merged RUN is proposed;
//! otherwise only the update line is cited.

use super::codes;
use super::commands::{has_install_for, update_managers};
use crate::analyzer::parser::{Directive, ParseResult};
use crate::analyzer::types::{Severity, Suggestion};

pub fn detect(result: &ParseResult) -> Vec<Suggestion> {
    let mut suggestions = Vec::new();

    for (_, instructions) in result.stages_with_instructions() {
        for (idx, instr) in instructions.iter().enumerate() {
            if !instr.is(Directive::Run) {
                continue;
            }

            let command = instr.command();
            for manager in update_managers(&command) {
                if has_install_for(&command, manager) {
                    continue;
                }

                let paired = instructions
                    .get(idx + 1)
                    .filter(|next| next.is(Directive::Run))
                    .filter(|next| has_install_for(&next.command(), manager));

                let suggestion = match paired {
                    Some(install) => Suggestion::new(
                        codes::UPDATE_WITHOUT_INSTALL,
                        Severity::High,
                        format!(
                            "`{} update` and the package install run in separate layers",
                            manager.command()
                        ),
                        "Run the index update and the install in the same RUN so a cached update layer can never be reused with a newer install.",
                        vec![instr.line, install.line],
                    )
                    .with_snippets(
                        format!("{}\n{}", instr.raw, install.raw),
                        format!("RUN {} \\\n    && {}", command, install.command()),
                    ),
                    None => Suggestion::new(
                        codes::UPDATE_WITHOUT_INSTALL,
                        Severity::High,
                        format!(
                            "`{} update` without a package install in the same layer",
                            manager.command()
                        ),
                        format!(
                            "Chain `{} update` directly with the install that needs it; a standalone update layer is cached and goes stale.",
                            manager.command()
                        ),
                        vec![instr.line],
                    ),
                };
                suggestions.push(suggestion);
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
    fn test_update_then_install_in_next_run() {
        let found = analyze_dockerfile(
            "FROM ubuntu:22.04\nRUN apt-get update\nRUN apt-get install -y curl\n",
        );
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].severity, Severity::High);
        assert_eq!(found[0].lines, vec![2, 3]);
        assert_eq!(
            found[0].after.as_deref(),
            Some("RUN apt-get update \\\n    && apt-get install -y curl")
        );
    }

    #[test]
    fn test_update_alone() {
        let found = analyze_dockerfile("FROM ubuntu:22.04\nRUN apt-get update\nCOPY . .\n");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].lines, vec![2]);
        assert!(found[0].after.is_none());
    }

    #[test]
    fn test_update_and_install_same_run() {
        let found = analyze_dockerfile(
            "FROM ubuntu:22.04\nRUN apt-get update && apt-get install -y curl\n",
        );
        assert!(found.is_empty());
    }

    #[test]
    fn test_install_not_adjacent() {
        let found = analyze_dockerfile(
            "FROM ubuntu:22.04\nRUN apt-get update\nENV DEBIAN_FRONTEND=noninteractive\nRUN apt-get install -y curl\n",
        );
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].lines, vec![2]);
    }

    #[test]
    fn test_apk_update() {
        let found = analyze_dockerfile("FROM alpine\nRUN apk update\nRUN apk add curl\n");
        assert_eq!(found.len(), 1);
        assert!(found[0].title.contains("apk update"));
    }
}
