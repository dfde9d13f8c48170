//! DFO006: Consider a multi-stage build
//!
//! Compilers and build tooling installed in a single-stage build end up in
//! the final image. A builder stage keeps them out.

use super::codes;
use super::commands::installed_build_tools;
use crate::analyzer::parser::{Directive, ParseResult};
use crate::analyzer::types::{Severity, Suggestion};

pub fn detect(result: &ParseResult) -> Vec<Suggestion> {
    if result.multi_stage {
        return Vec::new();
    }

    let mut tools: Vec<&str> = Vec::new();
    let mut lines = Vec::new();
    for instr in result.instructions_of(Directive::Run) {
        let installed = installed_build_tools(&instr.command());
        if installed.is_empty() {
            continue;
        }
        for tool in installed {
            if !tools.contains(&tool) {
                tools.push(tool);
            }
        }
        lines.push(instr.line);
    }

    if lines.is_empty() {
        return Vec::new();
    }

    let base = result
        .final_stage()
        .map(|s| s.base_image.as_str())
        .filter(|b| !b.is_empty())
        .unwrap_or("<base>");

    vec![
        Suggestion::new(
            codes::CONSIDER_MULTI_STAGE,
            Severity::Medium,
            format!("Build tooling ({}) ships in the final image", tools.join(", ")),
            "Move compilation into a builder stage and copy only the build output into a slim runtime stage.",
            lines,
        )
        .with_snippets(
            format!("FROM {}\n# build tools and compilation\n...", base),
            format!(
                "FROM {} AS builder\n# build tools and compilation\n...\n\nFROM <runtime-image>\nCOPY --from=builder /app/out /app",
                base
            ),
        ),
    ]
}
