//! DFO011: Use a BuildKit cache mount for npm/yarn installs
//!
//! `RUN --mount=type=cache` keeps the package manager's download cache
//! between builds without adding it to the layer.

use super::codes;
use super::commands::is_js_install;
use crate::analyzer::parser::{Directive, Instruction, ParseResult};
use crate::analyzer::types::{Severity, Suggestion};

fn has_cache_mount(instr: &Instruction) -> bool {
    instr
        .flags()
        .any(|flag| flag.starts_with("--mount=") && flag.contains("type=cache"))
}

fn cache_target(cmd: &str) -> &'static str {
    if cmd.contains("yarn") {
        "/usr/local/share/.cache/yarn"
    } else {
        "/root/.npm"
    }
}

pub fn detect(result: &ParseResult) -> Vec<Suggestion> {
    result
        .instructions_of(Directive::Run)
        .filter(|instr| is_js_install(&instr.command()) && !has_cache_mount(instr))
        .map(|instr| {
            Suggestion::new(
                codes::CACHE_MOUNT,
                Severity::Medium,
                "npm/yarn install without a cache mount",
                "Add a BuildKit cache mount so packages are reused across builds even when the install layer is invalidated.",
                vec![instr.line],
            )
            .with_snippets(instr.raw.clone(), {
                let command = instr.command();
                format!(
                    "RUN --mount=type=cache,target={} {}",
                    cache_target(&command),
                    command
                )
            })
        })
        .collect()
}
