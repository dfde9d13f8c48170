//! DFO004: Clean the package cache in the install layer
//!
//! Package managers leave indexes and downloaded archives behind. Unless they
//! are removed in the same RUN, they are baked into the layer for good.

use super::codes;
use super::commands::{PackageManager, has_cleanup, install_managers, install_match_end};
use crate::analyzer::parser::{Directive, Instruction, ParseResult};
use crate::analyzer::types::{Severity, Suggestion};

fn with_cleanup(instr: &Instruction, manager: PackageManager) -> String {
    let cmd = instr.command();
    if manager.cleanup_is_flag() {
        if let Some(end) = install_match_end(&cmd, manager) {
            return format!("RUN {} {}{}", &cmd[..end], manager.cleanup_hint(), &cmd[end..]);
        }
    }
    format!("RUN {} \\\n    && {}", cmd, manager.cleanup_hint())
}

pub fn detect(result: &ParseResult) -> Vec<Suggestion> {
    result
        .instructions
        .iter()
        .filter(|i| i.is(Directive::Run))
        .filter(|i| !has_cleanup(&i.command()))
        .filter_map(|instr| {
            let manager = *install_managers(&instr.command()).first()?;
            Some(
                Suggestion::new(
                    codes::MISSING_CLEANUP,
                    Severity::Medium,
                    format!("`{}` install leaves its cache in the layer", manager.command()),
                    format!(
                        "Remove the package cache in the same RUN (`{}`) so it never lands in the image.",
                        manager.cleanup_hint()
                    ),
                    vec![instr.line],
                )
                .with_snippets(instr.raw.clone(), with_cleanup(instr, manager)),
            )
        })
        .collect()
}
