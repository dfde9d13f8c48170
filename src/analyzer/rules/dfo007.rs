//! DFO007: Check .dockerignore when copying the whole context
//!
//! `COPY . .` sends everything in the build context into the layer, and any
//! change to any file invalidates it. Medium for single-stage builds, where
//! the copy lands in the final image; low when a later stage can filter it.

use super::codes;
use crate::analyzer::parser::ParseResult;
use crate::analyzer::types::{Severity, Suggestion};

pub fn detect(result: &ParseResult) -> Vec<Suggestion> {
    let lines: Vec<u32> = result
        .instructions
        .iter()
        .filter(|i| i.copies_whole_context())
        .map(|i| i.line)
        .collect();

    if lines.is_empty() {
        return Vec::new();
    }

    let severity = if result.multi_stage {
        Severity::Low
    } else {
        Severity::Medium
    };

    vec![Suggestion::new(
        codes::DOCKERIGNORE,
        severity,
        "Whole build context copied into the image",
        "Make sure a .dockerignore excludes .git, node_modules, build output, logs and secrets so unrelated changes don't invalidate this layer.",
        lines,
    )]
}
