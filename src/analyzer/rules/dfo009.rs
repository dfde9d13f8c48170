//! DFO009: Split very long RUN chains

use super::codes;
use super::commands::chained_steps;
use crate::analyzer::parser::{Directive, ParseResult};
use crate::analyzer::types::{Severity, Suggestion};

/// More `&&` than this is flagged.
const MAX_CHAINED: usize = 3;

pub fn detect(result: &ParseResult) -> Vec<Suggestion> {
    result
        .instructions_of(Directive::Run)
        .filter_map(|instr| {
            let chained = chained_steps(&instr.command());
            (chained > MAX_CHAINED).then(|| {
                Suggestion::new(
                    codes::SPLIT_LONG_RUN,
                    Severity::Low,
                    format!("RUN chains {} commands", chained + 1),
                    "Split unrelated steps into separate RUNs ordered from least to most frequently changing, or move them into a script, so edits rebuild less.",
                    vec![instr.line],
                )
            })
        })
        .collect()
}
