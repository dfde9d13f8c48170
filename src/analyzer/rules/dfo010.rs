//! DFO010: Combine consecutive COPY instructions
//!
//! Back-to-back COPYs with nothing in between each add a layer. When they
//! share a destination they can be merged into one.

use super::{codes, join_raw};
use crate::analyzer::parser::{Directive, Instruction, ParseResult};
use crate::analyzer::types::{Severity, Suggestion};

/// A merged COPY, when every instruction has no flags and the same destination.
fn merged(run: &[&Instruction]) -> Option<String> {
    let dest = run.first()?.positional().last()?;
    let mut sources: Vec<&str> = Vec::new();
    for instr in run {
        if instr.flags().next().is_some() || instr.positional().last() != Some(dest) {
            return None;
        }
        sources.extend(instr.copy_sources().iter().map(String::as_str));
    }
    Some(format!("COPY {} {}", sources.join(" "), dest))
}

fn suggestion(stage: &str, run: &[&Instruction]) -> Suggestion {
    let base = Suggestion::new(
        codes::COMBINE_COPIES,
        Severity::Low,
        format!("{} consecutive COPY instructions in stage `{}`", run.len(), stage),
        "Merge consecutive COPYs into one where they share a destination to save layers.",
        run.iter().map(|i| i.line).collect(),
    );
    match merged(run) {
        Some(after) => base.with_snippets(join_raw(run.iter().map(|i| i.raw.as_str())), after),
        None => base,
    }
}

pub fn detect(result: &ParseResult) -> Vec<Suggestion> {
    let mut suggestions = Vec::new();

    for (stage, instructions) in result.stages_with_instructions() {
        let mut run: Vec<&Instruction> = Vec::new();
        for instr in instructions {
            if instr.is(Directive::Copy) {
                run.push(instr);
                continue;
            }
            if run.len() >= 2 {
                suggestions.push(suggestion(&stage.name, &run));
            }
            run.clear();
        }
        if run.len() >= 2 {
            suggestions.push(suggestion(&stage.name, &run));
        }
    }

    suggestions
}
