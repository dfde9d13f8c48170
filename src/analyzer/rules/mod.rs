//! Optimization rules for Dockerfiles.
//!
//! Each rule lives in its own module and exposes a pure
//! `detect(&ParseResult) -> Vec<Suggestion>` function. The registry below is
//! the single, statically ordered list of rules; it is never rebuilt and
//! carries no mutable state, so rules can be run in any order or in parallel
//! without changing their output.

pub mod commands;

mod dfo001;
mod dfo002;
mod dfo003;
mod dfo004;
mod dfo005;
mod dfo006;
mod dfo007;
mod dfo008;
mod dfo009;
mod dfo010;
mod dfo011;

use crate::analyzer::parser::ParseResult;
use crate::analyzer::types::{Severity, Suggestion};
use log::trace;

// ============================================================================
// Rule Codes
// ============================================================================

/// Rule code constants.
pub mod codes {
    pub const COMBINE_INSTALLS: &str = "DFO001";
    pub const UPDATE_WITHOUT_INSTALL: &str = "DFO002";
    pub const COPY_ORDER: &str = "DFO003";
    pub const MISSING_CLEANUP: &str = "DFO004";
    pub const PREFER_COPY: &str = "DFO005";
    pub const CONSIDER_MULTI_STAGE: &str = "DFO006";
    pub const DOCKERIGNORE: &str = "DFO007";
    pub const WORKDIR_POSITION: &str = "DFO008";
    pub const SPLIT_LONG_RUN: &str = "DFO009";
    pub const COMBINE_COPIES: &str = "DFO010";
    pub const CACHE_MOUNT: &str = "DFO011";
}

// ============================================================================
// Rule Registry
// ============================================================================

/// Detector signature shared by every rule.
pub type Detector = fn(&ParseResult) -> Vec<Suggestion>;

/// A registry entry.
#[derive(Debug, Clone, Copy)]
pub struct RuleEntry {
    /// Stable rule code (e.g., "DFO001").
    pub code: &'static str,
    /// Short human-readable name.
    pub name: &'static str,
    /// Default severity. DFO007 lowers it for multi-stage builds.
    pub severity: Severity,
    /// The detector.
    pub detect: Detector,
}

static RULES: &[RuleEntry] = &[
    RuleEntry {
        code: codes::COMBINE_INSTALLS,
        name: "Combine package installs",
        severity: Severity::High,
        detect: dfo001::detect,
    },
    RuleEntry {
        code: codes::UPDATE_WITHOUT_INSTALL,
        name: "Update separate from install",
        severity: Severity::High,
        detect: dfo002::detect,
    },
    RuleEntry {
        code: codes::COPY_ORDER,
        name: "Copy dependency manifests first",
        severity: Severity::High,
        detect: dfo003::detect,
    },
    RuleEntry {
        code: codes::MISSING_CLEANUP,
        name: "Clean package cache",
        severity: Severity::Medium,
        detect: dfo004::detect,
    },
    RuleEntry {
        code: codes::PREFER_COPY,
        name: "Prefer COPY over ADD",
        severity: Severity::Low,
        detect: dfo005::detect,
    },
    RuleEntry {
        code: codes::CONSIDER_MULTI_STAGE,
        name: "Consider a multi-stage build",
        severity: Severity::Medium,
        detect: dfo006::detect,
    },
    RuleEntry {
        code: codes::DOCKERIGNORE,
        name: "Check .dockerignore",
        severity: Severity::Medium,
        detect: dfo007::detect,
    },
    RuleEntry {
        code: codes::WORKDIR_POSITION,
        name: "Set WORKDIR early",
        severity: Severity::Low,
        detect: dfo008::detect,
    },
    RuleEntry {
        code: codes::SPLIT_LONG_RUN,
        name: "Split long RUN",
        severity: Severity::Low,
        detect: dfo009::detect,
    },
    RuleEntry {
        code: codes::COMBINE_COPIES,
        name: "Combine consecutive COPYs",
        severity: Severity::Low,
        detect: dfo010::detect,
    },
    RuleEntry {
        code: codes::CACHE_MOUNT,
        name: "Use a cache mount",
        severity: Severity::Medium,
        detect: dfo011::detect,
    },
];

/// All rules in execution order.
pub fn all_rules() -> &'static [RuleEntry] {
    RULES
}

/// Look up a rule by code (case-insensitive).
pub fn rule_by_code(code: &str) -> Option<&'static RuleEntry> {
    RULES.iter().find(|rule| rule.code.eq_ignore_ascii_case(code))
}

/// Run every rule not skipped by `is_ignored`, in registry order.
///
/// Findings are appended in discovery order, then stably sorted by severity
/// so equal-severity suggestions keep their relative order.
pub fn run_rules<F>(result: &ParseResult, is_ignored: F) -> Vec<Suggestion>
where
    F: Fn(&str) -> bool,
{
    let mut suggestions = Vec::new();

    for rule in RULES {
        if is_ignored(rule.code) {
            trace!("skipping ignored rule {}", rule.code);
            continue;
        }
        let found = (rule.detect)(result);
        trace!("{} ({}): {} finding(s)", rule.code, rule.name, found.len());
        suggestions.extend(found);
    }

    suggestions.sort_by_key(|s| s.severity.rank());
    suggestions
}

/// Join raw instruction text for a "before" snippet.
pub(crate) fn join_raw<'a>(raws: impl IntoIterator<Item = &'a str>) -> String {
    raws.into_iter().collect::<Vec<_>>().join("\n")
}
