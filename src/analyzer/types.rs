//! Core types for the Dockerfile optimizer.
//!
//! - `Severity` - Suggestion importance (high, medium, low)
//! - `RuleCode` - Rule identifiers (e.g., "DFO001")
//! - `Suggestion` - A single finding produced by a rule

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Severity levels for suggestions.
///
/// Ordered from most to least important: `High > Medium > Low`.
/// The numeric rank used for sorting is the reverse (high = 0).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Breaks layer caching or bloats the image significantly
    High,
    /// Noticeable size or rebuild-time cost
    Medium,
    /// Minor improvement
    #[default]
    Low,
}

impl Severity {
    /// Get the string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }

    /// Sort rank: high = 0, medium = 1, low = 2.
    pub fn rank(&self) -> u8 {
        match self {
            Self::High => 0,
            Self::Medium => 1,
            Self::Low => 2,
        }
    }

    /// All severities, most important first.
    pub fn all() -> [Severity; 3] {
        [Self::High, Self::Medium, Self::Low]
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Ord for Severity {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse so High > Medium > Low
        other.rank().cmp(&self.rank())
    }
}

impl PartialOrd for Severity {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A rule code identifier (e.g., "DFO003").
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleCode(pub String);

impl RuleCode {
    /// Create a new rule code.
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Get the code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RuleCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for RuleCode {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for RuleCode {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// A single optimization suggestion.
///
/// Every rule produces this one shape; rule-specific detail lives in the
/// text fields and the optional before/after snippets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    /// The rule that produced this suggestion.
    pub code: RuleCode,
    /// Importance of the suggestion.
    pub severity: Severity,
    /// Short description of the problem.
    pub title: String,
    /// What to do about it.
    pub recommendation: String,
    /// Affected source lines (1-indexed), in discovery order.
    pub lines: Vec<u32>,
    /// Offending snippet, when the rule can show one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub before: Option<String>,
    /// Suggested replacement snippet.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<String>,
}

impl Suggestion {
    /// Create a new suggestion without snippets.
    pub fn new(
        code: impl Into<RuleCode>,
        severity: Severity,
        title: impl Into<String>,
        recommendation: impl Into<String>,
        lines: Vec<u32>,
    ) -> Self {
        Self {
            code: code.into(),
            severity,
            title: title.into(),
            recommendation: recommendation.into(),
            lines,
            before: None,
            after: None,
        }
    }

    /// Attach before/after snippets.
    pub fn with_snippets(mut self, before: impl Into<String>, after: impl Into<String>) -> Self {
        self.before = Some(before.into());
        self.after = Some(after.into());
        self
    }

    /// First cited line, used for grouping.
    pub fn first_line(&self) -> Option<u32> {
        self.lines.first().copied()
    }
}
