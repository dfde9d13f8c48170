use crate::analyzer::Severity;
use crate::analyzer::formatter::OutputFormat;
use serde::{Deserialize, Serialize};

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Lowest severity to display
    pub min_severity: Severity,
    /// Rule codes that are not run
    pub ignore_rules: Vec<String>,
    /// Output format
    pub format: OutputFormat,
    /// Colored terminal output
    pub color: bool,
    /// Also print a heuristic image size estimate
    pub estimate_size: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            min_severity: Severity::Low,
            ignore_rules: Vec::new(),
            format: OutputFormat::Tty,
            color: true,
            estimate_size: false,
        }
    }
}
