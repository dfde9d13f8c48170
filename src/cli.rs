use crate::analyzer::Severity;
use crate::analyzer::build_history::DEFAULT_LARGE_LAYER_BYTES;
use crate::analyzer::formatter::OutputFormat;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "dockerfile-optimizer")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Suggest layer-caching and image-size improvements for Dockerfiles")]
#[command(
    long_about = "Parses Dockerfiles into instructions and build stages, checks them against a set of \
caching and image-size rules, and reports prioritized suggestions with before/after snippets."
)]
pub struct Cli {
    /// Dockerfiles to analyze
    #[arg(value_name = "FILES", default_value = "Dockerfile")]
    pub files: Vec<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum)]
    pub format: Option<FormatArg>,

    /// Only show suggestions at or above this severity
    #[arg(long, value_enum, value_name = "SEVERITY")]
    pub min_severity: Option<SeverityArg>,

    /// Rule codes to skip (e.g. DFO007)
    #[arg(long, value_name = "CODE", value_delimiter = ',')]
    pub ignore: Vec<String>,

    /// Print a heuristic estimate of the final image size
    #[arg(long)]
    pub estimate_size: bool,

    /// Analyze a `docker history` report (id|size|createdBy per line)
    #[arg(long, value_name = "FILE")]
    pub history: Option<PathBuf>,

    /// Layer size in MB from which history layers are reported
    #[arg(long, value_name = "MB", default_value_t = DEFAULT_LARGE_LAYER_BYTES / 1_000_000)]
    pub large_layer_mb: u64,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Path to configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Disable logging
    #[arg(short, long)]
    pub quiet: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    /// Human-readable colored output
    Tty,
    /// JSON output for CI pipelines
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Tty => OutputFormat::Tty,
            FormatArg::Json => OutputFormat::Json,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SeverityArg {
    High,
    Medium,
    Low,
}

impl From<SeverityArg> for Severity {
    fn from(arg: SeverityArg) -> Self {
        match arg {
            SeverityArg::High => Severity::High,
            SeverityArg::Medium => Severity::Medium,
            SeverityArg::Low => Severity::Low,
        }
    }
}

impl Cli {
    /// Initialize logging based on verbosity level
    pub fn init_logging(&self) {
        if self.quiet {
            return;
        }

        let level = match self.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        };

        env_logger::Builder::from_default_env()
            .filter_level(level)
            .init();
    }

    pub fn large_layer_bytes(&self) -> u64 {
        self.large_layer_mb.saturating_mul(1_000_000)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["dockerfile-optimizer"]);
        assert_eq!(cli.files, vec![PathBuf::from("Dockerfile")]);
        assert!(cli.format.is_none());
        assert_eq!(cli.large_layer_bytes(), DEFAULT_LARGE_LAYER_BYTES);
    }

    #[test]
    fn test_ignore_accepts_repeats_and_commas() {
        let cli = Cli::parse_from([
            "dockerfile-optimizer",
            "--ignore",
            "DFO001,DFO002",
            "--ignore",
            "DFO007",
            "a.Dockerfile",
            "b.Dockerfile",
        ]);
        assert_eq!(cli.ignore, vec!["DFO001", "DFO002", "DFO007"]);
        assert_eq!(cli.files.len(), 2);
    }

    #[test]
    fn test_value_enums() {
        let cli = Cli::parse_from([
            "dockerfile-optimizer",
            "--format",
            "json",
            "--min-severity",
            "medium",
        ]);
        assert_eq!(cli.format.map(OutputFormat::from), Some(OutputFormat::Json));
        assert_eq!(cli.min_severity.map(Severity::from), Some(Severity::Medium));
    }
}
