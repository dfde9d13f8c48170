//! # dockerfile-optimizer
//!
//! Static analysis of Dockerfiles for layer caching and image size.
//!
//! ## Features
//!
//! - **Parsing**: instructions with line numbers, continuation joining and build stages
//! - **Rules**: caching and size checks with severities and before/after snippets
//! - **Reports**: severity-ordered suggestions, summary counts and stage grouping
//! - **Extras**: heuristic size estimates and `docker history` layer analysis
//!
//! ## Example
//!
//! ```rust
//! use dockerfile_optimizer::{analyze, AnalysisOptions};
//!
//! let report = analyze("FROM node:18\nCOPY . .\nRUN npm install\n", &AnalysisOptions::default());
//! for suggestion in report.suggestions() {
//!     println!("[{}] {}", suggestion.severity, suggestion.title);
//! }
//! ```

pub mod analyzer;
pub mod cli;
pub mod config;
pub mod error;

// Re-export commonly used types and functions
pub use analyzer::{
    AnalysisOptions, ParseResult, Report, Severity, Suggestion, analyze, analyze_file,
    parse_dockerfile,
};
pub use error::{OptimizerError, Result};

/// The current version of the CLI tool
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
