//! Dockerfile parser module.
//!
//! Provides:
//! - `instruction` - Instruction, Stage and ParseResult model types
//! - `dockerfile` - line scanner and nom-based directive parser

pub mod dockerfile;
pub mod instruction;

pub use dockerfile::parse_dockerfile;
pub use instruction::*;
