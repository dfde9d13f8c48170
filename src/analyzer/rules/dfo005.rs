//! DFO005: Prefer COPY over ADD
//!
//! ADD only adds value for remote URLs and local archives it auto-extracts.
//! For plain files COPY is explicit and has no surprising behaviour.

use super::codes;
use crate::analyzer::parser::{Directive, Instruction, ParseResult};
use crate::analyzer::types::{Severity, Suggestion};

const ARCHIVE_EXTENSIONS: &[&str] = &[
    ".tar", ".tar.gz", ".tgz", ".tar.bz2", ".tbz2", ".tar.xz", ".txz", ".zip", ".gz", ".bz2",
    ".xz", ".Z", ".lz", ".lzma",
];

fn sources(instr: &Instruction) -> &[String] {
    match instr.copy_sources() {
        [] => instr.positional(),
        sources => sources,
    }
}

fn has_url(instr: &Instruction) -> bool {
    sources(instr).iter().any(|s| {
        s.starts_with("http://") || s.starts_with("https://") || s.starts_with("git@")
    })
}

fn has_archive(instr: &Instruction) -> bool {
    sources(instr)
        .iter()
        .any(|s| ARCHIVE_EXTENSIONS.iter().any(|ext| s.ends_with(ext)))
}

pub fn detect(result: &ParseResult) -> Vec<Suggestion> {
    result
        .instructions_of(Directive::Add)
        .filter(|instr| !has_url(instr) && !has_archive(instr))
        .map(|instr| {
            Suggestion::new(
                codes::PREFER_COPY,
                Severity::Low,
                "ADD used for plain files",
                "Use COPY for local files; keep ADD for remote URLs and archives that should be extracted.",
                vec![instr.line],
            )
            .with_snippets(instr.raw.clone(), format!("COPY {}", instr.args_text))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::parser::parse_dockerfile;

    fn analyze_dockerfile(content: &str) -> Vec<Suggestion> {
        detect(&parse_dockerfile(content))
    }

    #[test]
    fn test_add_local_dir() {
        let found = analyze_dockerfile("FROM alpine\nADD ./app /app\n");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].severity, Severity::Low);
        assert_eq!(found[0].lines, vec![2]);
        assert_eq!(found[0].after.as_deref(), Some("COPY ./app /app"));
    }

    #[test]
    fn test_add_url_archive() {
        assert!(analyze_dockerfile("FROM alpine\nADD https://example.com/x.tar.gz /app\n").is_empty());
    }

    #[test]
    fn test_add_url() {
        assert!(analyze_dockerfile("FROM alpine\nADD https://example.com/file.txt /app/\n").is_empty());
    }

    #[test]
    fn test_add_local_archive() {
        assert!(analyze_dockerfile("FROM alpine\nADD rootfs.tar.xz /\n").is_empty());
    }

    #[test]
    fn test_copy_ignored() {
        assert!(analyze_dockerfile("FROM alpine\nCOPY ./app /app\n").is_empty());
    }
}
