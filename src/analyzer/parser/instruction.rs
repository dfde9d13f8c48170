//! Dockerfile model types.
//!
//! The parser produces a flat, line-ordered list of `Instruction`s and a list
//! of `Stage`s that partition it. Everything here is read-only after parsing.

use serde::Serialize;
use std::borrow::Cow;
use std::fmt;
use std::ops::Range;

/// Directives recognised by the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Directive {
    From,
    Run,
    Cmd,
    Label,
    Maintainer,
    Expose,
    Env,
    Add,
    Copy,
    Entrypoint,
    Volume,
    User,
    Workdir,
    Arg,
    Onbuild,
    Stopsignal,
    Healthcheck,
    Shell,
}

/// Keyword table. Lookup is case-insensitive.
const DIRECTIVES: &[(&str, Directive)] = &[
    ("FROM", Directive::From),
    ("RUN", Directive::Run),
    ("CMD", Directive::Cmd),
    ("LABEL", Directive::Label),
    ("MAINTAINER", Directive::Maintainer),
    ("EXPOSE", Directive::Expose),
    ("ENV", Directive::Env),
    ("ADD", Directive::Add),
    ("COPY", Directive::Copy),
    ("ENTRYPOINT", Directive::Entrypoint),
    ("VOLUME", Directive::Volume),
    ("USER", Directive::User),
    ("WORKDIR", Directive::Workdir),
    ("ARG", Directive::Arg),
    ("ONBUILD", Directive::Onbuild),
    ("STOPSIGNAL", Directive::Stopsignal),
    ("HEALTHCHECK", Directive::Healthcheck),
    ("SHELL", Directive::Shell),
];

impl Directive {
    /// Look up a directive keyword (case-insensitive).
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        DIRECTIVES
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(keyword))
            .map(|(_, directive)| *directive)
    }

    /// The normalized upper-case keyword.
    pub fn as_str(&self) -> &'static str {
        DIRECTIVES
            .iter()
            .find(|(_, directive)| directive == self)
            .map(|(name, _)| *name)
            .unwrap_or("UNKNOWN")
    }
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single logical instruction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Instruction {
    /// The directive keyword.
    pub directive: Directive,
    /// Original source text (all physical lines, newline-joined).
    pub raw: String,
    /// Line number of the first physical line (1-indexed).
    pub line: u32,
    /// Argument text after the keyword, continuations joined, otherwise verbatim.
    pub args_text: String,
    /// Tokenized arguments. Exec-form (JSON array) arguments are decoded.
    pub arguments: Vec<String>,
    /// Whether the instruction spanned several physical lines.
    pub continued: bool,
}

impl Instruction {
    pub fn is(&self, directive: Directive) -> bool {
        self.directive == directive
    }

    /// COPY or ADD.
    pub fn is_copy_like(&self) -> bool {
        matches!(self.directive, Directive::Copy | Directive::Add)
    }

    /// Command text for shell-command matching.
    ///
    /// Exec form (`RUN ["npm", "ci"]`) yields the decoded arguments joined by
    /// spaces; shell form yields the argument text unchanged.
    pub fn command(&self) -> Cow<'_, str> {
        if self.args_text.trim_start().starts_with('[') {
            Cow::Owned(self.arguments.join(" "))
        } else {
            Cow::Borrowed(&self.args_text)
        }
    }

    /// Flag arguments (`--from=builder`, `--mount=type=cache,...`).
    pub fn flags(&self) -> impl Iterator<Item = &str> {
        self.arguments
            .iter()
            .map(String::as_str)
            .take_while(|arg| arg.starts_with("--"))
    }

    /// Check whether a flag with the given name is present (`--from`, `--mount`).
    pub fn has_flag(&self, name: &str) -> bool {
        self.flags()
            .any(|flag| flag == name || flag.starts_with(&format!("{}=", name)))
    }

    /// Arguments after the leading flags.
    pub fn positional(&self) -> &[String] {
        let flag_count = self.flags().count();
        &self.arguments[flag_count..]
    }

    /// Source paths of a COPY/ADD (every positional argument but the last).
    pub fn copy_sources(&self) -> &[String] {
        let positional = self.positional();
        match positional.len() {
            0 | 1 => &[],
            n => &positional[..n - 1],
        }
    }

    /// Check whether this COPY/ADD copies the whole build context.
    pub fn copies_whole_context(&self) -> bool {
        self.is_copy_like()
            && !self.has_flag("--from")
            && self
                .copy_sources()
                .iter()
                .any(|src| src == "." || src == "./")
    }
}

/// A build stage: a FROM instruction and everything up to the next FROM.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Stage {
    /// Position in the file (0-based).
    pub index: usize,
    /// Alias if given, otherwise `stage_<index>`.
    pub name: String,
    /// Base image reference as written (tag included). Empty when missing.
    pub base_image: String,
    /// `AS <alias>` name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    /// Line of the FROM that opened the stage.
    pub start_line: u32,
    /// Indices into `ParseResult::instructions`.
    #[serde(skip)]
    pub range: Range<usize>,
}

impl Stage {
    /// Number of instructions in the stage.
    pub fn len(&self) -> usize {
        self.range.len()
    }

    pub fn is_empty(&self) -> bool {
        self.range.is_empty()
    }
}

/// Output of the parser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseResult {
    /// All instructions in source order.
    pub instructions: Vec<Instruction>,
    /// Stages in source order. Never empty.
    pub stages: Vec<Stage>,
    /// More than one stage.
    pub multi_stage: bool,
    /// Unique base image names, tag and digest stripped, in first-seen order.
    pub base_images: Vec<String>,
}

impl ParseResult {
    /// Instructions belonging to a stage.
    pub fn stage_instructions(&self, stage: &Stage) -> &[Instruction] {
        self.instructions.get(stage.range.clone()).unwrap_or(&[])
    }

    /// Iterate stages together with their instructions.
    pub fn stages_with_instructions(&self) -> impl Iterator<Item = (&Stage, &[Instruction])> {
        self.stages
            .iter()
            .map(move |stage| (stage, self.stage_instructions(stage)))
    }

    /// The stage containing the instruction on `line`.
    pub fn stage_for_line(&self, line: u32) -> Option<&Stage> {
        let idx = self.instructions.iter().position(|i| i.line == line)?;
        self.stages.iter().find(|stage| stage.range.contains(&idx))
    }

    /// The last stage, which produces the final image.
    pub fn final_stage(&self) -> Option<&Stage> {
        self.stages.last()
    }

    /// Instructions of the given directive, in order.
    pub fn instructions_of(&self, directive: Directive) -> impl Iterator<Item = &Instruction> {
        self.instructions.iter().filter(move |i| i.is(directive))
    }
}

/// Strip tag and digest from an image reference.
///
/// A colon only starts a tag when it comes after the last `/`, so registry
/// ports (`localhost:5000/app`) survive.
pub fn strip_image_tag(image: &str) -> &str {
    let without_digest = image.split('@').next().unwrap_or(image);
    match without_digest.rfind(':') {
        Some(pos) if !without_digest[pos..].contains('/') => &without_digest[..pos],
        _ => without_digest,
    }
}
