//! Dockerfile parser.
//!
//! Physical lines are first folded into logical lines (continuations
//! resolved, comments and blanks dropped), then each logical line is split
//! into a directive and its arguments with nom. Parsing never fails:
//! unknown directives are dropped and a missing FROM yields one empty stage.

use log::{debug, trace};
use nom::{
    IResult,
    bytes::complete::{tag, tag_no_case, take_till, take_till1},
    character::complete::{space0, space1},
    combinator::{opt, recognize},
    multi::many0,
    sequence::{pair, preceded, terminated},
};

use super::instruction::{Directive, Instruction, ParseResult, Stage, strip_image_tag};

const CONTINUATION: char = '\\';

/// A logical line: one or more physical lines joined by continuations.
#[derive(Debug, Clone, PartialEq, Eq)]
struct LogicalLine {
    /// Line number of the first physical line.
    line: u32,
    /// Joined text with continuation markers removed.
    text: String,
    /// Physical source lines.
    raw: String,
    continued: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Normal,
    InContinuation,
}

/// Folds physical lines into logical lines.
struct LineScanner<'a> {
    lines: std::iter::Enumerate<std::str::Lines<'a>>,
}

impl<'a> LineScanner<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            lines: input.lines().enumerate(),
        }
    }
}

fn is_skippable(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.is_empty() || trimmed.starts_with('#')
}

/// Strip a trailing continuation marker, reporting whether one was present.
fn split_continuation(line: &str) -> (&str, bool) {
    let trimmed = line.trim_end();
    match trimmed.strip_suffix(CONTINUATION) {
        Some(body) => (body, true),
        None => (trimmed, false),
    }
}

impl Iterator for LineScanner<'_> {
    type Item = LogicalLine;

    fn next(&mut self) -> Option<LogicalLine> {
        let mut state = ScanState::Normal;
        let mut pending: Option<LogicalLine> = None;

        for (idx, physical) in self.lines.by_ref() {
            if is_skippable(physical) {
                continue;
            }

            let (body, continues) = split_continuation(physical);
            let body = body.trim();

            match state {
                ScanState::Normal => {
                    pending = Some(LogicalLine {
                        line: idx as u32 + 1,
                        text: body.to_string(),
                        raw: physical.trim_end().to_string(),
                        continued: false,
                    });
                }
                ScanState::InContinuation => {
                    if let Some(logical) = pending.as_mut() {
                        if !body.is_empty() {
                            if !logical.text.is_empty() {
                                logical.text.push(' ');
                            }
                            logical.text.push_str(body);
                        }
                        logical.raw.push('\n');
                        logical.raw.push_str(physical.trim_end());
                        logical.continued = true;
                    }
                }
            }

            if continues {
                state = ScanState::InContinuation;
            } else {
                return pending;
            }
        }

        // Input exhausted; a dangling continuation is flushed as-is.
        pending
    }
}

/// Split a logical line into keyword and argument text.
fn keyword(input: &str) -> IResult<&str, &str> {
    terminated(take_till1(|c: char| c.is_whitespace()), space0)(input)
}

/// Parsed pieces of a FROM argument list.
#[derive(Debug, Default, PartialEq, Eq)]
struct FromClause<'a> {
    image: &'a str,
    alias: Option<&'a str>,
}

fn flag(input: &str) -> IResult<&str, &str> {
    recognize(pair(tag("--"), take_till(|c: char| c.is_whitespace())))(input)
}

/// `[--flag ...] <image> [AS <alias>]`
fn from_clause(input: &str) -> IResult<&str, FromClause<'_>> {
    let (input, _) = many0(terminated(flag, space0))(input)?;
    let (input, image) = take_till(|c: char| c.is_whitespace())(input)?;
    let (input, _) = space0(input)?;
    let (input, alias) = opt(preceded(
        pair(tag_no_case("AS"), space1),
        take_till1(|c: char| c.is_whitespace()),
    ))(input)?;
    Ok((input, FromClause { image, alias }))
}

/// Split arguments into tokens. Exec form (`["a", "b"]`) is decoded as JSON.
fn tokenize(args: &str) -> Vec<String> {
    let trimmed = args.trim();
    if trimmed.starts_with('[') {
        if let Ok(list) = serde_json::from_str::<Vec<String>>(trimmed) {
            return list;
        }
    }
    trimmed.split_whitespace().map(str::to_string).collect()
}

fn to_instruction(logical: LogicalLine) -> Option<Instruction> {
    let (rest, word) = keyword(&logical.text).ok()?;
    let Some(directive) = Directive::from_keyword(word) else {
        debug!("line {}: dropping unknown directive `{}`", logical.line, word);
        return None;
    };

    Some(Instruction {
        directive,
        arguments: tokenize(rest),
        args_text: rest.to_string(),
        raw: logical.raw,
        line: logical.line,
        continued: logical.continued,
    })
}

fn open_stage(index: usize, instr: &Instruction, start: usize) -> Stage {
    let clause = from_clause(&instr.args_text)
        .map(|(_, clause)| clause)
        .unwrap_or_default();
    let alias = clause.alias.map(str::to_string);

    Stage {
        index,
        name: alias
            .clone()
            .unwrap_or_else(|| format!("stage_{}", index)),
        base_image: clause.image.to_string(),
        alias,
        start_line: instr.line,
        range: start..start,
    }
}

/// Parse Dockerfile text into instructions and stages.
///
/// Instructions before the first FROM (typically `ARG`) belong to the first
/// stage.
pub fn parse_dockerfile(input: &str) -> ParseResult {
    let instructions: Vec<Instruction> = LineScanner::new(input)
        .filter_map(to_instruction)
        .collect();

    let mut stages: Vec<Stage> = Vec::new();
    for (idx, instr) in instructions.iter().enumerate() {
        if !instr.is(Directive::From) {
            continue;
        }
        if let Some(previous) = stages.last_mut() {
            previous.range.end = idx;
        }
        let stage = open_stage(stages.len(), instr, idx);
        trace!("line {}: stage `{}` from `{}`", instr.line, stage.name, stage.base_image);
        stages.push(stage);
    }

    match (stages.first_mut(), instructions.is_empty()) {
        (Some(first), _) => first.range.start = 0,
        (None, empty) => stages.push(Stage {
            index: 0,
            name: "stage_0".to_string(),
            base_image: String::new(),
            alias: None,
            start_line: if empty { 1 } else { instructions[0].line },
            range: 0..0,
        }),
    }
    if let Some(last) = stages.last_mut() {
        last.range.end = instructions.len();
    }

    let mut base_images: Vec<String> = Vec::new();
    for stage in &stages {
        let name = strip_image_tag(&stage.base_image);
        if !name.is_empty() && !base_images.iter().any(|b| b == name) {
            base_images.push(name.to_string());
        }
    }

    debug!(
        "parsed {} instructions in {} stage(s)",
        instructions.len(),
        stages.len()
    );

    ParseResult {
        multi_stage: stages.len() > 1,
        instructions,
        stages,
        base_images,
    }
}
