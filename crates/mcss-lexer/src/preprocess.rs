//! Source preprocessing.
//!
//! Runs before the tree builder sees the text: normalizes line endings,
//! strips `//` and `/*...*/` comments (markers inside quoted strings are
//! inert), infers the indentation unit, and removes a uniform outer indent
//! so a source wrapped in one extra level compiles identically.
//!
//! Also home of the advisory lints: raw braces and `!important` are legal
//! but almost always mistakes carried over from plain CSS, so the CLI warns
//! about them without failing the compilation.

use crate::cursor::ScanState;
use std::fmt;

/// Preprocessed source text plus the inferred indentation unit.
///
/// The unit is threaded explicitly into the tree builder; every depth
/// computation in the pipeline uses this one value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    pub text: String,
    pub indent: String,
}

/// Preprocess raw MCSS source.
pub fn preprocess(input: &str) -> Source {
    let text = normalize_newlines(input);
    let text = strip_comments(&text);
    let indent = infer_indent(&text);
    let text = unindent(text, &indent);
    Source { text, indent }
}

fn normalize_newlines(input: &str) -> String {
    input.replace("\r\n", "\n").replace('\r', "\n")
}

/// Remove `//` line comments and `/*...*/` block comments.
///
/// The scan is quote- and escape-aware so `url('//cdn.example')` survives.
/// A line comment ends at (and keeps) its newline; a block comment is
/// removed entirely, including an unterminated one running to EOF.
fn strip_comments(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut in_comment = false;
    let mut block_comment = false;
    let mut prev = '\0';

    for c in text.chars() {
        if quote.is_some() {
            if escaped {
                escaped = false;
            } else {
                if c == '\\' {
                    escaped = true;
                }
                if quote == Some(c) {
                    quote = None;
                }
            }
        } else if in_comment {
            if block_comment {
                if prev == '*' && c == '/' {
                    in_comment = false;
                    // The closing '/' must not pair with a following '/' or
                    // '*' as a new opener
                    prev = '\0';
                } else {
                    prev = c;
                }
                continue;
            }
            prev = c;
            if c == '\n' {
                in_comment = false;
            } else {
                continue;
            }
        } else if prev == '/' && (c == '/' || c == '*') {
            // The opening '/' is already in the output; take it back
            in_comment = true;
            block_comment = c == '*';
            result.pop();
            prev = c;
            continue;
        } else if c == '\'' || c == '"' {
            quote = Some(c);
        }
        result.push(c);
        prev = c;
    }
    result
}

/// Infer the indentation unit as the GCD-length prefix of all leading
/// whitespace runs. A file with no indented lines is valid (no nesting);
/// it falls back to a single tab.
fn infer_indent(text: &str) -> String {
    let runs: Vec<&str> = text
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| {
            let trimmed = line.trim_start();
            let run = &line[..line.len() - trimmed.len()];
            (!run.is_empty()).then_some(run)
        })
        .collect();

    if runs.is_empty() {
        return "\t".to_string();
    }
    let unit_len = runs
        .iter()
        .map(|run| run.chars().count())
        .fold(0, gcd);
    runs[0].chars().take(unit_len).collect()
}

fn gcd(a: usize, b: usize) -> usize {
    if b == 0 {
        a
    } else {
        gcd(b, a % b)
    }
}

/// While every non-blank line starts with one indentation unit, strip one
/// unit from every non-blank line. Lets a whole source be wrapped in an
/// outer indent without semantic effect.
fn unindent(text: String, indent: &str) -> String {
    if indent.is_empty() {
        return text;
    }
    let mut text = text;
    loop {
        let mut non_blank = 0;
        let all_indented = text
            .lines()
            .filter(|line| !line.trim().is_empty())
            .inspect(|_| non_blank += 1)
            .all(|line| line.starts_with(indent));
        if non_blank == 0 || !all_indented {
            return text;
        }
        let trailing_newline = text.ends_with('\n');
        let mut stripped: String = text
            .lines()
            .map(|line| line.strip_prefix(indent).unwrap_or(line))
            .collect::<Vec<_>>()
            .join("\n");
        if trailing_newline {
            stripped.push('\n');
        }
        text = stripped;
    }
}

// =========================================================================
// Lints
// =========================================================================

/// An advisory finding in the source. Never fatal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lint {
    /// A `{` or `}` outside any string. MCSS nesting is indentation-based;
    /// braces pass through to the output verbatim and are almost always a
    /// leftover from plain CSS.
    RawBrace { line: usize, brace: char },
    /// `!important` outside any string.
    Important { line: usize },
}

impl fmt::Display for Lint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Lint::RawBrace { line, brace } => write!(
                f,
                "line {line}: raw '{brace}' in source; MCSS nesting is indentation-based"
            ),
            Lint::Important { line } => {
                write!(f, "line {line}: '!important' found; prefer restructuring selectors")
            }
        }
    }
}

/// Scan the raw source for advisory issues. Quote-aware: braces and
/// `!important` inside strings are inert.
pub fn lint(source: &str) -> Vec<Lint> {
    let mut lints = Vec::new();
    let mut state = ScanState::new();
    let mut line = 1;
    for (index, c) in source.char_indices() {
        if c == '\n' {
            line += 1;
        }
        if state.is_plain() {
            match c {
                '{' | '}' => lints.push(Lint::RawBrace { line, brace: c }),
                '!' if source[index..].starts_with("!important") => {
                    lints.push(Lint::Important { line })
                }
                _ => {}
            }
        }
        state.step(c);
    }
    lints
}
