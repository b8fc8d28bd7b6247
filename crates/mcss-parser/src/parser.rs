//! Indentation-driven tree builder.
//!
//! Walks the preprocessed text once, statement by statement. Each statement
//! ends at the next unquoted `;`; its property/value separator is found by
//! scanning backward with parenthesis tracking, and the property name is the
//! trailing identifier run before that colon. Whatever precedes the property
//! on its line is either nothing (a declaration) or a selector/at-rule
//! header that updates the ancestry stack.

use crate::ast::{split_step_counter, Chunk};
use crate::ParseError;
use mcss_lexer::{find_delimiter, preprocess, property_start, rfind_colon, Source};

/// MCSS tree builder.
///
/// Consumes the text left to right, maintaining one ancestry stack of
/// selector and at-rule headers. Emits one [`Chunk`] per declaration with a
/// snapshot of the stack; after the walk each snapshot is split into
/// selector ancestry (`tree`) and at-rule ancestry (`at_rules`).
pub struct Parser {
    text: String,
    indent: String,
    pos: usize,
    tree: Vec<String>,
    building_selector: bool,
    chunks: Vec<Chunk>,
}

impl Parser {
    /// Create a builder for already-preprocessed source.
    pub fn new(source: Source) -> Self {
        Self {
            text: source.text,
            indent: source.indent,
            pos: 0,
            tree: Vec::new(),
            building_selector: false,
            chunks: Vec::new(),
        }
    }

    /// Preprocess and parse MCSS source into the flat chunk sequence.
    pub fn parse(source: &str) -> Result<Vec<Chunk>, ParseError> {
        Parser::new(preprocess(source)).build()
    }

    /// Walk the whole text. Text after the last `;` is ignored.
    pub fn build(mut self) -> Result<Vec<Chunk>, ParseError> {
        loop {
            let rest = &self.text[self.pos..];
            let Some(semicolon) = find_delimiter(rest, ';') else {
                break;
            };
            let Some(colon) = rfind_colon(&rest[..semicolon]) else {
                return Err(self.error(semicolon, "statement has no ':' separator".into()));
            };
            let prop_start = property_start(&rest[..colon]);
            let before = &rest[..prop_start];

            if before.trim().is_empty() {
                self.read_declaration(prop_start, colon, semicolon)?;
            } else {
                self.read_header(prop_start)?;
            }
        }

        let mut chunks = self.chunks;
        for chunk in &mut chunks {
            let ancestry = std::mem::take(&mut chunk.tree);
            for leaf in ancestry {
                if leaf.starts_with('@') {
                    chunk.at_rules.push(leaf);
                } else {
                    chunk.tree.push(leaf);
                }
            }
        }
        Ok(chunks)
    }

    /// Emit a declaration chunk and consume through its semicolon.
    fn read_declaration(
        &mut self,
        prop_start: usize,
        colon: usize,
        semicolon: usize,
    ) -> Result<(), ParseError> {
        let rest = &self.text[self.pos..];
        let property = rest[prop_start..colon].trim().to_string();
        if property.is_empty() {
            return Err(self.error(prop_start, "declaration has no property name".into()));
        }
        let value = rest[colon + 1..semicolon].trim().to_string();

        // Depth is readable only when the property starts its line: the text
        // before it must reach back to a newline through pure whitespace.
        // Otherwise (mid-line after a header or a previous statement) the
        // declaration inherits the current ancestry depth.
        let before = &rest[..prop_start];
        if let Some(newline) = before.rfind('\n') {
            let depth = self.count_units(&before[newline + 1..]);
            while self.tree.len() > depth {
                self.tree.pop();
            }
        }

        let depth = self.tree.len();
        self.chunks
            .push(Chunk::new(property, value, depth, self.tree.clone()));
        self.pos += semicolon + 1;
        self.building_selector = false;
        Ok(())
    }

    /// Read a selector or at-rule header and update the ancestry stack.
    fn read_header(&mut self, prop_start: usize) -> Result<(), ParseError> {
        let rest = &self.text[self.pos..];
        if rest.starts_with('\n') {
            self.pos += 1;
            return Ok(());
        }

        let line_depth = self.count_units(rest);
        let header_end = match rest.find('\n') {
            Some(newline) if newline < prop_start => newline,
            _ => prop_start,
        };
        let header = rest[..header_end].trim().to_string();

        if line_depth == self.tree.len() {
            self.tree.push(header);
        } else if line_depth > self.tree.len() {
            return Err(self.error(
                0,
                format!(
                    "inconsistent indentation near '{header}' (depth {line_depth} with only {} open levels)",
                    self.tree.len()
                ),
            ));
        } else if self.building_selector && line_depth == self.tree.len() - 1 {
            // Multi-line selector list: the previous statement opened this
            // slot, so the new line continues it.
            let top = self.tree.last_mut().expect("non-empty ancestry");
            top.push('\n');
            top.push_str(&header);
        } else {
            self.tree.truncate(line_depth + 1);
            let slot = &mut self.tree[line_depth];
            *slot = disambiguate(slot, header);
        }

        self.pos += header_end;
        self.building_selector = true;
        Ok(())
    }

    /// Number of whole indentation units prefixing `text`.
    fn count_units(&self, text: &str) -> usize {
        let mut rest = text;
        let mut depth = 0;
        while rest.starts_with(&self.indent) {
            rest = &rest[self.indent.len()..];
            depth += 1;
        }
        depth
    }

    fn error(&self, relative: usize, message: String) -> ParseError {
        let (line, column) = position(&self.text, self.pos + relative);
        ParseError {
            message,
            line,
            column,
        }
    }
}

/// Suffix a repeated header with a `~N` counter so successive identical
/// headers at the same position (animation intermediate steps) stay
/// distinct. The counter resets whenever a different header lands on the
/// slot, because the comparison is always against the current occupant.
fn disambiguate(existing: &str, header: String) -> String {
    let (base, count) = split_step_counter(existing);
    if base == header {
        format!("{header}~{}", count + 1)
    } else {
        header
    }
}

fn position(text: &str, offset: usize) -> (usize, usize) {
    let mut line = 1;
    let mut column = 1;
    for (index, c) in text.char_indices() {
        if index >= offset {
            break;
        }
        if c == '\n' {
            line += 1;
            column = 1;
        } else {
            column += 1;
        }
    }
    (line, column)
}
