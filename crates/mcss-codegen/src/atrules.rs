//! Inline at-rule extraction.
//!
//! A declaration value may end in `@`-suffixes: `opacity: 0 @ .2s @<40em;`.
//! The text before the first unquoted `@` is the real value; the rest splits
//! on `@` into fragments classified by their first character:
//!
//! - `<` → `@media (max-width: ...)` ancestor
//! - `>` → `@media (min-width: ...)` ancestor
//! - digit, space, or `.` → transition timing; synthesizes an
//!   `add-transition` chunk right after the declaration
//! - anything else → verbatim at-rule ancestor (`@supports ...`)

use mcss_lexer::find_delimiter;
use mcss_parser::Chunk;

/// Split inline `@`-suffixes off every chunk's value.
pub fn extract(chunks: Vec<Chunk>) -> Vec<Chunk> {
    let mut result = Vec::with_capacity(chunks.len());
    for mut chunk in chunks {
        let Some(at) = find_delimiter(&chunk.value, '@') else {
            result.push(chunk);
            continue;
        };
        let suffix = chunk.value[at + 1..].to_string();
        chunk.value = chunk.value[..at].trim().to_string();

        let mut timing = None;
        for fragment in suffix.split('@') {
            match fragment.chars().next() {
                Some('<') => chunk
                    .at_rules
                    .push(format!("@media (max-width: {})", fragment[1..].trim())),
                Some('>') => chunk
                    .at_rules
                    .push(format!("@media (min-width: {})", fragment[1..].trim())),
                Some(c) if c.is_ascii_digit() || c == ' ' || c == '.' => {
                    timing = Some(fragment.trim().to_string());
                }
                _ => chunk.at_rules.push(format!("@{fragment}")),
            }
        }

        // The synthetic chunk inherits the ancestry as extended above, so a
        // transition declared next to a media suffix stays inside the query.
        let synthetic = timing
            .map(|timing| chunk.derive("add-transition", format!("{} {timing}", chunk.property)));
        result.push(chunk);
        result.extend(synthetic);
    }
    result
}
