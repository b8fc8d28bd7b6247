//! Context-aware scanning primitives.
//!
//! Every later compilation stage needs to find delimiters (`;`, `:`, `@`,
//! `,`) that are *not* inside a quoted string and, for the backward colon
//! search, not inside parentheses. Instead of each search carrying its own
//! ad-hoc state machine, they all share [`ScanState`]: a tiny cursor state
//! tracking the open quote character, backslash escaping, and parenthesis
//! depth.

/// Scanning state threaded through a forward character walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScanState {
    quote: Option<char>,
    escaped: bool,
    parens: u32,
}

impl ScanState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the state over one character.
    ///
    /// Call *after* inspecting the character: a quote character is still
    /// "plain" at the moment it opens a string.
    pub fn step(&mut self, c: char) {
        if let Some(q) = self.quote {
            if self.escaped {
                self.escaped = false;
            } else {
                if c == '\\' {
                    self.escaped = true;
                }
                if c == q {
                    self.quote = None;
                }
            }
        } else if c == '\'' || c == '"' {
            self.quote = Some(c);
        } else if c == '(' {
            self.parens += 1;
        } else if c == ')' {
            self.parens = self.parens.saturating_sub(1);
        }
    }

    /// True when the cursor is outside any string and not escaped.
    pub fn is_plain(&self) -> bool {
        self.quote.is_none() && !self.escaped
    }

    /// True when the cursor is inside at least one parenthesized group.
    pub fn in_parens(&self) -> bool {
        self.parens > 0
    }
}

/// Find the first unquoted, unescaped occurrence of `delimiter`.
///
/// Returns its byte index. Parentheses do not hide delimiters in the forward
/// direction: only string state matters here.
pub fn find_delimiter(text: &str, delimiter: char) -> Option<usize> {
    let mut state = ScanState::new();
    for (index, c) in text.char_indices() {
        if state.is_plain() && c == delimiter {
            return Some(index);
        }
        state.step(c);
    }
    None
}

/// Find the last unquoted `:` outside parentheses, scanning backward.
///
/// This is the property/value separator search: a `:` inside a functional
/// value such as `if(:hover)` or `(max-width: 40em)` must not be mistaken
/// for the separator, so parenthesis depth is tracked while walking back.
pub fn rfind_colon(text: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut quote: Option<char> = None;
    let mut parens = 0u32;
    for (index, c) in text.char_indices().rev() {
        if let Some(q) = quote {
            if c == q && !is_escaped(bytes, index) {
                quote = None;
            }
        } else {
            match c {
                '\'' | '"' => quote = Some(c),
                ')' => parens += 1,
                '(' => parens = parens.saturating_sub(1),
                ':' if parens == 0 => return Some(index),
                _ => {}
            }
        }
    }
    None
}

/// Start of the trailing identifier run (letters, digits, hyphens,
/// underscores) in `text`, ignoring trailing whitespace.
///
/// Used to recover the property name ending exactly at the resolved colon:
/// `property_start("div\n\tcolor")` points at `color`. When no identifier
/// run exists the returned index equals the end of the whitespace-trimmed
/// text, i.e. the run is empty.
pub fn property_start(text: &str) -> usize {
    let end = text.trim_end().len();
    let mut start = end;
    for (index, c) in text[..end].char_indices().rev() {
        if c.is_alphanumeric() || c == '-' || c == '_' {
            start = index;
        } else {
            break;
        }
    }
    start
}

/// Split on unquoted commas. The separators are dropped, the parts are not
/// trimmed, and a text without commas yields a single part.
pub fn split_commas(text: &str) -> Vec<String> {
    let mut state = ScanState::new();
    let mut parts = Vec::new();
    let mut current = String::new();
    for c in text.chars() {
        if state.is_plain() && c == ',' {
            parts.push(std::mem::take(&mut current));
        } else {
            current.push(c);
        }
        state.step(c);
    }
    parts.push(current);
    parts
}

fn is_escaped(bytes: &[u8], index: usize) -> bool {
    let mut backslashes = 0;
    let mut i = index;
    while i > 0 && bytes[i - 1] == b'\\' {
        backslashes += 1;
        i -= 1;
    }
    backslashes % 2 == 1
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // Forward delimiter search
    // =========================================================================

    #[test]
    fn test_find_semicolon() {
        assert_eq!(find_delimiter("color: red; top: 0;", ';'), Some(10));
    }

    #[test]
    fn test_find_semicolon_skips_strings() {
        assert_eq!(find_delimiter("content: 'a;b'; next", ';'), Some(14));
        assert_eq!(find_delimiter("content: \"a;b\"; next", ';'), Some(14));
    }

    #[test]
    fn test_find_semicolon_escaped_quote() {
        // The escaped quote does not close the string, so the ; inside is hidden
        assert_eq!(find_delimiter(r#"content: 'a\';b'; x"#, ';'), Some(16));
    }

    #[test]
    fn test_find_at_in_value() {
        assert_eq!(find_delimiter("1 @ .2s", '@'), Some(2));
        assert_eq!(find_delimiter("'a@b' @ .2s", '@'), Some(6));
    }

    #[test]
    fn test_find_delimiter_missing() {
        assert_eq!(find_delimiter("no terminator here", ';'), None);
    }

    #[test]
    fn test_find_delimiter_unterminated_string() {
        assert_eq!(find_delimiter("content: 'open; forever", ';'), None);
    }

    // =========================================================================
    // Backward colon search
    // =========================================================================

    #[test]
    fn test_rfind_colon_simple() {
        assert_eq!(rfind_colon("color: red"), Some(5));
    }

    #[test]
    fn test_rfind_colon_skips_parens() {
        // The colon inside the media condition is protected
        let text = "@media (max-width: 40em)\n\tcolor";
        assert_eq!(rfind_colon(text), None);
    }

    #[test]
    fn test_rfind_colon_guard_value() {
        // if(:hover) border-radius: 50% — the separator is after border-radius
        let text = "if(:hover) border-radius: 50%";
        assert_eq!(rfind_colon(text), Some(24));
    }

    #[test]
    fn test_rfind_colon_pseudo_selector_first() {
        // Scanning backward finds the separator colon, not span:focus
        let text = "span:focus outline: thicc";
        assert_eq!(rfind_colon(text), Some(18));
    }

    #[test]
    fn test_rfind_colon_inside_string() {
        assert_eq!(rfind_colon("content: 'a:b'"), Some(7));
    }

    // =========================================================================
    // Property recovery
    // =========================================================================

    #[test]
    fn test_property_start_simple() {
        let text = "div\n\tcolor";
        assert_eq!(&text[property_start(text)..], "color");
    }

    #[test]
    fn test_property_start_hyphenated() {
        let text = "\tborder-radius";
        assert_eq!(&text[property_start(text)..], "border-radius");
    }

    #[test]
    fn test_property_start_trailing_whitespace() {
        let text = "width  ";
        assert_eq!(property_start(text), 0);
    }

    #[test]
    fn test_property_start_empty_run() {
        let text = "div> ";
        assert_eq!(property_start(text), text.trim_end().len());
    }

    // =========================================================================
    // Comma splitting
    // =========================================================================

    #[test]
    fn test_split_commas_plain() {
        assert_eq!(split_commas("a, p"), vec!["a", " p"]);
    }

    #[test]
    fn test_split_commas_quoted_comma_inert() {
        assert_eq!(
            split_commas("a[title='x,y'], p"),
            vec!["a[title='x,y']", " p"]
        );
    }

    #[test]
    fn test_split_commas_no_comma() {
        assert_eq!(split_commas("div"), vec!["div"]);
    }

    #[test]
    fn test_split_commas_trailing() {
        assert_eq!(split_commas("a,"), vec!["a", ""]);
    }
}
