//! Conditional-guard validation.
//!
//! A selector fragment shaped `if(<expr>)` restricts a declaration to a
//! CSS-expressible condition. The expression is valid only if it reduces to
//! nothing after deleting every construct the guard mini-syntax allows:
//! balanced parenthesized groups, quoted attribute-equality tests,
//! bracketed attribute tests, and `#`/`.`/`:`-prefixed tokens. Whatever
//! remains is something CSS cannot express as a selector, so the whole
//! chunk is dropped (local recovery, not a fatal error).

use mcss_parser::Chunk;
use once_cell::sync::Lazy;
use regex::Regex;

static PAREN_GROUP: Lazy<Regex> = Lazy::new(|| Regex::new(r"\([^()]*\)").expect("valid pattern"));
static QUOTED_EQ: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"=(?:"[^"]*"|'[^']*')"#).expect("valid pattern"));
static ATTR_TEST: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[[\w-]+(?:=[\w-]+)?\]").expect("valid pattern"));
static PREFIX_TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[#.:][\w-]+").expect("valid pattern"));

/// Drop every chunk whose ancestry contains an invalid guard.
pub fn filter_valid(chunks: Vec<Chunk>) -> Vec<Chunk> {
    chunks
        .into_iter()
        .filter(|chunk| {
            chunk
                .tree
                .iter()
                .all(|leaf| !leaf.starts_with("if(") || is_valid(leaf))
        })
        .collect()
}

/// Check one `if(...)` fragment against the guard mini-syntax.
pub fn is_valid(leaf: &str) -> bool {
    let Some(inner) = leaf.strip_prefix("if(").and_then(|s| s.strip_suffix(')')) else {
        return false;
    };
    let mut statement = inner.trim().to_string();
    if statement.is_empty() {
        return false;
    }
    // Innermost-out: each round deletes groups that contain no nested parens
    loop {
        let reduced = PAREN_GROUP.replace_all(&statement, "").into_owned();
        if reduced == statement {
            break;
        }
        statement = reduced;
    }
    let statement = QUOTED_EQ.replace_all(&statement, "");
    let statement = ATTR_TEST.replace_all(&statement, "");
    let statement = PREFIX_TOKEN.replace_all(&statement, "");
    statement.is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // Guard validity
    // =========================================================================

    #[test]
    fn test_class_guard_valid() {
        assert!(is_valid("if(.active)"));
    }

    #[test]
    fn test_pseudo_class_guard_valid() {
        assert!(is_valid("if(:hover)"));
    }

    #[test]
    fn test_id_guard_valid() {
        assert!(is_valid("if(#main)"));
    }

    #[test]
    fn test_chained_tokens_valid() {
        assert!(is_valid("if(.active:hover)"));
    }

    #[test]
    fn test_functional_pseudo_class_valid() {
        assert!(is_valid("if(:nth-child(2n))"));
    }

    #[test]
    fn test_attribute_existence_valid() {
        assert!(is_valid("if([disabled])"));
    }

    #[test]
    fn test_attribute_equality_valid() {
        assert!(is_valid("if([data-state=open])"));
    }

    #[test]
    fn test_quoted_attribute_equality_valid() {
        assert!(is_valid("if([title=\"a b\"])"));
    }

    #[test]
    fn test_empty_guard_invalid() {
        assert!(!is_valid("if()"));
        assert!(!is_valid("if(  )"));
    }

    #[test]
    fn test_bare_words_invalid() {
        assert!(!is_valid("if(main > this)"));
    }

    #[test]
    fn test_space_separated_tokens_invalid() {
        // Descendant combinators cannot splice onto the parent selector
        assert!(!is_valid("if(.a .b)"));
    }

    // =========================================================================
    // Chunk filtering
    // =========================================================================

    #[test]
    fn test_invalid_guard_drops_chunk() {
        let chunks = vec![
            Chunk::new("color", "red", 2, vec!["div".into(), "if()".into()]),
            Chunk::new("top", "0", 1, vec!["div".into()]),
        ];
        let out = filter_valid(chunks);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].property, "top");
    }

    #[test]
    fn test_invalid_guard_anywhere_in_ancestry_drops_chunk() {
        let chunks = vec![Chunk::new(
            "color",
            "red",
            3,
            vec!["div".into(), "if(nope)".into(), "span".into()],
        )];
        assert!(filter_valid(chunks).is_empty());
    }

    #[test]
    fn test_valid_guard_kept() {
        let chunks = vec![Chunk::new(
            "color",
            "red",
            2,
            vec!["div".into(), "if(:hover)".into()],
        )];
        assert_eq!(filter_valid(chunks).len(), 1);
    }
}
