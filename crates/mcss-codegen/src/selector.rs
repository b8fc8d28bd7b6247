//! Selector resolution.
//!
//! Each chunk's ancestry tree collapses into one CSS selector string.
//! Fragments may hold comma-separated alternatives, so resolution is a
//! cross-product walk: every existing prefix combines with every
//! alternative of the next fragment. Combination rules per alternative
//! prefix:
//!
//! - `&` → splice onto the parent with the `&` removed
//! - `::` → splice a pseudo-element onto the parent
//! - `if(...)` → splice the guard body onto the parent
//! - anything else → descendant (space-joined)

use mcss_lexer::split_commas;
use mcss_parser::{split_step_counter, Chunk};

/// Above this many characters a selector list wraps one alternative per line.
const WRAP_THRESHOLD: usize = 80;

/// Fill in `chunk.selector` for every chunk.
pub fn resolve(mut chunks: Vec<Chunk>) -> Vec<Chunk> {
    for chunk in &mut chunks {
        chunk.selector = Some(resolve_tree(&chunk.tree));
    }
    chunks
}

/// Collapse an ancestry slice into selector text.
pub fn resolve_tree(tree: &[String]) -> String {
    let mut list = vec![String::new()];
    for fragment in tree {
        let alternatives: Vec<String> = split_commas(fragment)
            .iter()
            .map(|alt| split_step_counter(alt.trim()).0.to_string())
            .collect();
        let mut next = Vec::with_capacity(list.len() * alternatives.len());
        for prefix in &list {
            for alt in &alternatives {
                next.push(combine(prefix, alt));
            }
        }
        list = next;
    }
    let flat = list.join(", ");
    if flat.len() >= WRAP_THRESHOLD {
        list.join(",\n")
    } else {
        flat
    }
}

fn combine(prefix: &str, alternative: &str) -> String {
    if prefix.is_empty() {
        return alternative.to_string();
    }
    if let Some(rest) = alternative.strip_prefix('&') {
        return format!("{prefix}{rest}");
    }
    if alternative.starts_with("::") {
        return format!("{prefix}{alternative}");
    }
    if let Some(inner) = alternative
        .strip_prefix("if(")
        .and_then(|s| s.strip_suffix(')'))
    {
        return format!("{prefix}{inner}");
    }
    format!("{prefix} {alternative}")
}
