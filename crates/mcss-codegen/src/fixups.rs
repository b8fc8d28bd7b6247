//! Structural fixups applied after expansion.
//!
//! Two small repairs keep the emitted CSS usable:
//!
//! - top-level declarations (empty ancestry) land on `:root`
//! - a `::before`/`::after` block without a `content` declaration gets
//!   `content: "";` injected, since the pseudo-element does not render
//!   without one

use mcss_parser::Chunk;

pub fn apply(mut chunks: Vec<Chunk>) -> Vec<Chunk> {
    for chunk in &mut chunks {
        if chunk.tree.is_empty() {
            chunk.selector = Some(":root".to_string());
        }
    }

    let mut pseudo_selectors: Vec<String> = Vec::new();
    for chunk in &chunks {
        let selector = chunk.resolved();
        if (selector.ends_with("::before") || selector.ends_with("::after"))
            && !pseudo_selectors.iter().any(|s| s == selector)
        {
            pseudo_selectors.push(selector.to_string());
        }
    }

    for selector in pseudo_selectors {
        let mut first = None;
        let mut has_content = false;
        for (index, chunk) in chunks.iter().enumerate() {
            // Only the bare block needs content; an at-rule override inherits
            // it from there
            if chunk.resolved() == selector && chunk.at_rules.is_empty() {
                first.get_or_insert(index);
                if chunk.property == "content" {
                    has_content = true;
                }
            }
        }
        if let Some(index) = first {
            if !has_content {
                let content = chunks[index].derive("content", "\"\"");
                chunks.insert(index, content);
            }
        }
    }
    chunks
}
