//! The flat chunk AST.
//!
//! A [`Chunk`] is one declaration plus its full ancestry context. The whole
//! pipeline is a sequence of pure passes over one exclusively-owned
//! `Vec<Chunk>`; expanders replace a chunk with zero-to-many derived clones,
//! and every clone carries deep copies of the ancestry so mutating one can
//! never affect a sibling.

/// One declaration record in the flat AST.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// Identifier: `model`, `place`, `add-transition`, or a literal CSS
    /// property name.
    pub property: String,
    /// Raw or partially-processed value text.
    pub value: String,
    /// Nesting level the declaration appeared at.
    pub depth: usize,
    /// Selector-fragment ancestry, innermost last. Never contains
    /// `@`-fragments once the build-time split has run.
    pub tree: Vec<String>,
    /// At-rule ancestry, outer-to-inner. Every entry begins with `@`.
    pub at_rules: Vec<String>,
    /// Resolved compound-selector text. `None` before the selector
    /// resolution pass.
    pub selector: Option<String>,
}

impl Chunk {
    pub fn new(
        property: impl Into<String>,
        value: impl Into<String>,
        depth: usize,
        tree: Vec<String>,
    ) -> Self {
        Self {
            property: property.into(),
            value: value.into(),
            depth,
            tree,
            at_rules: Vec::new(),
            selector: None,
        }
    }

    /// Clone this chunk with a new property and value, deep-copying the
    /// ancestry and keeping the resolved selector. This is how expanders
    /// synthesize longhand chunks.
    pub fn derive(&self, property: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            value: value.into(),
            depth: self.depth,
            tree: self.tree.clone(),
            at_rules: self.at_rules.clone(),
            selector: self.selector.clone(),
        }
    }

    /// Resolved selector text, empty until the resolver pass has run.
    pub fn resolved(&self) -> &str {
        self.selector.as_deref().unwrap_or("")
    }

    /// True when the innermost ancestry fragment is a conditional guard.
    pub fn is_guarded(&self) -> bool {
        self.tree
            .last()
            .is_some_and(|leaf| leaf.trim_start().starts_with("if("))
    }
}

/// Split a `~N` step-disambiguation counter off an ancestry fragment.
///
/// The tree builder suffixes repeated headers (`via`, `via~2`, `via~3`) so
/// animation steps stay distinct; downstream passes that want the literal
/// header text strip the counter with this. A fragment without a counter
/// counts as its own first occurrence.
pub fn split_step_counter(fragment: &str) -> (&str, usize) {
    if let Some(tilde) = fragment.rfind('~') {
        let digits = &fragment[tilde + 1..];
        if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(count) = digits.parse() {
                return (&fragment[..tilde], count);
            }
        }
    }
    (fragment, 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_deep_copies_ancestry() {
        let mut base = Chunk::new("model", "block | 10px 10px", 1, vec!["div".into()]);
        base.at_rules.push("@media (min-width: 40em)".into());

        let mut derived = base.derive("display", "block");
        derived.tree.push("span".into());
        derived.at_rules.clear();

        assert_eq!(base.tree, vec!["div".to_string()]);
        assert_eq!(base.at_rules, vec!["@media (min-width: 40em)".to_string()]);
        assert_eq!(derived.property, "display");
        assert_eq!(derived.depth, 1);
    }

    #[test]
    fn test_is_guarded() {
        let guarded = Chunk::new("color", "red", 2, vec!["div".into(), "if(:hover)".into()]);
        let plain = Chunk::new("color", "red", 2, vec!["if(:hover)".into(), "div".into()]);
        assert!(guarded.is_guarded());
        assert!(!plain.is_guarded());
    }

    #[test]
    fn test_resolved_defaults_to_empty() {
        let chunk = Chunk::new("color", "red", 0, vec![]);
        assert_eq!(chunk.resolved(), "");
    }

    #[test]
    fn test_split_step_counter() {
        assert_eq!(split_step_counter("via"), ("via", 1));
        assert_eq!(split_step_counter("via~2"), ("via", 2));
        assert_eq!(split_step_counter("via~12"), ("via", 12));
        // A tilde that is not a counter stays part of the fragment
        assert_eq!(split_step_counter("li ~ li"), ("li ~ li", 1));
        assert_eq!(split_step_counter("a~"), ("a~", 1));
    }
}
