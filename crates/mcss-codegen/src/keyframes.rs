//! Keyframe step distribution.
//!
//! Inside an `@keyframes` block a step header may be `from`, `to`, an
//! explicit percentage, or any symbolic name. Symbolic steps are spaced
//! evenly between their nearest numeric neighbors (defaulting to 0 and
//! 100 at the edges): `from, via, via, to` becomes
//! `from, 33.333%, 66.667%, to`.
//!
//! Keyframe chunks also move to the end of the stream so animation
//! definitions serialize after the rules that use them.

use mcss_parser::{split_step_counter, Chunk};

/// Resolve symbolic step labels and move keyframe chunks to the end.
pub fn distribute(chunks: Vec<Chunk>) -> Vec<Chunk> {
    let mut main = Vec::new();
    let mut groups: Vec<(Vec<String>, Vec<Chunk>)> = Vec::new();
    for chunk in chunks {
        let inside = chunk
            .at_rules
            .last()
            .is_some_and(|rule| rule.starts_with("@keyframes"));
        if !inside {
            main.push(chunk);
            continue;
        }
        if let Some((_, members)) = groups.iter_mut().find(|(key, _)| *key == chunk.at_rules) {
            members.push(chunk);
        } else {
            groups.push((chunk.at_rules.clone(), vec![chunk]));
        }
    }
    for (_, group) in &mut groups {
        resolve_group(group);
    }
    main.extend(groups.into_iter().flat_map(|(_, group)| group));
    main
}

fn resolve_group(group: &mut [Chunk]) {
    // Distinct step labels in declaration order; repeated headers stay
    // distinct through their disambiguation counters
    let mut labels: Vec<String> = Vec::new();
    for chunk in group.iter() {
        if let Some(label) = chunk.tree.last() {
            if !labels.iter().any(|known| known == label) {
                labels.push(label.clone());
            }
        }
    }
    let parsed: Vec<Option<f64>> = labels.iter().map(|label| parse_label(label)).collect();

    let mut selectors: Vec<String> = Vec::with_capacity(labels.len());
    let mut index = 0;
    while index < labels.len() {
        if parsed[index].is_some() {
            selectors.push(split_step_counter(&labels[index]).0.to_string());
            index += 1;
            continue;
        }
        let start = index;
        while index < labels.len() && parsed[index].is_none() {
            index += 1;
        }
        let lower = if start == 0 {
            0.0
        } else {
            parsed[start - 1].unwrap_or(0.0)
        };
        let upper = if index == labels.len() {
            100.0
        } else {
            parsed[index].unwrap_or(100.0)
        };
        let count = index - start;
        for step in 0..count {
            let percent = lower + (step as f64 + 1.0) * (upper - lower) / (count as f64 + 1.0);
            selectors.push(format!("{}%", round3(percent)));
        }
    }

    for chunk in group.iter_mut() {
        if let Some(label) = chunk.tree.last() {
            if let Some(position) = labels.iter().position(|known| known == label) {
                chunk.selector = Some(selectors[position].clone());
            }
        }
    }
}

fn parse_label(label: &str) -> Option<f64> {
    let base = split_step_counter(label).0;
    match base {
        "from" => Some(0.0),
        "to" => Some(100.0),
        _ => base.strip_suffix('%').and_then(|n| n.trim().parse().ok()),
    }
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn step(label: &str, property: &str, value: &str) -> Chunk {
        let mut chunk = Chunk::new(property, value, 1, vec![label.to_string()]);
        chunk.at_rules.push("@keyframes fade".into());
        chunk.selector = Some(split_step_counter(label).0.to_string());
        chunk
    }

    fn selectors(chunks: &[Chunk]) -> Vec<&str> {
        chunks.iter().map(|c| c.resolved()).collect()
    }

    // =========================================================================
    // Symbolic step spacing
    // =========================================================================

    #[test]
    fn test_two_symbolic_steps_split_in_thirds() {
        let out = distribute(vec![
            step("from", "opacity", "1"),
            step("via", "opacity", ".2"),
            step("via~2", "opacity", ".8"),
            step("to", "opacity", "0"),
        ]);
        assert_eq!(selectors(&out), vec!["from", "33.333%", "66.667%", "to"]);
    }

    #[test]
    fn test_single_symbolic_step_lands_midway() {
        let out = distribute(vec![
            step("from", "opacity", "0"),
            step("mid", "opacity", ".5"),
            step("to", "opacity", "1"),
        ]);
        assert_eq!(selectors(&out), vec!["from", "50%", "to"]);
    }

    #[test]
    fn test_symbolic_step_between_explicit_percentages() {
        let out = distribute(vec![
            step("40%", "top", "0"),
            step("via", "top", "5px"),
            step("to", "top", "10px"),
        ]);
        assert_eq!(selectors(&out), vec!["40%", "70%", "to"]);
    }

    #[test]
    fn test_symbolic_step_between_tight_bounds() {
        let out = distribute(vec![
            step("20%", "top", "0"),
            step("via", "top", "5px"),
            step("40%", "top", "10px"),
        ]);
        assert_eq!(selectors(&out), vec!["20%", "30%", "40%"]);
    }

    #[test]
    fn test_edge_bounds_default_to_zero_and_hundred() {
        let out = distribute(vec![step("via", "opacity", ".5"), step("to", "opacity", "1")]);
        assert_eq!(selectors(&out), vec!["50%", "to"]);
    }

    #[test]
    fn test_literal_labels_untouched() {
        let out = distribute(vec![
            step("from", "opacity", "0"),
            step("25%", "opacity", ".3"),
            step("to", "opacity", "1"),
        ]);
        assert_eq!(selectors(&out), vec!["from", "25%", "to"]);
    }

    #[test]
    fn test_steps_with_multiple_declarations_share_a_label() {
        let out = distribute(vec![
            step("from", "opacity", "0"),
            step("via", "opacity", ".5"),
            step("via", "top", "2px"),
            step("to", "opacity", "1"),
        ]);
        assert_eq!(selectors(&out), vec!["from", "50%", "50%", "to"]);
    }

    // =========================================================================
    // Stream reordering
    // =========================================================================

    #[test]
    fn test_keyframe_chunks_move_to_end() {
        let mut plain = Chunk::new("color", "red", 1, vec!["div".into()]);
        plain.selector = Some("div".into());
        let out = distribute(vec![step("from", "opacity", "0"), plain, step("to", "opacity", "1")]);
        assert_eq!(out[0].property, "color");
        assert_eq!(out[1].resolved(), "from");
        assert_eq!(out[2].resolved(), "to");
    }

    #[test]
    fn test_animations_resolve_independently() {
        let mut other = step("via", "top", "0");
        other.at_rules[0] = "@keyframes slide".into();
        let out = distribute(vec![
            step("from", "opacity", "0"),
            step("via", "opacity", ".5"),
            other,
            step("to", "opacity", "1"),
        ]);
        // fade: from, via, to — slide: via alone
        assert_eq!(out[0].resolved(), "from");
        assert_eq!(out[1].resolved(), "50%");
        assert_eq!(out[2].resolved(), "to");
        assert_eq!(out[3].resolved(), "50%");
        assert_eq!(out[3].at_rules[0], "@keyframes slide");
    }
}
