//! Transition and transform accumulation.
//!
//! Earlier passes emit synthetic `add-transition`/`add-transform` chunks
//! wherever a declaration wants to contribute one spec to its block's
//! combined `transition`/`transform` value. This pass folds each group of
//! synthetics into a single explicit declaration:
//!
//! - with an explicit declaration already in the block, the merged value
//!   lands there and every synthetic disappears
//! - otherwise the first synthetic is promoted in place
//!
//! Guarded chunks form their own blocks, but they still read (never write)
//! the unguarded parent block's value so the guarded state transitions
//! everything the base state does.

use std::collections::HashSet;

use mcss_lexer::split_commas;
use mcss_parser::Chunk;

use crate::selector::resolve_tree;

/// Value length beyond which merged transforms wrap one spec per line.
const WRAP_THRESHOLD: usize = 80;

#[derive(Clone, Copy)]
enum Kind {
    Transition,
    Transform,
}

impl Kind {
    fn synthetic(self) -> &'static str {
        match self {
            Kind::Transition => "add-transition",
            Kind::Transform => "add-transform",
        }
    }

    fn property(self) -> &'static str {
        match self {
            Kind::Transition => "transition",
            Kind::Transform => "transform",
        }
    }

    fn merge(self, specs: &[String]) -> String {
        match self {
            Kind::Transition => merge_transitions(specs),
            Kind::Transform => merge_transforms(specs),
        }
    }
}

/// Fold `add-transition` chunks into explicit `transition` declarations.
pub fn transitions(chunks: Vec<Chunk>) -> Vec<Chunk> {
    accumulate(chunks, Kind::Transition)
}

/// Fold `add-transform` chunks into explicit `transform` declarations.
pub fn transforms(chunks: Vec<Chunk>) -> Vec<Chunk> {
    accumulate(chunks, Kind::Transform)
}

fn accumulate(mut chunks: Vec<Chunk>, kind: Kind) -> Vec<Chunk> {
    let mut groups: Vec<((String, Vec<String>), Vec<usize>)> = Vec::new();
    for (index, chunk) in chunks.iter().enumerate() {
        if chunk.property != kind.synthetic() {
            continue;
        }
        let key = (chunk.resolved().to_string(), chunk.at_rules.clone());
        if let Some((_, members)) = groups.iter_mut().find(|(existing, _)| *existing == key) {
            members.push(index);
        } else {
            groups.push((key, vec![index]));
        }
    }

    // Guarded groups run after plain ones so a promoted plain declaration
    // is already visible as their base
    let (plain, guarded): (Vec<_>, Vec<_>) = groups
        .into_iter()
        .partition(|(_, members)| !chunks[members[0]].is_guarded());

    let mut removed = vec![false; chunks.len()];
    for (key, members) in plain.into_iter().chain(guarded) {
        let first = members[0];
        let is_guarded = chunks[first].is_guarded();
        // A guarded block reads its outer block's declaration wherever it
        // appears in the stream; a plain block only merges into one declared
        // before its first synthetic
        let base = if is_guarded {
            let tree = &chunks[first].tree;
            let outer = resolve_tree(&tree[..tree.len() - 1]);
            find_base(&chunks, &removed, chunks.len(), kind, &outer, &key.1)
        } else {
            find_base(&chunks, &removed, first, kind, &key.0, &key.1)
        };

        let mut specs = Vec::with_capacity(members.len() + 1);
        if let Some(index) = base {
            specs.push(chunks[index].value.clone());
        }
        for &member in &members {
            specs.push(chunks[member].value.clone());
        }
        let merged = kind.merge(&specs);

        match base {
            Some(index) if !is_guarded => {
                chunks[index].value = merged;
                for &member in &members {
                    removed[member] = true;
                }
            }
            _ => {
                chunks[first].property = kind.property().to_string();
                chunks[first].value = merged;
                for &member in &members[1..] {
                    removed[member] = true;
                }
            }
        }
    }

    let mut keep = removed.into_iter();
    chunks.retain(|_| !keep.next().unwrap_or(false));
    chunks
}

/// Last explicit declaration for the given block key before `limit`.
fn find_base(
    chunks: &[Chunk],
    removed: &[bool],
    limit: usize,
    kind: Kind,
    selector: &str,
    at_rules: &[String],
) -> Option<usize> {
    (0..limit).rev().find(|&index| {
        !removed[index]
            && chunks[index].property == kind.property()
            && chunks[index].resolved() == selector
            && chunks[index].at_rules == at_rules
    })
}

fn merge_transitions(specs: &[String]) -> String {
    let mut entries: Vec<String> = Vec::new();
    for spec in specs {
        for entry in split_commas(spec) {
            let entry = entry.trim();
            if !entry.is_empty() {
                entries.push(entry.to_string());
            }
        }
    }
    // The last spec for a property wins; survivors keep stream order
    let mut seen = HashSet::new();
    let mut kept: Vec<String> = Vec::new();
    for entry in entries.into_iter().rev() {
        let name = entry.split_whitespace().next().unwrap_or("").to_string();
        if seen.insert(name) {
            kept.push(entry);
        }
    }
    kept.reverse();
    let separator = if kept.len() > 2 { ",\n\t\t" } else { ", " };
    kept.join(separator)
}

fn merge_transforms(specs: &[String]) -> String {
    let flat = specs.join(" ");
    if flat.len() > WRAP_THRESHOLD {
        specs.join("\n\t\t")
    } else {
        flat
    }
}
