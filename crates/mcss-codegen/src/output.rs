//! CSS serialization.
//!
//! Chunks with no at-rule ancestry left at the current level group into
//! blocks by selector in stream order and render first; the rest group by
//! their outermost at-rule and recurse one indent deeper. A block with a
//! single short declaration
//! compacts to one line; runs of consecutive one-liners separate with a
//! single newline, everything else with a blank line. Indentation is
//! tabs, one per at-rule nesting level.

use mcss_parser::Chunk;

struct Block {
    text: String,
    one_liner: bool,
}

#[derive(PartialEq)]
enum Key<'a> {
    Plain(&'a str),
    AtRule(&'a str),
}

/// Serialize the final chunk stream to CSS text.
pub fn serialize(chunks: &[Chunk]) -> String {
    let refs: Vec<&Chunk> = chunks.iter().collect();
    let blocks = render_level(&refs, 0);
    if blocks.is_empty() {
        return String::new();
    }
    let mut css = join_blocks(&blocks);
    css.push('\n');
    css
}

fn render_level<'a>(chunks: &[&'a Chunk], depth: usize) -> Vec<Block> {
    let indent = "\t".repeat(depth);
    let mut groups: Vec<(Key<'a>, Vec<&'a Chunk>)> = Vec::new();
    for &chunk in chunks {
        let key = if chunk.at_rules.len() == depth {
            Key::Plain(chunk.resolved())
        } else {
            Key::AtRule(&chunk.at_rules[depth])
        };
        if let Some((_, members)) = groups.iter_mut().find(|(existing, _)| *existing == key) {
            members.push(chunk);
        } else {
            groups.push((key, vec![chunk]));
        }
    }

    // Plain blocks render before at-rule blocks at every level
    let (plain, wrapped): (Vec<_>, Vec<_>) = groups
        .into_iter()
        .partition(|(key, _)| matches!(key, Key::Plain(_)));

    plain
        .into_iter()
        .chain(wrapped)
        .map(|(key, members)| match key {
            Key::Plain(selector) => render_plain(selector, &members, &indent),
            Key::AtRule(rule) => {
                let inner = render_level(&members, depth + 1);
                Block {
                    text: format!("{indent}{rule} {{\n{}\n{indent}}}", join_blocks(&inner)),
                    one_liner: false,
                }
            }
        })
        .collect()
}

fn render_plain(selector: &str, members: &[&Chunk], indent: &str) -> Block {
    if let [only] = members {
        if !only.value.contains('\n') && !selector.contains('\n') {
            return Block {
                text: format!("{indent}{selector} {{ {}: {}; }}", only.property, only.value),
                one_liner: true,
            };
        }
    }
    // A wrapped selector list keeps each alternative at block indentation
    let header = selector.replace('\n', &format!("\n{indent}"));
    let mut text = format!("{indent}{header} {{\n");
    for member in members {
        text.push_str(indent);
        text.push('\t');
        text.push_str(&member.property);
        text.push_str(": ");
        text.push_str(&member.value);
        text.push_str(";\n");
    }
    text.push_str(indent);
    text.push('}');
    Block {
        text,
        one_liner: false,
    }
}

fn join_blocks(blocks: &[Block]) -> String {
    let mut joined = String::new();
    for (index, block) in blocks.iter().enumerate() {
        if index > 0 {
            if blocks[index - 1].one_liner && block.one_liner {
                joined.push('\n');
            } else {
                joined.push_str("\n\n");
            }
        }
        joined.push_str(&block.text);
    }
    joined
}
