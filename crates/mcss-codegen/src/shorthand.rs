//! Shorthand property expansion.
//!
//! Three synthetic properties expand into longhand declarations:
//!
//! - `model: display | width height | padding | margin | box-sizing` —
//!   every segment optional, `.` suppresses a slot
//! - `place` / `place-vertical` / `place-horizontal` — box positioning
//!   with anchor keywords, emitting `position`, an offset per axis, and a
//!   compensating translation
//! - quadruple `margin`/`padding` values containing `.` break into the
//!   per-side longhands so individual sides can be suppressed

use std::collections::VecDeque;

use mcss_parser::Chunk;

use crate::CodegenError;

const SIDES: [&str; 4] = ["top", "right", "bottom", "left"];

/// Expand `model` chunks into display/size/box longhands.
///
/// The width/height segment is not optional: a `model` without one is
/// fatal. Either dimension can still be suppressed with `.`.
pub fn expand_model(chunks: Vec<Chunk>) -> Result<Vec<Chunk>, CodegenError> {
    let mut result = Vec::with_capacity(chunks.len());
    for chunk in chunks {
        if chunk.property != "model" {
            result.push(chunk);
            continue;
        }
        let mut parts: VecDeque<&str> = chunk.value.split('|').map(str::trim).collect();
        // A whitespace-free first segment is the display mode; a size pair
        // means display was omitted entirely
        if parts
            .front()
            .is_some_and(|first| !first.contains(char::is_whitespace))
        {
            let display = parts.pop_front().unwrap_or_default();
            push_unless_dot(&mut result, &chunk, "display", display);
        }
        let Some(size) = parts.pop_front() else {
            return Err(CodegenError {
                message: format!("model '{}' is missing its width/height segment", chunk.value),
            });
        };
        let mut dimensions = size.split_whitespace();
        if let Some(width) = dimensions.next() {
            push_unless_dot(&mut result, &chunk, "width", width);
        }
        if let Some(height) = dimensions.next() {
            push_unless_dot(&mut result, &chunk, "height", height);
        }
        for (property, value) in ["padding", "margin", "box-sizing"].into_iter().zip(parts) {
            push_unless_dot(&mut result, &chunk, property, value);
        }
    }
    Ok(result)
}

/// Expand `place`/`place-vertical`/`place-horizontal` chunks.
///
/// Segment layout is `position | vertical | horizontal` (axis-restricted
/// variants take a single axis segment). When the position segment is
/// missing it defaults to `absolute`. A malformed axis is fatal: unlike a
/// guard, the statement was clearly meant to position something and
/// guessing would move boxes silently.
pub fn expand_place(chunks: Vec<Chunk>) -> Result<Vec<Chunk>, CodegenError> {
    let mut result = Vec::with_capacity(chunks.len());
    for chunk in chunks {
        if !matches!(
            chunk.property.as_str(),
            "place" | "place-vertical" | "place-horizontal"
        ) {
            result.push(chunk);
            continue;
        }
        let mut parts: VecDeque<&str> = chunk.value.split('|').map(str::trim).collect();
        let expected = if chunk.property == "place" { 3 } else { 2 };
        if parts.len() == expected {
            let position = parts.pop_front().unwrap_or_default();
            if position != "." {
                result.push(chunk.derive("position", position));
            }
        } else {
            result.push(chunk.derive("position", "absolute"));
        }

        let mut translate_x = None;
        let mut translate_y = None;
        if chunk.property != "place-horizontal" {
            if let Some(segment) = parts.pop_front() {
                let (property, value, shift) = read_axis(segment, ["top", "center", "bottom"])?;
                result.push(chunk.derive(property, value));
                if !is_zero(&shift) {
                    translate_y = Some(shift);
                }
            }
        }
        if chunk.property != "place-vertical" {
            if let Some(segment) = parts.pop_front() {
                let (property, value, shift) = read_axis(segment, ["left", "center", "right"])?;
                result.push(chunk.derive(property, value));
                if !is_zero(&shift) {
                    translate_x = Some(shift);
                }
            }
        }

        let transform = match (translate_x, translate_y) {
            (Some(x), Some(y)) => Some(format!("translate({x}, {y})")),
            (Some(x), None) => Some(format!("translateX({x})")),
            (None, Some(y)) => Some(format!("translateY({y})")),
            (None, None) => None,
        };
        if let Some(value) = transform {
            result.push(chunk.derive("add-transform", value));
        }
    }
    Ok(result)
}

/// Normalize one axis segment to `[anchor, child-anchor, distance]` and
/// resolve it to an offset declaration plus the translation contribution.
///
/// The anchor contributes 0%/50%/100% and the child anchor 0%/-50%/-100%;
/// the two sum, so `bottom bottom` cancels out (the `bottom` offset property
/// already pins the child's bottom edge) while `top bottom` shifts a full
/// child height. A non-keyword child anchor passes through as a literal
/// translation.
fn read_axis(
    segment: &str,
    anchors: [&'static str; 3],
) -> Result<(&'static str, String, String), CodegenError> {
    let mut parts: Vec<&str> = segment.split_whitespace().collect();
    match parts.len() {
        1 => {
            parts.push(parts[0]);
            parts.push("0");
        }
        2 => {
            if anchors.contains(&parts[1]) || parts[1] == "center" {
                parts.push("0");
            } else {
                // Second value is a distance, so the child anchors like the
                // parent edge
                parts.insert(1, parts[0]);
            }
        }
        3 => {}
        count => {
            return Err(CodegenError {
                message: format!("place axis '{segment}' has {count} values (expected 1 to 3)"),
            })
        }
    }
    let distance = parts[2];
    let (property, base) = match parts[0] {
        anchor if anchor == anchors[0] => (anchors[0], 0),
        "center" => (anchors[0], 50),
        anchor if anchor == anchors[2] => (anchors[2], 100),
        anchor => {
            return Err(CodegenError {
                message: format!("unknown place anchor '{anchor}' in '{segment}'"),
            })
        }
    };
    let shift = match parts[1] {
        child if child == anchors[0] => format!("{base}%"),
        "center" => format!("{}%", base - 50),
        child if child == anchors[2] => format!("{}%", base - 100),
        literal => literal.to_string(),
    };
    Ok((property, distance.to_string(), shift))
}

/// Expand `margin`/`padding` values that use `.` to suppress sides.
pub fn expand_quadruples(chunks: Vec<Chunk>) -> Vec<Chunk> {
    let mut result = Vec::with_capacity(chunks.len());
    for chunk in chunks {
        if chunk.property != "margin" && chunk.property != "padding" {
            result.push(chunk);
            continue;
        }
        let parts: Vec<&str> = chunk.value.split_whitespace().collect();
        if !parts.contains(&".") {
            result.push(chunk);
            continue;
        }
        // CSS repetition rules for 2 and 3 values
        let order: &[usize] = match parts.len() {
            2 => &[0, 1, 0, 1],
            3 => &[0, 1, 2, 1],
            4 => &[0, 1, 2, 3],
            _ => continue,
        };
        for (side, &index) in SIDES.iter().zip(order) {
            if parts[index] != "." {
                result.push(chunk.derive(format!("{}-{side}", chunk.property), parts[index]));
            }
        }
    }
    result
}

fn push_unless_dot(result: &mut Vec<Chunk>, template: &Chunk, property: &str, value: &str) {
    if !value.is_empty() && value != "." {
        result.push(template.derive(property, value));
    }
}

fn is_zero(text: &str) -> bool {
    let leading: String = text
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    leading.parse::<f64>().map(|n| n == 0.0).unwrap_or(false)
}
