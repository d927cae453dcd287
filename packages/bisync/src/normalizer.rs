//! # Normalizer
//!
//! Deterministic, indented text form of a markup fragment.
//!
//! This is a display helper, not a validator: malformed input comes back
//! trimmed and otherwise untouched.

use crate::number::{collapse_whitespace, compress_transform, format_number, parse_number};
use crate::parse::{parse_markup, RawNode};
use crate::schema::CONTAINER_TAG;
use crate::tree::{escape_attr, escape_text, SafeElement};
use std::cmp::Ordering;
use tracing::debug;

const INDENT: &str = "  ";

/// Attribute output order. Anything not listed follows alphabetically.
const ATTRIBUTE_ORDER: &[&str] = &[
    "id",
    "x",
    "y",
    "cx",
    "cy",
    "r",
    "rx",
    "ry",
    "width",
    "height",
    "x1",
    "y1",
    "x2",
    "y2",
    "points",
    "d",
    "transform",
    "fill",
    "stroke",
    "stroke-width",
    "stroke-dasharray",
    "opacity",
    "vector-effect",
    "text-anchor",
    "dominant-baseline",
];

/// Canonical text for the content of a container.
///
/// Top-level nodes sit one level deep because the fragment is the body of
/// the root `<g>`.
pub fn normalize(fragment: &str) -> String {
    let trimmed = fragment.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    let nodes = match parse_markup(&format!("<{0}>{1}</{0}>", CONTAINER_TAG, trimmed)) {
        Ok(nodes) => nodes,
        Err(e) => {
            debug!(error = %e, "Normalize fell back to original text");
            return trimmed.to_string();
        }
    };

    let Some(RawNode::Element { children, .. }) = nodes.into_iter().next() else {
        return trimmed.to_string();
    };

    let mut lines = Vec::new();
    for child in &children {
        write_node(child, 1, &mut lines);
    }
    lines.join("\n")
}

/// Editor text for a live container: its canonical children wrapped in the
/// container's own tag.
pub fn canvas_text(root: &SafeElement) -> String {
    let open = format_open_tag(
        &root.tag,
        root.attributes
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str())),
    );
    let body = normalize(&root.inner_markup());
    if body.is_empty() {
        format!("<{}></{}>", open, root.tag)
    } else {
        format!("<{}>\n{}\n</{}>", open, body, root.tag)
    }
}

fn write_node(node: &RawNode, depth: usize, lines: &mut Vec<String>) {
    let indent = INDENT.repeat(depth);
    match node {
        RawNode::Text(text) => {
            let value = collapse_whitespace(text);
            if !value.is_empty() {
                lines.push(format!("{}{}", indent, escape_text(&value)));
            }
        }
        RawNode::Element {
            tag,
            attributes,
            children,
        } => {
            let open = format_open_tag(
                tag,
                attributes
                    .iter()
                    .map(|(name, value)| (name.as_str(), value.as_str())),
            );

            if !children.iter().any(is_significant) {
                lines.push(format!("{}<{} />", indent, open));
                return;
            }

            lines.push(format!("{}<{}>", indent, open));
            for child in children {
                write_node(child, depth + 1, lines);
            }
            lines.push(format!("{}</{}>", indent, tag));
        }
    }
}

fn is_significant(node: &RawNode) -> bool {
    match node {
        RawNode::Element { .. } => true,
        RawNode::Text(text) => !text.trim().is_empty(),
    }
}

fn format_open_tag<'a>(tag: &str, attributes: impl Iterator<Item = (&'a str, &'a str)>) -> String {
    let mut sorted: Vec<(&str, String)> = attributes
        .map(|(name, value)| (name, normalize_value(name, value)))
        .collect();
    sorted.sort_by(|(a, _), (b, _)| compare_names(a, b));

    let mut open = tag.to_string();
    for (name, value) in sorted {
        open.push(' ');
        open.push_str(name);
        open.push_str("=\"");
        open.push_str(&escape_attr(&value));
        open.push('"');
    }
    open
}

fn compare_names(a: &str, b: &str) -> Ordering {
    let rank = |name: &str| ATTRIBUTE_ORDER.iter().position(|listed| *listed == name);
    match (rank(a), rank(b)) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}

fn normalize_value(name: &str, value: &str) -> String {
    let trimmed = value.trim();
    if is_plain_decimal(trimmed) {
        if let Some(number) = parse_number(trimmed) {
            return format_number(number);
        }
    }
    if name == "transform" || trimmed.contains("matrix(") {
        return compress_transform(trimmed);
    }
    collapse_whitespace(trimmed)
}

/// `-?\d+(\.\d+)?`
fn is_plain_decimal(value: &str) -> bool {
    let unsigned = value.strip_prefix('-').unwrap_or(value);
    let (int, frac) = match unsigned.split_once('.') {
        Some((int, frac)) => (int, Some(frac)),
        None => (unsigned, None),
    };
    let digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    digits(int) && frac.map_or(true, digits)
}
