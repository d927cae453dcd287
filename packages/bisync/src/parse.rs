//! Markup parsing on top of `roxmltree`.
//!
//! Markup fragments are wrapped in a synthetic `<svg>` element so several
//! top-level nodes parse as one document. The borrowed `roxmltree` tree is
//! converted into an owned [`RawNode`] tree right away.

use crate::error::SanitizeError;
use crate::number::collapse_whitespace;
use crate::tree::{SafeElement, SafeNode};

const SVG_NS: &str = "http://www.w3.org/2000/svg";

/// Owned parse tree before any allow-list checks.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum RawNode {
    Element {
        tag: String,
        attributes: Vec<(String, String)>,
        children: Vec<RawNode>,
    },
    Text(String),
}

/// Parse `markup` as the content of a wrapper element and return the
/// wrapper's children. Comments and processing instructions are skipped.
pub(crate) fn parse_markup(markup: &str) -> Result<Vec<RawNode>, roxmltree::Error> {
    let wrapped = format!("<svg xmlns=\"{}\">{}</svg>", SVG_NS, markup);
    let document = roxmltree::Document::parse(&wrapped)?;
    Ok(convert_children(document.root_element()))
}

fn convert_children(node: roxmltree::Node<'_, '_>) -> Vec<RawNode> {
    node.children().filter_map(convert_node).collect()
}

fn convert_node(node: roxmltree::Node<'_, '_>) -> Option<RawNode> {
    if node.is_element() {
        let attributes = node
            .attributes()
            .map(|attr| {
                let name = match attr.namespace() {
                    None => attr.name().to_string(),
                    Some(namespace) => qualified_name(node, namespace, attr.name()),
                };
                (name, attr.value().to_string())
            })
            .collect();
        let name = node.tag_name();
        let tag = match name.namespace() {
            Some(SVG_NS) => name.name().to_string(),
            namespace => qualified_name(node, namespace.unwrap_or_default(), name.name()),
        };
        return Some(RawNode::Element {
            tag,
            attributes,
            children: convert_children(node),
        });
    }

    if node.is_text() {
        return node.text().map(|text| RawNode::Text(text.to_string()));
    }

    None
}

/// Name outside the SVG namespace, kept qualified so it never matches an
/// allow-listed name: `prefix:local`, or `{uri}local` without a prefix.
fn qualified_name(node: roxmltree::Node<'_, '_>, namespace: &str, local: &str) -> String {
    match node.lookup_prefix(namespace) {
        Some(prefix) if !prefix.is_empty() => format!("{}:{}", prefix, local),
        _ => format!("{{{}}}{}", namespace, local),
    }
}

/// Parse already-sanitized container markup (`<g>…</g>`) into the children
/// list consumed by [`crate::reconcile`].
///
/// No allow-list checks happen here; run [`crate::sanitize`] first when the
/// input is untrusted.
pub fn parse_fragment(markup: &str) -> Result<Vec<SafeNode>, SanitizeError> {
    let nodes = parse_markup(markup).map_err(|e| SanitizeError::malformed(e.to_string()))?;

    let root = nodes.into_iter().find_map(|node| match node {
        RawNode::Element { children, .. } => Some(children),
        RawNode::Text(_) => None,
    });

    Ok(root
        .unwrap_or_default()
        .into_iter()
        .filter_map(into_safe_node)
        .collect())
}

fn into_safe_node(node: RawNode) -> Option<SafeNode> {
    match node {
        RawNode::Element {
            tag,
            attributes,
            children,
        } => Some(SafeNode::Element(SafeElement {
            tag,
            attributes: attributes.into_iter().collect(),
            children: children.into_iter().filter_map(into_safe_node).collect(),
        })),
        RawNode::Text(text) => {
            let content = collapse_whitespace(&text);
            (!content.is_empty()).then(|| SafeNode::text(content))
        }
    }
}
