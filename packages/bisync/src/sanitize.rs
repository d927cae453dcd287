//! # Sanitizer
//!
//! Turns untrusted markup into a [`SafeElement`] tree that only uses
//! allow-listed elements and attributes.
//!
//! Unknown structure is rejected, unknown decoration is tolerated:
//!
//! - a disallowed element aborts with a [`SanitizeError`]
//! - a disallowed attribute is dropped and reported as a warning
//! - a non-conforming `id` is rewritten and reported as a warning
//! - a bad numeric value aborts at the offending attribute
//!
//! Comments and processing instructions are dropped without a warning.

use crate::error::{SanitizeError, SanitizeErrorKind, SanitizeResult};
use crate::number::{
    collapse_whitespace, compress_transform, format_number, parse_number, split_list,
};
use crate::parse::{parse_markup, RawNode};
use crate::schema::{Allowed, CONTAINER_TAG};
use crate::tree::{SafeElement, SafeNode};
use regex::Regex;
use std::sync::OnceLock;
use tracing::{debug, instrument, warn};

/// Successful sanitizer output.
#[derive(Debug, Clone, PartialEq)]
pub struct Sanitized {
    pub tree: SafeElement,
    pub warnings: Vec<String>,
}

impl Sanitized {
    /// Compact serialization of the safe tree.
    pub fn markup(&self) -> String {
        self.tree.to_markup()
    }
}

/// Sanitize raw markup. The input must hold a single `<g>` root.
#[instrument(skip_all, fields(len = raw.len()))]
pub fn sanitize(raw: &str) -> SanitizeResult<Sanitized> {
    let input = raw.trim();
    if input.is_empty() {
        return Ok(Sanitized {
            tree: SafeElement::new(CONTAINER_TAG),
            warnings: Vec::new(),
        });
    }

    let nodes = parse_markup(input).map_err(|e| {
        warn!(error = %e, "Markup failed to parse");
        SanitizeError::malformed(e.to_string())
    })?;

    let mut sanitizer = Sanitizer::default();
    let tree = sanitizer.root(nodes).map_err(|kind| {
        warn!(error = %kind, "Sanitize rejected markup");
        SanitizeError::new(kind, sanitizer.warnings.clone())
    })?;

    debug!(warnings = sanitizer.warnings.len(), "Sanitize complete");
    Ok(Sanitized {
        tree,
        warnings: sanitizer.warnings,
    })
}

#[derive(Default)]
struct Sanitizer {
    warnings: Vec<String>,
}

impl Sanitizer {
    fn root(&mut self, nodes: Vec<RawNode>) -> Result<SafeElement, SanitizeErrorKind> {
        let mut root = None;
        let mut extra = false;
        for node in nodes {
            match node {
                RawNode::Element { .. } if root.is_none() => root = Some(node),
                RawNode::Element { .. } => extra = true,
                RawNode::Text(text) if !text.trim().is_empty() => extra = true,
                RawNode::Text(_) => {}
            }
        }

        let Some(RawNode::Element {
            tag,
            attributes,
            children,
        }) = root
        else {
            return Err(SanitizeErrorKind::NoElement);
        };

        if tag != CONTAINER_TAG || extra {
            return Err(SanitizeErrorKind::NonContainerRoot);
        }

        self.element(tag, attributes, children)
    }

    fn element(
        &mut self,
        tag: String,
        attributes: Vec<(String, String)>,
        children: Vec<RawNode>,
    ) -> Result<SafeElement, SanitizeErrorKind> {
        if !Allowed::is_element(&tag) {
            return Err(SanitizeErrorKind::DisallowedElement(tag));
        }

        let mut element = SafeElement::new(tag);
        for (name, value) in attributes {
            if !Allowed::is_attr(&name) {
                self.warnings
                    .push(format!("Removed disallowed attribute {}", name));
                continue;
            }
            let value = self.attribute(&name, &value)?;
            element.attributes.insert(name, value);
        }

        for child in children {
            if let Some(node) = self.node(child)? {
                element.children.push(node);
            }
        }

        Ok(element)
    }

    fn node(&mut self, node: RawNode) -> Result<Option<SafeNode>, SanitizeErrorKind> {
        match node {
            RawNode::Element {
                tag,
                attributes,
                children,
            } => self
                .element(tag, attributes, children)
                .map(|element| Some(SafeNode::Element(element))),
            RawNode::Text(text) => {
                let content = collapse_whitespace(&text);
                if content.is_empty() {
                    return Ok(None);
                }
                if content.contains('<') || content.contains('>') {
                    return Err(SanitizeErrorKind::MarkupInText);
                }
                Ok(Some(SafeNode::text(content)))
            }
        }
    }

    fn attribute(&mut self, name: &str, raw: &str) -> Result<String, SanitizeErrorKind> {
        let value = raw.trim();
        match name {
            "id" => Ok(self.id(value)),
            "transform" => Ok(compress_transform(value)),
            "points" => {
                let numbers = number_list(value).ok_or(SanitizeErrorKind::InvalidPoints)?;
                if numbers.len() % 2 != 0 {
                    return Err(SanitizeErrorKind::InvalidPoints);
                }
                Ok(numbers.join(" "))
            }
            "stroke-dasharray" => number_list(value)
                .map(|numbers| numbers.join(" "))
                .ok_or(SanitizeErrorKind::InvalidDashArray),
            _ if Allowed::is_numeric(name) => numeric_attribute(name, value),
            _ => Ok(value.to_string()),
        }
    }

    fn id(&mut self, value: &str) -> String {
        if id_pattern().is_match(value) {
            return value.to_string();
        }
        let safe = rewrite_id(value);
        self.warnings
            .push(format!("Normalised invalid id '{}' to '{}'", value, safe));
        safe
    }
}

fn id_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_:-]*$").expect("valid id pattern"))
}

/// Replace disallowed character runs with `-`, then replace a leading run
/// that cannot start an id with `id`.
fn rewrite_id(value: &str) -> String {
    let mut rewritten = String::with_capacity(value.len());
    let mut in_bad_run = false;
    for ch in value.chars() {
        if ch.is_ascii_alphanumeric() || matches!(ch, '_' | ':' | '-') {
            rewritten.push(ch);
            in_bad_run = false;
        } else if !in_bad_run {
            rewritten.push('-');
            in_bad_run = true;
        }
    }

    let body = rewritten.trim_start_matches(|c: char| !(c.is_ascii_alphabetic() || c == '_'));
    if !rewritten.is_empty() && body.len() == rewritten.len() {
        rewritten
    } else {
        format!("id{}", body)
    }
}

fn numeric_attribute(name: &str, value: &str) -> Result<String, SanitizeErrorKind> {
    let number = parse_number(value).ok_or_else(|| SanitizeErrorKind::NotFinite {
        name: name.to_string(),
        value: value.to_string(),
    })?;
    if Allowed::is_non_negative(name) && number < 0.0 {
        return Err(SanitizeErrorKind::Negative(name.to_string()));
    }
    if name == "opacity" && !(0.0..=1.0).contains(&number) {
        return Err(SanitizeErrorKind::OpacityOutOfRange);
    }
    Ok(format_number(number))
}

fn number_list(value: &str) -> Option<Vec<String>> {
    split_list(value)
        .into_iter()
        .map(|token| parse_number(token).map(format_number))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wrap(content: &str) -> String {
        format!("<g>{}</g>", content)
    }

    #[test]
    fn test_keeps_allowed_attributes() {
        let result = sanitize(&wrap(
            r##"<rect id="node" x="12" y="20" width="40" height="30" fill="#fff" />"##,
        ))
        .unwrap();
        let markup = result.markup();
        assert!(markup.contains(r#"id="node""#));
        assert!(markup.contains(r#"width="40""#));
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_removes_unknown_attributes_with_warning() {
        let result = sanitize(&wrap(r#"<rect foo="bar" width="10" height="10" />"#)).unwrap();
        assert!(!result.markup().contains("foo"));
        assert_eq!(result.warnings, vec!["Removed disallowed attribute foo"]);
    }

    #[test]
    fn test_rejects_disallowed_elements() {
        let err = sanitize(&wrap("<script>alert(1)</script>")).unwrap_err();
        assert_eq!(err.kind, SanitizeErrorKind::DisallowedElement("script".into()));
        assert!(err.kind.is_structural());
    }

    #[test]
    fn test_normalises_numeric_attributes() {
        let result = sanitize(&wrap(r#"<rect width="10.12345" height="10.55555" />"#)).unwrap();
        let markup = result.markup();
        assert!(markup.contains(r#"width="10.123""#));
        assert!(markup.contains(r#"height="10.556""#));
    }

    #[test]
    fn test_rejects_negative_width() {
        let err = sanitize(&wrap(r#"<rect width="-20" height="10" />"#)).unwrap_err();
        assert!(err.to_string().contains("must not be negative"));
    }

    #[test]
    fn test_negative_position_is_fine() {
        let result = sanitize(&wrap(r#"<rect x="-20" y="-0.0001" />"#)).unwrap();
        assert_eq!(result.tree.elements().next().unwrap().attr("x"), Some("-20"));
        assert_eq!(result.tree.elements().next().unwrap().attr("y"), Some("0"));
    }

    #[test]
    fn test_rejects_non_finite_numbers() {
        let err = sanitize(&wrap(r#"<circle r="abc" />"#)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Attribute r expected numeric value but received 'abc'"
        );
    }

    #[test]
    fn test_opacity_range() {
        assert!(sanitize(&wrap(r#"<rect opacity="0.5" />"#)).is_ok());
        let err = sanitize(&wrap(r#"<rect opacity="1.5" />"#)).unwrap_err();
        assert_eq!(err.kind, SanitizeErrorKind::OpacityOutOfRange);
    }

    #[test]
    fn test_empty_input_yields_empty_container() {
        let result = sanitize("   \n ").unwrap();
        assert_eq!(result.markup(), "<g/>");
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_root_must_be_container() {
        let err = sanitize(r#"<rect width="10" />"#).unwrap_err();
        assert_eq!(err.kind, SanitizeErrorKind::NonContainerRoot);

        let err = sanitize("<g></g><g></g>").unwrap_err();
        assert_eq!(err.kind, SanitizeErrorKind::NonContainerRoot);
    }

    #[test]
    fn test_comment_only_input() {
        let err = sanitize("<!-- nothing -->").unwrap_err();
        assert_eq!(err.kind, SanitizeErrorKind::NoElement);
    }

    #[test]
    fn test_malformed_markup() {
        let err = sanitize("<g><rect></g>").unwrap_err();
        assert!(matches!(err.kind, SanitizeErrorKind::Malformed(_)));
    }

    #[test]
    fn test_rewrites_invalid_id() {
        let result = sanitize(&wrap(r#"<rect id="9 lives!" />"#)).unwrap();
        let id = result.tree.elements().next().unwrap().id().unwrap().to_string();
        assert_eq!(id, "idlives-");
        assert!(id_pattern().is_match(&id));
        assert_eq!(
            result.warnings,
            vec!["Normalised invalid id '9 lives!' to 'idlives-'"]
        );
    }

    #[test]
    fn test_rewrite_id_cases() {
        assert_eq!(rewrite_id("-foo"), "idfoo");
        assert_eq!(rewrite_id("a b"), "a-b");
        assert_eq!(rewrite_id(""), "id");
        assert_eq!(rewrite_id("node.1"), "node-1");
    }

    #[test]
    fn test_points_normalisation() {
        let result = sanitize(&wrap(r#"<polygon points="0,0  10.00001,0 10 , 10" />"#)).unwrap();
        assert_eq!(
            result.tree.elements().next().unwrap().attr("points"),
            Some("0 0 10 0 10 10")
        );

        let err = sanitize(&wrap(r#"<polyline points="0,0 10" />"#)).unwrap_err();
        assert_eq!(err.kind, SanitizeErrorKind::InvalidPoints);
    }

    #[test]
    fn test_points_reject_non_numeric_token() {
        let err = sanitize(&wrap(r#"<polygon points="0,0 x,1" />"#)).unwrap_err();
        assert_eq!(err.kind, SanitizeErrorKind::InvalidPoints);
    }

    #[test]
    fn test_namespaced_attribute_is_stripped() {
        let result = sanitize(
            r#"<g xmlns:foo="urn:foo"><rect foo:fill="red" fill="blue" /></g>"#,
        )
        .unwrap();
        let rect = result.tree.elements().next().unwrap();
        assert_eq!(rect.attr("fill"), Some("blue"));
        assert_eq!(rect.attributes.len(), 1);
        assert_eq!(result.warnings, vec!["Removed disallowed attribute foo:fill"]);
    }

    #[test]
    fn test_foreign_element_is_rejected() {
        let err = sanitize(r#"<g xmlns:x="urn:x"><x:rect /></g>"#).unwrap_err();
        assert_eq!(err.kind, SanitizeErrorKind::DisallowedElement("x:rect".into()));
    }

    #[test]
    fn test_dasharray_normalisation() {
        let result = sanitize(&wrap(r#"<line stroke-dasharray="4, 2.5" />"#)).unwrap();
        assert_eq!(
            result.tree.elements().next().unwrap().attr("stroke-dasharray"),
            Some("4 2.5")
        );

        let err = sanitize(&wrap(r#"<line stroke-dasharray="4 dash" />"#)).unwrap_err();
        assert_eq!(err.kind, SanitizeErrorKind::InvalidDashArray);
    }

    #[test]
    fn test_transform_whitespace() {
        let result =
            sanitize(&wrap(r#"<rect transform="  translate(10 ,  20)   scale(2)" />"#)).unwrap();
        assert_eq!(
            result.tree.elements().next().unwrap().attr("transform"),
            Some("translate(10,20) scale(2)")
        );
    }

    #[test]
    fn test_text_nodes() {
        let result = sanitize(&wrap("<text>  Hello \n   world  </text>")).unwrap();
        let text = result.tree.elements().next().unwrap();
        assert_eq!(text.children, vec![SafeNode::text("Hello world")]);

        let err = sanitize(&wrap("<text>a &lt;b&gt;</text>")).unwrap_err();
        assert_eq!(err.kind, SanitizeErrorKind::MarkupInText);
    }

    #[test]
    fn test_fatal_error_keeps_prior_warnings() {
        let err = sanitize(&wrap(r#"<rect foo="1" /><script />"#)).unwrap_err();
        assert_eq!(err.warnings, vec!["Removed disallowed attribute foo"]);
    }

    #[test]
    fn test_root_attributes_are_sanitized() {
        let result = sanitize(r#"<g id="layer" onclick="x()"><rect /></g>"#).unwrap();
        assert_eq!(result.tree.id(), Some("layer"));
        assert_eq!(result.warnings, vec!["Removed disallowed attribute onclick"]);
    }
}
