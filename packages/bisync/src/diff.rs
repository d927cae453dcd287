//! # Tree Differ
//!
//! Reconciles the live canvas container against a freshly parsed list of
//! children.
//!
//! Children are matched by key: `#id` when the element has an id, otherwise
//! `tag:ordinal` where the ordinal counts earlier siblings with the same tag.
//! Matched elements are moved into the new tree and patched in place, so
//! anything keyed to them survives the pass. Their subtree is replaced as a
//! whole when its markup differs; only direct children keep identity.

use crate::tree::{SafeElement, SafeNode};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Keys touched by one reconciliation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffReport {
    pub created: Vec<String>,
    pub updated: Vec<String>,
    pub removed: Vec<String>,
}

impl DiffReport {
    pub fn is_empty(&self) -> bool {
        self.created.is_empty() && self.updated.is_empty() && self.removed.is_empty()
    }
}

/// New live tree plus the report describing how it was reached.
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciled {
    pub tree: SafeElement,
    pub report: DiffReport,
}

/// Assigns per-pass keys. Counters are per tree.
#[derive(Default)]
struct KeyAssigner {
    counters: HashMap<String, usize>,
    seen_ids: HashSet<String>,
}

impl KeyAssigner {
    fn key(&mut self, element: &SafeElement) -> String {
        if let Some(id) = element.id() {
            if self.seen_ids.insert(id.to_string()) {
                return format!("#{}", id);
            }
        }
        // Anonymous, or a repeated id: fall back to the tag ordinal.
        let count = self.counters.entry(element.tag.clone()).or_insert(0);
        let key = format!("{}:{}", element.tag, count);
        *count += 1;
        key
    }
}

/// Reconcile `live` against `incoming` and return the new live tree.
///
/// The container's own attributes are kept. Top-level text in `incoming` is
/// carried over in position; it has no key and is not reported.
pub fn reconcile(live: SafeElement, incoming: &[SafeNode]) -> Reconciled {
    let SafeElement {
        tag,
        attributes,
        children,
    } = live;

    let mut existing_keys = KeyAssigner::default();
    let mut existing_order = Vec::new();
    let mut existing: HashMap<String, SafeElement> = HashMap::new();
    for child in children {
        if let SafeNode::Element(element) = child {
            let key = existing_keys.key(&element);
            existing_order.push(key.clone());
            existing.insert(key, element);
        }
    }

    let mut report = DiffReport::default();
    let mut incoming_keys = KeyAssigner::default();
    let mut reconciled = Vec::with_capacity(incoming.len());

    for node in incoming {
        let source = match node {
            SafeNode::Element(element) => element,
            SafeNode::Text { .. } => {
                reconciled.push(node.clone());
                continue;
            }
        };

        let key = incoming_keys.key(source);
        match existing.remove(&key) {
            Some(mut target) => {
                if update_element(&mut target, source) {
                    report.updated.push(key);
                }
                reconciled.push(SafeNode::Element(target));
            }
            None => {
                reconciled.push(SafeNode::Element(source.clone()));
                report.created.push(key);
            }
        }
    }

    report.removed = existing_order
        .into_iter()
        .filter(|key| existing.contains_key(key))
        .collect();

    debug!(
        created = report.created.len(),
        updated = report.updated.len(),
        removed = report.removed.len(),
        "Reconciled live tree"
    );

    Reconciled {
        tree: SafeElement {
            tag,
            attributes,
            children: reconciled,
        },
        report,
    }
}

/// Patch `target` to match `source`. Returns whether anything changed.
fn update_element(target: &mut SafeElement, source: &SafeElement) -> bool {
    let mut changed = false;

    for (name, value) in &source.attributes {
        if target.attributes.get(name) != Some(value) {
            target.attributes.insert(name.clone(), value.clone());
            changed = true;
        }
    }

    let before = target.attributes.len();
    target
        .attributes
        .retain(|name, _| source.attributes.contains_key(name));
    changed |= target.attributes.len() != before;

    if target.inner_markup() != source.inner_markup() {
        target.children = source.children.clone();
        changed = true;
    }

    changed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(id: &str) -> SafeElement {
        SafeElement::new("rect").with_attr("id", id)
    }

    fn keys(tree: &SafeElement) -> Vec<String> {
        tree.elements()
            .map(|e| e.id().map(|id| format!("#{}", id)).unwrap_or_else(|| e.tag.clone()))
            .collect()
    }

    #[test]
    fn test_creates_new_elements_when_none_exist() {
        let live = SafeElement::new("g");
        let result = reconcile(live, &[rect("a").into()]);
        assert_eq!(result.tree.children.len(), 1);
        assert_eq!(result.report.created, vec!["#a"]);
    }

    #[test]
    fn test_updates_attributes_in_place() {
        let live = SafeElement::new("g").with_child(rect("node").with_attr("x", "10"));
        let incoming = [rect("node").with_attr("x", "20").into()];

        let result = reconcile(live, &incoming);
        assert_eq!(result.tree.children.len(), 1);
        assert_eq!(result.tree.elements().next().unwrap().attr("x"), Some("20"));
        assert_eq!(result.report.updated, vec!["#node"]);
    }

    #[test]
    fn test_removes_elements_not_in_fragment() {
        let live = SafeElement::new("g").with_child(rect("stale"));
        let result = reconcile(live, &[]);
        assert!(result.tree.children.is_empty());
        assert_eq!(result.report.removed, vec!["#stale"]);
    }

    #[test]
    fn test_create_update_remove() {
        let live = SafeElement::new("g")
            .with_child(rect("a").with_attr("x", "1"))
            .with_child(rect("stale"));
        let incoming = [rect("a").with_attr("x", "2").into(), rect("b").into()];

        let result = reconcile(live, &incoming);
        assert_eq!(result.report.created, vec!["#b"]);
        assert_eq!(result.report.updated, vec!["#a"]);
        assert_eq!(result.report.removed, vec!["#stale"]);
        assert_eq!(keys(&result.tree), vec!["#a", "#b"]);
    }

    #[test]
    fn test_identical_trees_report_nothing() {
        let children = vec![
            SafeNode::from(rect("a").with_attr("x", "1")),
            SafeElement::new("circle").with_attr("r", "4").into(),
            SafeElement::new("text").with_child(SafeNode::text("hi")).into(),
        ];
        let live = SafeElement {
            tag: "g".into(),
            attributes: Default::default(),
            children: children.clone(),
        };

        let result = reconcile(live, &children);
        assert!(result.report.is_empty());
        assert_eq!(result.tree.children, children);
    }

    #[test]
    fn test_anonymous_keys_use_tag_ordinals() {
        let live = SafeElement::new("g")
            .with_child(SafeElement::new("rect").with_attr("x", "1"))
            .with_child(SafeElement::new("rect").with_attr("x", "2"));
        let incoming = [SafeElement::new("rect").with_attr("x", "1").into()];

        let result = reconcile(live, &incoming);
        assert!(result.report.updated.is_empty());
        assert_eq!(result.report.removed, vec!["rect:1"]);
    }

    #[test]
    fn test_reorders_by_incoming_order() {
        let live = SafeElement::new("g").with_child(rect("a")).with_child(rect("b"));
        let result = reconcile(live, &[rect("b").into(), rect("a").into()]);
        assert!(result.report.is_empty());
        assert_eq!(keys(&result.tree), vec!["#b", "#a"]);
    }

    #[test]
    fn test_removed_attribute_counts_as_update() {
        let live = SafeElement::new("g").with_child(rect("a").with_attr("fill", "red"));
        let result = reconcile(live, &[rect("a").into()]);
        assert_eq!(result.report.updated, vec!["#a"]);
        assert_eq!(result.tree.elements().next().unwrap().attr("fill"), None);
    }

    #[test]
    fn test_subtree_replaced_when_children_differ() {
        let live = SafeElement::new("g").with_child(
            SafeElement::new("g")
                .with_attr("id", "group")
                .with_child(rect("inner")),
        );
        let incoming = [SafeElement::new("g")
            .with_attr("id", "group")
            .with_child(rect("other"))
            .into()];

        let result = reconcile(live, &incoming);
        assert_eq!(result.report.updated, vec!["#group"]);
        let group = result.tree.elements().next().unwrap();
        assert!(group.find_by_id("other").is_some());
        assert!(group.find_by_id("inner").is_none());
    }

    #[test]
    fn test_children_cleared() {
        let text = SafeElement::new("text")
            .with_attr("id", "t")
            .with_child(SafeNode::text("x"));
        let live = SafeElement::new("g").with_child(text);
        let result = reconcile(live, &[SafeElement::new("text").with_attr("id", "t").into()]);
        assert_eq!(result.report.updated, vec!["#t"]);
        assert!(result.tree.elements().next().unwrap().children.is_empty());
    }

    #[test]
    fn test_duplicate_ids_keep_keys_unique() {
        let live = SafeElement::new("g");
        let result = reconcile(live, &[rect("a").into(), rect("a").into()]);
        assert_eq!(result.report.created, vec!["#a", "rect:0"]);
    }

    #[test]
    fn test_container_attributes_preserved() {
        let live = SafeElement::new("g").with_attr("id", "layer");
        let result = reconcile(live, &[rect("a").into()]);
        assert_eq!(result.tree.id(), Some("layer"));
    }
}
