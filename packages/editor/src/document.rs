//! # Document Handle
//!
//! The live canvas tree, the current selection and the command history.
//!
//! ## Lifecycle
//!
//! ```text
//! text sync ──replace_root──▶ Document ◀──execute(Command)── canvas
//!                                │
//!                         undo / redo
//! ```
//!
//! Text syncs replace the tree wholesale and are not recorded in history;
//! canvas commands are. Undo reverts only what the undone command touched,
//! so text edits made after it survive.

use crate::{Command, EditorError, UndoStack};
use roughrefine_bisync::{SafeElement, SafeNode, CONTAINER_TAG};
use roughrefine_geometry::Matrix;
use std::mem;
use tracing::debug;

/// Live tree and selection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Canvas {
    pub root: SafeElement,
    pub selection: Vec<String>,
}

/// What undo has to put back for one command
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Inverse {
    edit: TreeEdit,
    selection: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
enum TreeEdit {
    None,

    /// Previous `transform` values by shape id, in application order
    RestoreTransforms(Vec<(String, Option<String>)>),

    /// Remove the shape a create appended
    Remove(SafeElement),

    /// Put deleted shapes back where they were
    Reinsert(Vec<Removed>),
}

#[derive(Debug, Clone, PartialEq)]
struct Removed {
    /// Id of the parent, `None` for the root container
    parent_id: Option<String>,
    index: usize,
    shape: SafeElement,
}

impl Canvas {
    /// Apply `command`, returning its inverse. Nothing changes on error.
    pub(crate) fn apply(&mut self, command: &Command) -> Result<Inverse, EditorError> {
        let selection = self.selection.clone();

        let edit = match command {
            Command::Transform {
                shape_ids, matrix, ..
            } => {
                require_all(&self.root, shape_ids)?;
                let mut previous = Vec::with_capacity(shape_ids.len());
                for id in shape_ids {
                    if let Some(shape) = self.root.find_by_id_mut(id) {
                        previous.push((id.clone(), shape.attr("transform").map(str::to_string)));
                        compose_transform(shape, matrix);
                    }
                }
                TreeEdit::RestoreTransforms(previous)
            }

            Command::Create { shape } => {
                if let Some(id) = shape.id() {
                    if self.root.find_by_id(id).is_some() {
                        return Err(EditorError::DuplicateShape(id.to_string()));
                    }
                }
                self.root.children.push(SafeNode::Element(shape.clone()));
                TreeEdit::Remove(shape.clone())
            }

            Command::Delete { shape_ids } => {
                require_all(&self.root, shape_ids)?;
                if shape_ids.iter().any(|id| self.root.id() == Some(id.as_str())) {
                    return Err(EditorError::InvalidShape(
                        "the root container cannot be deleted".into(),
                    ));
                }
                let mut removed = Vec::new();
                take_shapes(&mut self.root, None, shape_ids, &mut removed);
                self.selection.retain(|id| !shape_ids.contains(id));
                TreeEdit::Reinsert(removed)
            }

            Command::Select { shape_ids } => {
                require_all(&self.root, shape_ids)?;
                self.selection = shape_ids.clone();
                TreeEdit::None
            }
        };

        Ok(Inverse { edit, selection })
    }

    /// Undo one command against the current tree. Shapes that have since
    /// been removed or re-added by a text edit are left alone.
    pub(crate) fn revert(&mut self, inverse: Inverse) {
        match inverse.edit {
            TreeEdit::None => {}

            TreeEdit::RestoreTransforms(previous) => {
                for (id, value) in previous.into_iter().rev() {
                    let Some(shape) = self.root.find_by_id_mut(&id) else {
                        continue;
                    };
                    match value {
                        Some(value) => {
                            shape.attributes.insert("transform".to_string(), value);
                        }
                        None => {
                            shape.attributes.shift_remove("transform");
                        }
                    }
                }
            }

            TreeEdit::Remove(shape) => match shape.id() {
                Some(id) => {
                    let mut removed = Vec::new();
                    take_shapes(&mut self.root, None, &[id.to_string()], &mut removed);
                }
                None => {
                    let found = self
                        .root
                        .children
                        .iter()
                        .rposition(|node| node.as_element() == Some(&shape));
                    if let Some(index) = found {
                        self.root.children.remove(index);
                    }
                }
            },

            TreeEdit::Reinsert(removed) => {
                for item in removed {
                    if item.shape.id().is_some_and(|id| self.root.find_by_id(id).is_some()) {
                        continue;
                    }
                    let leftover = match &item.parent_id {
                        Some(parent_id) => {
                            insert_under(&mut self.root, parent_id, item.index, item.shape)
                        }
                        None => {
                            let index = item.index.min(self.root.children.len());
                            self.root.children.insert(index, SafeNode::Element(item.shape));
                            None
                        }
                    };
                    if let Some(shape) = leftover {
                        self.root.children.push(SafeNode::Element(shape));
                    }
                }
            }
        }

        let root = &self.root;
        self.selection = inverse
            .selection
            .into_iter()
            .filter(|id| root.find_by_id(id).is_some())
            .collect();
    }
}

#[derive(Debug)]
pub struct Document {
    /// Increments on every change to the tree or selection
    pub version: u64,

    canvas: Canvas,
    history: UndoStack,
}

impl Document {
    /// Empty `<g>` root.
    pub fn new(history_limit: usize) -> Self {
        Self::with_root(SafeElement::new(CONTAINER_TAG), history_limit)
    }

    pub fn with_root(root: SafeElement, history_limit: usize) -> Self {
        Self {
            version: 0,
            canvas: Canvas {
                root,
                selection: Vec::new(),
            },
            history: UndoStack::with_max_levels(history_limit),
        }
    }

    pub fn root(&self) -> &SafeElement {
        &self.canvas.root
    }

    pub fn selection(&self) -> &[String] {
        &self.canvas.selection
    }

    pub fn history(&self) -> &UndoStack {
        &self.history
    }

    /// Take the tree out for reconciliation, leaving an empty root behind.
    pub(crate) fn take_root(&mut self) -> SafeElement {
        mem::take(&mut self.canvas.root)
    }

    /// Install a reconciled tree. Selected ids that no longer exist are
    /// dropped from the selection.
    pub(crate) fn replace_root(&mut self, root: SafeElement) {
        self.canvas.root = root;
        let root = &self.canvas.root;
        self.canvas
            .selection
            .retain(|id| root.find_by_id(id).is_some());
        self.version += 1;
    }

    /// Apply a command and record it for undo. Nothing changes if the
    /// command refers to a missing shape.
    pub fn execute(&mut self, command: Command) -> Result<(), EditorError> {
        let inverse = self.canvas.apply(&command)?;

        debug!(command = command.label(), version = self.version + 1, "command applied");
        self.history.record(command, inverse);
        self.version += 1;
        Ok(())
    }

    pub fn undo(&mut self) -> Option<&Command> {
        let command = self.history.undo(&mut self.canvas)?;
        self.version += 1;
        Some(command)
    }

    /// Reapply the last undone command to the current tree. Fails if a
    /// text edit has since removed a shape it needs; the command stays
    /// available for redo.
    pub fn redo(&mut self) -> Result<Option<&Command>, EditorError> {
        let command = self.history.redo(&mut self.canvas)?;
        if command.is_some() {
            self.version += 1;
        }
        Ok(command)
    }
}

fn require_all(root: &SafeElement, shape_ids: &[String]) -> Result<(), EditorError> {
    match shape_ids.iter().find(|id| root.find_by_id(id).is_none()) {
        Some(missing) => Err(EditorError::UnknownShape(missing.clone())),
        None => Ok(()),
    }
}

/// `matrix · existing`, written back as a single `matrix(...)`.
fn compose_transform(shape: &mut SafeElement, matrix: &Matrix) {
    let existing = shape
        .attr("transform")
        .map(Matrix::parse_svg)
        .unwrap_or_default();
    shape
        .attributes
        .insert("transform".to_string(), matrix.multiply(&existing).to_svg());
}

/// Detach every element whose id is listed, recording where it sat.
/// Descendants of a detached element go with it.
fn take_shapes(
    element: &mut SafeElement,
    parent_id: Option<String>,
    shape_ids: &[String],
    removed: &mut Vec<Removed>,
) {
    let children = mem::take(&mut element.children);
    for (index, child) in children.into_iter().enumerate() {
        match child {
            SafeNode::Element(shape)
                if shape
                    .id()
                    .is_some_and(|id| shape_ids.iter().any(|s| s == id)) =>
            {
                removed.push(Removed {
                    parent_id: parent_id.clone(),
                    index,
                    shape,
                });
            }
            other => element.children.push(other),
        }
    }

    for child in element.children.iter_mut().filter_map(SafeNode::as_element_mut) {
        let id = child.id().map(str::to_string);
        take_shapes(child, id, shape_ids, removed);
    }
}

/// Insert `shape` at `index` under the element with `parent_id`. Hands the
/// shape back when there is no such element.
fn insert_under(
    element: &mut SafeElement,
    parent_id: &str,
    index: usize,
    shape: SafeElement,
) -> Option<SafeElement> {
    if element.id() == Some(parent_id) {
        let index = index.min(element.children.len());
        element.children.insert(index, SafeNode::Element(shape));
        return None;
    }

    let mut shape = shape;
    for child in element.children.iter_mut().filter_map(SafeNode::as_element_mut) {
        match insert_under(child, parent_id, index, shape) {
            None => return None,
            Some(back) => shape = back,
        }
    }
    Some(shape)
}
