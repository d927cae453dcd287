//! # Commands
//!
//! Canvas-side edits recorded in history. Each command is applied to the
//! live tree by [`Document::execute`](crate::Document::execute).
//!
//! - `Transform` composes `matrix` onto each shape's existing transform
//! - `Create` appends a sanitized shape to the root container
//! - `Delete` removes shapes (and their subtrees) wherever they are
//! - `Select` replaces the selection without touching the tree

use roughrefine_bisync::SafeElement;
use roughrefine_geometry::{BoundingBox, Matrix};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Command {
    Transform {
        #[serde(rename = "shapeIds")]
        shape_ids: Vec<String>,
        matrix: Matrix,
        /// Bounds of the selection after the transform
        bounds: BoundingBox,
    },

    Create {
        shape: SafeElement,
    },

    Delete {
        #[serde(rename = "shapeIds")]
        shape_ids: Vec<String>,
    },

    Select {
        #[serde(rename = "shapeIds")]
        shape_ids: Vec<String>,
    },
}

impl Command {
    /// Ids this command touches. For `Create`, the new shape's id if it has one.
    pub fn shape_ids(&self) -> Vec<&str> {
        match self {
            Command::Transform { shape_ids, .. }
            | Command::Delete { shape_ids }
            | Command::Select { shape_ids } => shape_ids.iter().map(String::as_str).collect(),
            Command::Create { shape } => shape.id().into_iter().collect(),
        }
    }

    /// Short name for logs and history labels.
    pub fn label(&self) -> &'static str {
        match self {
            Command::Transform { .. } => "transform",
            Command::Create { .. } => "create",
            Command::Delete { .. } => "delete",
            Command::Select { .. } => "select",
        }
    }

    /// Whether applying this command changes the tree.
    pub fn edits_tree(&self) -> bool {
        !matches!(self, Command::Select { .. })
    }
}
