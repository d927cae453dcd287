//! # Undo/Redo Stack
//!
//! Tracks command history and enables undo/redo operations.
//!
//! ## Design
//!
//! - Each command is recorded with its inverse, computed when it was applied
//! - Undo reverts the inverse against the current canvas and moves the
//!   command to the redo stack
//! - Redo applies the command again, against whatever the canvas is now
//! - New commands clear the redo stack
//! - The oldest entry is dropped once the level cap is reached
//!
//! Inverses only touch what their command touched, so text syncs that
//! happen between a command and its undo are kept.
//!
//! ## Example
//!
//! ```rust,ignore
//! let mut stack = UndoStack::new();
//! let inverse = canvas.apply(&command)?;
//! stack.record(command, inverse);
//!
//! stack.undo(&mut canvas);
//! stack.redo(&mut canvas)?;
//! ```

use crate::document::{Canvas, Inverse};
use crate::{Command, EditorError};

/// A recorded command and how to revert it
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    pub command: Command,
    inverse: Inverse,
}

/// Undo/redo stack for canvas commands
#[derive(Debug)]
pub struct UndoStack {
    /// Applied commands (most recent last)
    undo_stack: Vec<HistoryEntry>,

    /// Undone commands (most recent last)
    redo_stack: Vec<Command>,

    /// Maximum number of undo levels (0 = unlimited)
    max_levels: usize,
}

impl UndoStack {
    /// Create a new undo stack with default max levels (100)
    pub fn new() -> Self {
        Self::with_max_levels(100)
    }

    pub fn with_max_levels(max_levels: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_levels,
        }
    }

    /// Record a command that has just been applied.
    pub(crate) fn record(&mut self, command: Command, inverse: Inverse) {
        self.undo_stack.push(HistoryEntry { command, inverse });

        if self.max_levels > 0 && self.undo_stack.len() > self.max_levels {
            self.undo_stack.remove(0);
        }

        // New action invalidates the future
        self.redo_stack.clear();
    }

    /// Revert the most recent command. Returns the command that was undone.
    pub fn undo(&mut self, canvas: &mut Canvas) -> Option<&Command> {
        let entry = self.undo_stack.pop()?;
        canvas.revert(entry.inverse);
        self.redo_stack.push(entry.command);
        self.redo_stack.last()
    }

    /// Reapply the most recently undone command. On error the canvas is
    /// unchanged and the command stays on the redo stack.
    pub fn redo(&mut self, canvas: &mut Canvas) -> Result<Option<&Command>, EditorError> {
        let Some(command) = self.redo_stack.pop() else {
            return Ok(None);
        };

        match canvas.apply(&command) {
            Ok(inverse) => {
                self.undo_stack.push(HistoryEntry { command, inverse });
                Ok(self.undo_stack.last().map(|entry| &entry.command))
            }
            Err(err) => {
                self.redo_stack.push(command);
                Err(err)
            }
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_levels(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_levels(&self) -> usize {
        self.redo_stack.len()
    }

    /// Commands in application order, oldest first
    pub fn commands(&self) -> impl Iterator<Item = &Command> {
        self.undo_stack.iter().map(|entry| &entry.command)
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

impl Default for UndoStack {
    fn default() -> Self {
        Self::new()
    }
}
