//! # RoughRefine Editor
//!
//! Editing state on top of the sync and geometry crates.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ bisync: text → sanitized tree → reconcile   │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: Document lifecycle + commands       │
//! │  - Live tree, selection, history            │
//! │  - Debounced text sync                      │
//! │  - Pipeline ownership (text vs. drag)       │
//! │  - Canonical text refresh after commits     │
//! └─────────────────────────────────────────────┘
//!                     ↑
//! ┌─────────────────────────────────────────────┐
//! │ geometry: pointer drags → matrices          │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use roughrefine_editor::{EditorConfig, Pipeline};
//!
//! let mut pipeline = Pipeline::from_text(EditorConfig::default(), "<g></g>")?;
//!
//! // Text pane edits are debounced
//! pipeline.text_changed(text, Instant::now());
//! if let Some(outcome) = pipeline.poll(Instant::now())? { ... }
//!
//! // Canvas drags
//! pipeline.select(vec!["node".into()])?;
//! pipeline.begin_transform(TransformMode::Move, None, pointer, bounds)?;
//! pipeline.update_transform(moved, Constraints::default(), &context)?;
//! let command = pipeline.commit_transform(&context)?;
//! editor_pane.set_text(pipeline.canonical_text());
//! ```

mod command;
mod config;
mod debounce;
mod document;
mod errors;
mod pipeline;
mod undo_stack;

pub use command::Command;
pub use config::EditorConfig;
pub use debounce::Debouncer;
pub use document::{Canvas, Document};
pub use errors::EditorError;
pub use pipeline::{Pipeline, PipelineOwner, TextSyncOutcome};
pub use undo_stack::{HistoryEntry, UndoStack};
