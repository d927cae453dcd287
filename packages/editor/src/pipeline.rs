//! # Editing Pipeline
//!
//! Coordinates the two directions of sync over one [`Document`]:
//!
//! ```text
//! text edit ─▶ debounce ─▶ diagnose + sanitize ─▶ reconcile ─▶ live tree
//! pointer   ─▶ TransformController ─▶ commit ─▶ Command ─▶ live tree ─▶ canonical text
//! ```
//!
//! [`PipelineOwner`] records which direction currently owns the document.
//! A text sync is rejected while a drag is in progress, and canvas text
//! emitted by the pipeline is never synced back as a user edit.

use crate::{Command, Debouncer, Document, EditorConfig, EditorError};
use roughrefine_bisync::{
    canvas_text, diagnose, reconcile, sanitize, Diagnostic, DiffReport, Reconciled, SafeElement,
    SafeNode, CONTAINER_TAG,
};
use roughrefine_geometry::{
    snap_guides, BoundingBox, Constraints, Handle, Point, SnapContext, SnapGuide,
    TransformController, TransformMode, TransformUpdate,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Which direction of sync currently owns the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PipelineOwner {
    #[default]
    Idle,
    TextSync,
    Transform,
}

impl fmt::Display for PipelineOwner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineOwner::Idle => "idle",
            PipelineOwner::TextSync => "text sync",
            PipelineOwner::Transform => "transform",
        };
        f.write_str(name)
    }
}

/// Result of syncing editor text into the canvas
#[derive(Debug, Clone, PartialEq)]
pub enum TextSyncOutcome {
    /// The text is what the canvas already holds
    Unchanged,

    Applied {
        report: DiffReport,
        /// Non-fatal sanitizer notes
        warnings: Vec<String>,
    },
}

/// Manages the text ⇄ canvas pipeline
pub struct Pipeline {
    config: EditorConfig,
    document: Document,
    controller: TransformController,
    debouncer: Debouncer,
    owner: PipelineOwner,

    /// Last text emitted from the canvas
    canonical_text: String,

    /// Text the live tree currently corresponds to
    last_synced: String,

    diagnostics: Vec<Diagnostic>,
}

impl Pipeline {
    /// Pipeline over an empty `<g>` document
    pub fn new(config: EditorConfig) -> Self {
        let document = Document::new(config.history_limit);
        Self::with_document(config, document)
    }

    /// Pipeline seeded from editor text. Fails if the text does not sanitize.
    pub fn from_text(config: EditorConfig, text: &str) -> Result<Self, EditorError> {
        let sanitized = sanitize(text)?;
        let document = Document::with_root(sanitized.tree, config.history_limit);
        let mut pipeline = Self::with_document(config, document);
        pipeline.diagnostics = diagnose(text);
        Ok(pipeline)
    }

    fn with_document(config: EditorConfig, document: Document) -> Self {
        let canonical_text = canvas_text(document.root());
        Self {
            controller: TransformController::new(config.snap_settings()),
            debouncer: Debouncer::new(config.debounce_window()),
            config,
            document,
            owner: PipelineOwner::Idle,
            last_synced: canonical_text.clone(),
            canonical_text,
            diagnostics: Vec::new(),
        }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn owner(&self) -> PipelineOwner {
        self.owner
    }

    /// Text for the editor pane, refreshed after every canvas-side change
    pub fn canonical_text(&self) -> &str {
        &self.canonical_text
    }

    /// Markers for the most recently synced text
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    // ---- text → canvas ----

    /// Note an edit in the text pane. The sync happens on a later `poll`.
    pub fn text_changed(&mut self, text: impl Into<String>, now: Instant) {
        self.debouncer.push(text, now);
    }

    /// Sync the pending text once the debounce window has passed. While a
    /// drag owns the document the text stays pending.
    pub fn poll(&mut self, now: Instant) -> Result<Option<TextSyncOutcome>, EditorError> {
        if self.owner != PipelineOwner::Idle {
            return Ok(None);
        }
        match self.debouncer.poll(now) {
            Some(text) => self.apply_text(&text).map(Some),
            None => Ok(None),
        }
    }

    /// Sanitize `text` and reconcile it into the live tree. On failure the
    /// tree is left as it was; diagnostics are updated either way.
    pub fn apply_text(&mut self, text: &str) -> Result<TextSyncOutcome, EditorError> {
        self.ensure_idle()?;
        if text == self.last_synced {
            debug!("text matches the canvas, nothing to sync");
            return Ok(TextSyncOutcome::Unchanged);
        }

        self.set_owner(PipelineOwner::TextSync);
        let result = self.sync_text(text);
        self.set_owner(PipelineOwner::Idle);

        if let Err(err) = &result {
            warn!(error = %err, "text sync rejected, canvas unchanged");
        }
        result
    }

    fn sync_text(&mut self, text: &str) -> Result<TextSyncOutcome, EditorError> {
        self.diagnostics = diagnose(text);
        let sanitized = sanitize(text)?;

        let live = self.document.take_root();
        let Reconciled { tree, report } = reconcile(live, &sanitized.tree.children);
        self.document.replace_root(tree);
        self.last_synced = text.to_string();

        info!(
            created = report.created.len(),
            updated = report.updated.len(),
            removed = report.removed.len(),
            version = self.document.version,
            "text synced to canvas"
        );
        Ok(TextSyncOutcome::Applied {
            report,
            warnings: sanitized.warnings,
        })
    }

    // ---- canvas → text ----

    /// Start dragging the selection. `bounds` is the selection's current box.
    pub fn begin_transform(
        &mut self,
        mode: TransformMode,
        handle: Option<Handle>,
        point: Point,
        bounds: BoundingBox,
    ) -> Result<(), EditorError> {
        self.ensure_idle()?;
        if self.document.selection().is_empty() {
            return Err(EditorError::EmptySelection);
        }

        self.controller.start(mode, handle, point, bounds)?;
        self.set_owner(PipelineOwner::Transform);
        Ok(())
    }

    /// Preview for the pointer at `point`. The tree is not touched.
    pub fn update_transform(
        &mut self,
        point: Point,
        constraints: Constraints,
        context: &SnapContext<'_>,
    ) -> Result<TransformUpdate, EditorError> {
        Ok(self.controller.update(point, constraints, context)?)
    }

    /// Guide lines for the snap applied by the last update, drawn around
    /// `bounds` (the unsnapped box).
    pub fn snap_guides(&self, bounds: &BoundingBox) -> Vec<SnapGuide> {
        snap_guides(&self.controller.current_snap(), bounds)
    }

    /// Write the final transform onto the selection, record it in history
    /// and refresh the canonical text.
    pub fn commit_transform(&mut self, context: &SnapContext<'_>) -> Result<Command, EditorError> {
        let update = self.controller.end(context)?;
        self.set_owner(PipelineOwner::Idle);

        let command = Command::Transform {
            shape_ids: self.document.selection().to_vec(),
            matrix: update.matrix,
            bounds: update.bounds,
        };
        self.document.execute(command.clone())?;
        self.refresh_text();

        info!(matrix = %update.matrix, version = self.document.version, "transform committed");
        Ok(command)
    }

    /// Abandon the drag. Returns false if none was running.
    pub fn cancel_transform(&mut self) -> bool {
        let cancelled = self.controller.cancel();
        if self.owner == PipelineOwner::Transform {
            self.set_owner(PipelineOwner::Idle);
        }
        cancelled
    }

    pub fn is_transforming(&self) -> bool {
        self.controller.is_transforming()
    }

    /// Add a shape to the root container. The shape is sanitized first.
    pub fn create_shape(&mut self, shape: SafeElement) -> Result<Command, EditorError> {
        self.ensure_idle()?;
        let shape = sanitize_shape(&shape)?;
        self.run(Command::Create { shape })
    }

    pub fn delete_shapes(&mut self, shape_ids: Vec<String>) -> Result<Command, EditorError> {
        self.ensure_idle()?;
        self.run(Command::Delete { shape_ids })
    }

    pub fn select(&mut self, shape_ids: Vec<String>) -> Result<Command, EditorError> {
        self.ensure_idle()?;
        self.run(Command::Select { shape_ids })
    }

    pub fn undo(&mut self) -> Result<bool, EditorError> {
        self.ensure_idle()?;
        let undone = self.document.undo().is_some();
        if undone {
            self.refresh_text();
        }
        Ok(undone)
    }

    pub fn redo(&mut self) -> Result<bool, EditorError> {
        self.ensure_idle()?;
        let redone = self.document.redo()?.is_some();
        if redone {
            self.refresh_text();
        }
        Ok(redone)
    }

    fn run(&mut self, command: Command) -> Result<Command, EditorError> {
        let edits_tree = command.edits_tree();
        self.document.execute(command.clone())?;
        if edits_tree {
            self.refresh_text();
        }
        Ok(command)
    }

    /// Regenerate the editor text from the live tree.
    fn refresh_text(&mut self) {
        self.canonical_text = canvas_text(self.document.root());
        self.last_synced = self.canonical_text.clone();
        self.diagnostics.clear();
        self.debouncer.cancel();
    }

    fn ensure_idle(&self) -> Result<(), EditorError> {
        match self.owner {
            PipelineOwner::Idle => Ok(()),
            owner => Err(EditorError::PipelineBusy { owner }),
        }
    }

    fn set_owner(&mut self, owner: PipelineOwner) {
        if self.owner != owner {
            info!(from = %self.owner, to = %owner, "pipeline owner changed");
            self.owner = owner;
        }
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

/// Run a single shape through the sanitizer and return its clean form.
fn sanitize_shape(shape: &SafeElement) -> Result<SafeElement, EditorError> {
    let markup = format!("<{tag}>{}</{tag}>", shape.to_markup(), tag = CONTAINER_TAG);
    let sanitized = sanitize(&markup)?;
    for warning in &sanitized.warnings {
        warn!(%warning, "shape adjusted before insert");
    }

    sanitized
        .tree
        .children
        .into_iter()
        .find_map(|node| match node {
            SafeNode::Element(element) => Some(element),
            SafeNode::Text { .. } => None,
        })
        .ok_or_else(|| EditorError::InvalidShape(shape.tag.clone()))
}
