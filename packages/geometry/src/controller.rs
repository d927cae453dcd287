//! # Transform Controller
//!
//! Owns at most one [`TransformSession`] and drives it through
//! `start → update* → end | cancel`.
//!
//! ```rust,ignore
//! let mut controller = TransformController::default();
//! controller.start(TransformMode::Resize, Some(Handle::Se), pointer, bounds)?;
//! let preview = controller.update(moved, Constraints::default(), &context)?;
//! let last = controller.end(&context)?;
//! ```

use crate::error::GeometryError;
use crate::matrix::{BoundingBox, Point};
use crate::snap::SnapResult;
use crate::transform::{
    Handle, SnapContext, SnapSettings, TransformMode, TransformSession, TransformUpdate,
};
use tracing::debug;

/// Modifier keys held during a drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Constraints {
    pub aspect: bool,
    pub angle: bool,
}

impl Constraints {
    pub fn new(aspect: bool, angle: bool) -> Self {
        Self { aspect, angle }
    }
}

#[derive(Debug, Default)]
pub struct TransformController {
    session: Option<TransformSession>,
    settings: SnapSettings,
    last_snap: SnapResult,
}

impl TransformController {
    pub fn new(settings: SnapSettings) -> Self {
        Self {
            session: None,
            settings,
            last_snap: SnapResult::none(),
        }
    }

    pub fn settings(&self) -> &SnapSettings {
        &self.settings
    }

    /// Begin a drag. Fails if one is already running, or if a resize has no
    /// resize handle.
    pub fn start(
        &mut self,
        mode: TransformMode,
        handle: Option<Handle>,
        point: Point,
        bounds: BoundingBox,
    ) -> Result<(), GeometryError> {
        if self.session.is_some() {
            return Err(GeometryError::SessionActive);
        }
        if mode == TransformMode::Resize && !matches!(handle, Some(h) if h != Handle::Rotate) {
            return Err(GeometryError::MissingHandle);
        }

        debug!(?mode, ?handle, x = bounds.x, y = bounds.y, "transform started");
        self.session = Some(TransformSession::new(mode, handle, point, bounds));
        self.last_snap = SnapResult::none();
        Ok(())
    }

    /// Move the pointer. Constraint flags stay on once set for this drag.
    pub fn update(
        &mut self,
        point: Point,
        constraints: Constraints,
        context: &SnapContext<'_>,
    ) -> Result<TransformUpdate, GeometryError> {
        let session = self.session.as_mut().ok_or(GeometryError::NoActiveSession)?;
        session.current_point = point;
        session.constrain_aspect |= constraints.aspect;
        session.constrain_angle |= constraints.angle;

        let update = session.compute(&self.settings, context);
        self.last_snap = update.snap;
        Ok(update)
    }

    /// Finish the drag and return the update for the last pointer position.
    pub fn end(&mut self, context: &SnapContext<'_>) -> Result<TransformUpdate, GeometryError> {
        let session = self.session.take().ok_or(GeometryError::NoActiveSession)?;
        let update = session.compute(&self.settings, context);
        self.last_snap = SnapResult::none();

        debug!(mode = ?session.mode, matrix = %update.matrix, "transform ended");
        Ok(update)
    }

    /// Drop the drag without producing a result.
    pub fn cancel(&mut self) -> bool {
        self.last_snap = SnapResult::none();
        self.session.take().is_some()
    }

    pub fn is_transforming(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&TransformSession> {
        self.session.as_ref()
    }

    /// Snap applied by the most recent `update`.
    pub fn current_snap(&self) -> SnapResult {
        self.last_snap
    }
}
