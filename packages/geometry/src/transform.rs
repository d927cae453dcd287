//! # Direct manipulation
//!
//! Turns a pointer drag into a matrix and the resulting bounds.
//!
//! Every computation starts from the axis-aligned bounds captured when the
//! drag began. A rotation already applied to the shape is not taken into
//! account when resizing.

use crate::error::GeometryError;
use crate::matrix::{constrain_angle, BoundingBox, Matrix, Point};
use crate::snap::{snap_with_threshold, SnapCandidate, SnapResult, DEFAULT_SNAP_THRESHOLD};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Resize and rotate control points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Handle {
    Nw,
    N,
    Ne,
    E,
    Se,
    S,
    Sw,
    W,
    Rotate,
}

impl Handle {
    pub const RESIZE: [Handle; 8] = [
        Handle::Nw,
        Handle::N,
        Handle::Ne,
        Handle::E,
        Handle::Se,
        Handle::S,
        Handle::Sw,
        Handle::W,
    ];

    pub fn is_corner(self) -> bool {
        matches!(self, Handle::Nw | Handle::Ne | Handle::Se | Handle::Sw)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Handle::Nw => "nw",
            Handle::N => "n",
            Handle::Ne => "ne",
            Handle::E => "e",
            Handle::Se => "se",
            Handle::S => "s",
            Handle::Sw => "sw",
            Handle::W => "w",
            Handle::Rotate => "rotate",
        }
    }
}

impl FromStr for Handle {
    type Err = GeometryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Handle::RESIZE
            .into_iter()
            .chain([Handle::Rotate])
            .find(|handle| handle.as_str() == s)
            .ok_or_else(|| GeometryError::UnknownHandle(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransformMode {
    Move,
    Resize,
    Rotate,
}

/// Tunables for snapping and constraints.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapSettings {
    /// Snap distance in screen pixels at zoom 1
    pub base_threshold: f64,

    /// Rotation increment when the angle is constrained
    pub angle_step_degrees: f64,

    /// Smallest scale magnitude a resize may reach
    pub min_scale: f64,
}

impl Default for SnapSettings {
    fn default() -> Self {
        Self {
            base_threshold: DEFAULT_SNAP_THRESHOLD,
            angle_step_degrees: 15.0,
            min_scale: 0.1,
        }
    }
}

impl SnapSettings {
    pub fn threshold(&self, zoom: f64) -> f64 {
        self.base_threshold / zoom
    }
}

/// Neighbouring shapes and zoom for one snap query.
#[derive(Debug, Clone, Copy)]
pub struct SnapContext<'a> {
    pub candidates: &'a [SnapCandidate],
    pub exclude_ids: &'a [String],
    pub zoom: f64,
}

impl<'a> SnapContext<'a> {
    pub fn new(candidates: &'a [SnapCandidate], exclude_ids: &'a [String], zoom: f64) -> Self {
        Self {
            candidates,
            exclude_ids,
            zoom,
        }
    }

    /// No neighbours: moves are never adjusted.
    pub fn empty() -> Self {
        Self {
            candidates: &[],
            exclude_ids: &[],
            zoom: 1.0,
        }
    }
}

/// State of one pointer drag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformSession {
    pub mode: TransformMode,
    pub handle: Option<Handle>,
    pub start_bounds: BoundingBox,
    pub start_point: Point,
    pub current_point: Point,
    pub constrain_aspect: bool,
    pub constrain_angle: bool,
}

/// Matrix and bounds for the current pointer position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransformUpdate {
    pub matrix: Matrix,
    pub bounds: BoundingBox,
    pub snap: SnapResult,
}

/// Scale factors and the fixed point of a resize.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeParams {
    pub scale_x: f64,
    pub scale_y: f64,
    pub origin: Point,
}

impl TransformSession {
    pub fn new(
        mode: TransformMode,
        handle: Option<Handle>,
        start_point: Point,
        start_bounds: BoundingBox,
    ) -> Self {
        Self {
            mode,
            handle,
            start_bounds,
            start_point,
            current_point: start_point,
            constrain_aspect: false,
            constrain_angle: false,
        }
    }

    pub fn with_constraints(mut self, constrain_aspect: bool, constrain_angle: bool) -> Self {
        self.constrain_aspect = constrain_aspect;
        self.constrain_angle = constrain_angle;
        self
    }

    /// Matrix and bounds for `current_point`.
    pub fn compute(&self, settings: &SnapSettings, context: &SnapContext<'_>) -> TransformUpdate {
        let dx = self.current_point.x - self.start_point.x;
        let dy = self.current_point.y - self.start_point.y;

        match self.mode {
            TransformMode::Move => move_by(&self.start_bounds, dx, dy, settings, context),
            TransformMode::Resize => match self.handle.filter(|h| *h != Handle::Rotate) {
                Some(handle) => {
                    let params = resize_params(
                        handle,
                        &self.start_bounds,
                        dx,
                        dy,
                        self.constrain_aspect,
                        settings.min_scale,
                    );
                    resize(&self.start_bounds, &params)
                }
                None => unchanged(&self.start_bounds),
            },
            TransformMode::Rotate => {
                let step = self.constrain_angle.then_some(settings.angle_step_degrees);
                rotate(&self.start_bounds, self.start_point, self.current_point, step)
            }
        }
    }
}

fn unchanged(bounds: &BoundingBox) -> TransformUpdate {
    TransformUpdate {
        matrix: Matrix::identity(),
        bounds: *bounds,
        snap: SnapResult::none(),
    }
}

/// Translate by the pointer delta plus the snap adjustment.
pub fn move_by(
    start: &BoundingBox,
    dx: f64,
    dy: f64,
    settings: &SnapSettings,
    context: &SnapContext<'_>,
) -> TransformUpdate {
    let moved = start.translated(dx, dy);
    let snap = snap_with_threshold(
        &moved,
        context.exclude_ids,
        context.candidates,
        settings.threshold(context.zoom),
    );

    let (dx, dy) = (dx + snap.dx, dy + snap.dy);
    TransformUpdate {
        matrix: Matrix::translate(dx, dy),
        bounds: start.translated(dx, dy),
        snap,
    }
}

/// Scale factors for dragging `handle` by `(dx, dy)`. The origin is the
/// point opposite the handle.
pub fn resize_params(
    handle: Handle,
    start: &BoundingBox,
    dx: f64,
    dy: f64,
    constrain_aspect: bool,
    min_scale: f64,
) -> ResizeParams {
    let grow = |extent: f64, delta: f64| {
        if extent == 0.0 {
            1.0
        } else {
            (extent + delta) / extent
        }
    };
    let center = start.center();

    let (mut scale_x, mut scale_y, origin) = match handle {
        Handle::Nw => (
            grow(start.width, -dx),
            grow(start.height, -dy),
            Point::new(start.right(), start.bottom()),
        ),
        Handle::Ne => (
            grow(start.width, dx),
            grow(start.height, -dy),
            Point::new(start.x, start.bottom()),
        ),
        Handle::Se => (
            grow(start.width, dx),
            grow(start.height, dy),
            Point::new(start.x, start.y),
        ),
        Handle::Sw => (
            grow(start.width, -dx),
            grow(start.height, dy),
            Point::new(start.right(), start.y),
        ),
        Handle::N => (1.0, grow(start.height, -dy), Point::new(center.x, start.bottom())),
        Handle::S => (1.0, grow(start.height, dy), Point::new(center.x, start.y)),
        Handle::W => (grow(start.width, -dx), 1.0, Point::new(start.right(), center.y)),
        Handle::E => (grow(start.width, dx), 1.0, Point::new(start.x, center.y)),
        Handle::Rotate => (1.0, 1.0, center),
    };

    if constrain_aspect && handle.is_corner() {
        let average = (scale_x.abs() + scale_y.abs()) / 2.0;
        scale_x = average.copysign(scale_x);
        scale_y = average.copysign(scale_y);
    }

    ResizeParams {
        scale_x: scale_x.abs().max(min_scale).copysign(scale_x),
        scale_y: scale_y.abs().max(min_scale).copysign(scale_y),
        origin,
    }
}

/// `translate(origin) · scale · translate(-origin)` and the box around the
/// scaled corners.
pub fn resize(start: &BoundingBox, params: &ResizeParams) -> TransformUpdate {
    let matrix = Matrix::scale(params.scale_x, params.scale_y).about(params.origin);
    TransformUpdate {
        matrix,
        bounds: start.transformed(&matrix),
        snap: SnapResult::none(),
    }
}

/// Rotation about the box center by the angle swept from `start_point` to
/// `current_point`, optionally snapped to `step_degrees`.
pub fn rotate(
    start: &BoundingBox,
    start_point: Point,
    current_point: Point,
    step_degrees: Option<f64>,
) -> TransformUpdate {
    let center = start.center();
    let start_angle = (start_point.y - center.y).atan2(start_point.x - center.x);
    let current_angle = (current_point.y - center.y).atan2(current_point.x - center.x);

    let mut angle = current_angle - start_angle;
    if let Some(step) = step_degrees {
        angle = constrain_angle(angle, step);
    }

    let matrix = Matrix::rotate(angle).about(center);
    TransformUpdate {
        matrix,
        bounds: start.transformed(&matrix),
        snap: SnapResult::none(),
    }
}
