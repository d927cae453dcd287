//! # RoughRefine Geometry
//!
//! Affine matrices, bounding boxes, proximity snapping and the
//! handle-driven transform sessions used for direct manipulation on the
//! canvas. All inputs are passed explicitly; nothing here reads global
//! state.

mod controller;
mod error;
mod matrix;
mod snap;
mod transform;

pub use controller::{Constraints, TransformController};
pub use error::GeometryError;
pub use matrix::{
    constrain_angle, degrees_to_radians, radians_to_degrees, BoundingBox, Matrix, Point,
};
pub use snap::{
    snap, snap_guides, snap_with_threshold, SnapCandidate, SnapGuide, SnapKind, SnapResult,
    DEFAULT_SNAP_THRESHOLD,
};
pub use transform::{
    move_by, resize, resize_params, rotate, Handle, ResizeParams, SnapContext, SnapSettings,
    TransformMode, TransformSession, TransformUpdate,
};
