//! Proximity snapping against sibling shapes.
//!
//! The threshold is a constant screen distance, so it shrinks in document
//! units as the zoom grows.

use crate::matrix::BoundingBox;
use serde::{Deserialize, Serialize};

/// Screen-space snap distance at zoom 1.
pub const DEFAULT_SNAP_THRESHOLD: f64 = 6.0;

/// How far a guide line reaches past the dragged box.
const GUIDE_OVERHANG: f64 = 20.0;

/// A sibling shape that can be aligned against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapCandidate {
    pub id: String,
    pub bounds: BoundingBox,
}

impl SnapCandidate {
    pub fn new(id: impl Into<String>, bounds: BoundingBox) -> Self {
        Self {
            id: id.into(),
            bounds,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SnapKind {
    EdgeX,
    CenterX,
    EdgeY,
    CenterY,
    #[default]
    None,
}

impl SnapKind {
    pub fn is_x(self) -> bool {
        matches!(self, SnapKind::EdgeX | SnapKind::CenterX)
    }

    pub fn is_y(self) -> bool {
        matches!(self, SnapKind::EdgeY | SnapKind::CenterY)
    }
}

/// Adjustment on at most one axis.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SnapResult {
    pub dx: f64,
    pub dy: f64,
    pub kind: SnapKind,
    pub distance: f64,
}

impl SnapResult {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn is_snapped(&self) -> bool {
        self.kind != SnapKind::None
    }
}

/// Guide line to draw for a snap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapGuide {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    pub label: String,
}

/// Snap with the default screen threshold.
pub fn snap(
    bounds: &BoundingBox,
    exclude_ids: &[String],
    candidates: &[SnapCandidate],
    zoom: f64,
) -> SnapResult {
    snap_with_threshold(bounds, exclude_ids, candidates, DEFAULT_SNAP_THRESHOLD / zoom)
}

/// Best alignment within `threshold` document units.
///
/// Alignments are scanned per candidate in a fixed order (near x edge, far x
/// edge, x center, near y edge, far y edge, y center); the first one found
/// wins a tie.
pub fn snap_with_threshold(
    bounds: &BoundingBox,
    exclude_ids: &[String],
    candidates: &[SnapCandidate],
    threshold: f64,
) -> SnapResult {
    let mut best: Option<SnapResult> = None;

    for neighbor in candidates.iter().filter(|c| !exclude_ids.contains(&c.id)) {
        let other = &neighbor.bounds;
        let alignments = [
            (SnapKind::EdgeX, other.x - bounds.x, 0.0),
            (SnapKind::EdgeX, other.right() - bounds.right(), 0.0),
            (SnapKind::CenterX, other.center().x - bounds.center().x, 0.0),
            (SnapKind::EdgeY, 0.0, other.y - bounds.y),
            (SnapKind::EdgeY, 0.0, other.bottom() - bounds.bottom()),
            (SnapKind::CenterY, 0.0, other.center().y - bounds.center().y),
        ];

        for (kind, dx, dy) in alignments {
            let distance = dx.abs() + dy.abs();
            let closer = best.map_or(true, |b| distance < b.distance);
            if distance <= threshold && closer {
                best = Some(SnapResult {
                    dx,
                    dy,
                    kind,
                    distance,
                });
            }
        }
    }

    best.unwrap_or_default()
}

/// Guide lines for a snap applied to `bounds` (the pre-snap box).
pub fn snap_guides(result: &SnapResult, bounds: &BoundingBox) -> Vec<SnapGuide> {
    let label = |kind: SnapKind| {
        if matches!(kind, SnapKind::CenterX | SnapKind::CenterY) {
            "Center".to_string()
        } else {
            "Edge".to_string()
        }
    };

    let mut guides = Vec::new();
    if result.kind.is_x() {
        let x = if result.kind == SnapKind::CenterX {
            bounds.center().x + result.dx
        } else {
            bounds.x + result.dx
        };
        guides.push(SnapGuide {
            x1: x,
            y1: bounds.y - GUIDE_OVERHANG,
            x2: x,
            y2: bounds.bottom() + GUIDE_OVERHANG,
            label: label(result.kind),
        });
    }
    if result.kind.is_y() {
        let y = if result.kind == SnapKind::CenterY {
            bounds.center().y + result.dy
        } else {
            bounds.y + result.dy
        };
        guides.push(SnapGuide {
            x1: bounds.x - GUIDE_OVERHANG,
            y1: y,
            x2: bounds.right() + GUIDE_OVERHANG,
            y2: y,
            label: label(result.kind),
        });
    }
    guides
}
