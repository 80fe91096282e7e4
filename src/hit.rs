//! Hit-testing: point queries, marquee intersection, and resize handles.

#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::bounds::bounds;
use crate::consts::HANDLE_RADIUS_PX;
use crate::element::{ElementId, ElementStore};
use crate::geometry::{Point, Rect};

/// One of the eight directional resize handles around a selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeHandle {
    N,
    Ne,
    E,
    Se,
    S,
    Sw,
    W,
    Nw,
}

impl ResizeHandle {
    /// All handles, corners and edge midpoints.
    pub const ALL: [ResizeHandle; 8] = [
        Self::Nw,
        Self::N,
        Self::Ne,
        Self::E,
        Self::Se,
        Self::S,
        Self::Sw,
        Self::W,
    ];

    /// Position of this handle on a bounding box.
    #[must_use]
    pub fn position(self, rect: &Rect) -> Point {
        let cx = rect.x + rect.width / 2.0;
        let cy = rect.y + rect.height / 2.0;
        match self {
            Self::Nw => Point::new(rect.x, rect.y),
            Self::N => Point::new(cx, rect.y),
            Self::Ne => Point::new(rect.right(), rect.y),
            Self::E => Point::new(rect.right(), cy),
            Self::Se => Point::new(rect.right(), rect.bottom()),
            Self::S => Point::new(cx, rect.bottom()),
            Self::Sw => Point::new(rect.x, rect.bottom()),
            Self::W => Point::new(rect.x, cy),
        }
    }

    /// Which edges this handle moves, `(west, north, east, south)`.
    #[must_use]
    pub fn edges(self) -> (bool, bool, bool, bool) {
        match self {
            Self::Nw => (true, true, false, false),
            Self::N => (false, true, false, false),
            Self::Ne => (false, true, true, false),
            Self::E => (false, false, true, false),
            Self::Se => (false, false, true, true),
            Self::S => (false, false, false, true),
            Self::Sw => (true, false, false, true),
            Self::W => (true, false, false, false),
        }
    }
}

/// Topmost element whose bounds contain `point`, iterating in reverse
/// z-order so the last array entry wins. Elements without usable bounds are
/// skipped.
#[must_use]
pub fn element_at(store: &ElementStore, point: Point) -> Option<ElementId> {
    store
        .elements()
        .iter()
        .rev()
        .find(|e| bounds(e).is_some_and(|b| b.contains(point)))
        .map(|e| e.id)
}

/// Every element whose bounds intersect the marquee rectangle, in z-order.
/// Intersection, not containment: a half-covered element is selected.
#[must_use]
pub fn marquee_hits(store: &ElementStore, marquee: &Rect) -> Vec<ElementId> {
    store
        .elements()
        .iter()
        .filter(|e| bounds(e).is_some_and(|b| b.intersects(marquee)))
        .map(|e| e.id)
        .collect()
}

/// The resize handle of `rect` under `canvas_pt`, if any. The hit slop is
/// [`HANDLE_RADIUS_PX`] screen pixels, so it shrinks in canvas units as the
/// zoom grows.
#[must_use]
pub fn handle_at(rect: &Rect, canvas_pt: Point, zoom: f64) -> Option<ResizeHandle> {
    if zoom <= 0.0 {
        return None;
    }
    let slop = HANDLE_RADIUS_PX / zoom;
    ResizeHandle::ALL
        .into_iter()
        .find(|h| h.position(rect).distance_to(canvas_pt) <= slop)
}
