//! Connector anchoring: side midpoints, closest-side snapping, and the
//! anchor cascade that keeps arrows glued to the elements they reference.
//!
//! Anchors are non-owning id references resolved against the current store on
//! every use. A stale anchor (referent deleted, or referent with degenerate
//! bounds) is skipped, freezing the endpoint at its last resolved position.

#[cfg(test)]
#[path = "anchor_test.rs"]
mod anchor_test;

use crate::bounds::bounds;
use crate::element::{AnchorRef, Element, ElementId, ElementStore, Shape, Side};
use crate::geometry::{Point, Rect};

/// Midpoint of one side of a bounding box.
#[must_use]
pub fn side_point(rect: &Rect, side: Side) -> Point {
    match side {
        Side::Top => Point::new(rect.x + rect.width / 2.0, rect.y),
        Side::Right => Point::new(rect.right(), rect.y + rect.height / 2.0),
        Side::Bottom => Point::new(rect.x + rect.width / 2.0, rect.bottom()),
        Side::Left => Point::new(rect.x, rect.y + rect.height / 2.0),
    }
}

/// The four side midpoints of a bounding box as `(side, point)` pairs.
#[must_use]
pub fn side_points(rect: &Rect) -> [(Side, Point); 4] {
    [Side::Top, Side::Right, Side::Bottom, Side::Left].map(|s| (s, side_point(rect, s)))
}

/// The side of `element` whose midpoint is Euclidean-nearest to `point`.
/// `None` when the element has no usable bounds.
#[must_use]
pub fn closest_side(point: Point, element: &Element) -> Option<(Side, Point)> {
    let rect = bounds(element)?;
    side_points(&rect)
        .into_iter()
        .min_by(|(_, a), (_, b)| point.distance_to(*a).total_cmp(&point.distance_to(*b)))
}

/// Current canvas position of one arrow endpoint: the referent's side
/// midpoint when anchored and resolvable, the stored coordinate otherwise.
#[must_use]
pub fn resolve_endpoint(store: &ElementStore, anchor: Option<AnchorRef>, stored: Point) -> Point {
    anchor
        .and_then(|a| {
            let referent = store.get(a.element_id)?;
            Some(side_point(&bounds(referent)?, a.side))
        })
        .unwrap_or(stored)
}

/// Re-resolve every arrow whose anchor references an element in `moved`,
/// writing the anchored endpoints back to the referents' current side
/// midpoints. Unanchored endpoints keep their absolute positions.
///
/// Two-phase: endpoint targets are computed against the immutable store
/// first, then applied, so referent bounds are read post-move and arrows
/// never observe a half-updated frame.
pub fn cascade_moved(store: &mut ElementStore, moved: &[ElementId]) {
    let is_moved = |id: ElementId| moved.contains(&id);

    let mut updates: Vec<(ElementId, Point, Point)> = Vec::new();
    for element in store.elements() {
        if !element.anchored_to(is_moved) {
            continue;
        }
        let Shape::Arrow { width, height, anchor_start, anchor_end } = &element.shape else {
            continue;
        };
        let start = Point::new(element.x, element.y);
        let end = Point::new(element.x + width, element.y + height);
        let new_start = resolve_anchor_if_moved(store, *anchor_start, start, is_moved);
        let new_end = resolve_anchor_if_moved(store, *anchor_end, end, is_moved);
        updates.push((element.id, new_start, new_end));
    }

    for (id, start, end) in updates {
        if let Some(arrow) = store.get_mut(id) {
            apply_endpoints(arrow, start, end);
        }
    }
}

fn resolve_anchor_if_moved(
    store: &ElementStore,
    anchor: Option<AnchorRef>,
    stored: Point,
    is_moved: impl Fn(ElementId) -> bool,
) -> Point {
    match anchor {
        Some(a) if is_moved(a.element_id) => resolve_endpoint(store, Some(a), stored),
        _ => stored,
    }
}

/// Write absolute endpoints back into an arrow's `(x, y, width, height)`
/// encoding. No-op for non-arrows.
pub fn apply_endpoints(arrow: &mut Element, start: Point, end: Point) {
    if let Shape::Arrow { width, height, .. } = &mut arrow.shape {
        arrow.x = start.x;
        arrow.y = start.y;
        *width = end.x - start.x;
        *height = end.y - start.y;
    }
}
