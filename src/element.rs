//! Scene data model: canvas elements and the element store.
//!
//! This module defines the tagged element sum type (`Element` with a flattened
//! [`Shape`] discriminated by `type` on the wire), connector anchors
//! ([`AnchorRef`], [`Side`]), and the runtime store that owns all live
//! elements ([`ElementStore`]).
//!
//! Data flows into this layer from persistence (JSON deserialization of the
//! element array) and from the interaction engine (mutations). Z-order is
//! defined purely by array position: the last element is topmost for both
//! rendering and hit-testing, so the store keeps a `Vec`, never a map.

#[cfg(test)]
#[path = "element_test.rs"]
mod element_test;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geometry::Point;

/// Unique identifier for a canvas element.
pub type ElementId = Uuid;

/// Identifier shared by all members of a group.
pub type GroupId = Uuid;

/// One side of an element's bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Top,
    Right,
    Bottom,
    Left,
}

/// A connector endpoint bound to another element's edge midpoint.
///
/// The `element_id` is a non-owning reference resolved by lookup in the
/// current store; if the referent has been deleted the anchor is stale and
/// the endpoint freezes at its last resolved position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnchorRef {
    /// Id of the element this endpoint is attached to.
    pub element_id: ElementId,
    /// Which edge midpoint of the referent's bounds the endpoint resolves to.
    pub side: Side,
}

/// Type-specific geometry and payload of an element.
///
/// Flattened into [`Element`] on the wire with a `type` discriminant, so a
/// persisted rectangle reads `{"id": ..., "type": "rectangle", "x": ...,
/// "width": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Shape {
    /// Freehand polyline through `points`, in canvas coordinates.
    Path { points: Vec<Point> },
    /// Axis-aligned rectangle. Width/height may be signed mid-creation.
    Rectangle { width: f64, height: f64 },
    /// Circle centered on the element's `(x, y)`.
    Circle { radius: f64 },
    /// Straight segment from `(x, y)` to `(x + width, y + height)`.
    Line { width: f64, height: f64 },
    /// Directed connector from `(x, y)` to `(x + width, y + height)`,
    /// optionally anchored to other elements at either end.
    Arrow {
        width: f64,
        height: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        anchor_start: Option<AnchorRef>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        anchor_end: Option<AnchorRef>,
    },
    /// Text whose `(x, y)` is the baseline start; size is derived from the
    /// content, never stored.
    Text { text: String, font_size: f64 },
    /// Embedded reference to another space (document) in the workspace.
    SpaceEmbed { width: f64, height: f64, space_id: String, label: String },
    /// Embedded reference to a content block, usually from another space.
    BlockEmbed {
        width: f64,
        height: f64,
        block_id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        source_space_id: Option<String>,
        label: String,
    },
}

/// A canvas element as stored in the scene and on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    /// Unique identifier, immutable for the element's lifetime.
    pub id: ElementId,
    /// Origin / anchor position in canvas units; exact meaning varies by
    /// shape (top-left, center, endpoint, or baseline start).
    pub x: f64,
    /// See `x`.
    pub y: f64,
    /// Stroke (and fill, where applicable) color as a CSS color string.
    pub color: String,
    /// Stroke width in canvas units.
    pub stroke_width: f64,
    /// Group membership tag; absent means ungrouped.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<GroupId>,
    /// Type-specific geometry and payload.
    #[serde(flatten)]
    pub shape: Shape,
}

impl Element {
    /// Create an element with a fresh id at the given position.
    #[must_use]
    pub fn new(x: f64, y: f64, color: String, stroke_width: f64, shape: Shape) -> Self {
        Self { id: Uuid::new_v4(), x, y, color, stroke_width, group_id: None, shape }
    }

    /// Translate the element by `(dx, dy)`.
    ///
    /// For paths every point moves; every other shape moves through its
    /// origin. Anchored arrow endpoints are deliberately not special-cased
    /// here; the anchor cascade in [`crate::anchor`] owns that rule.
    pub fn translate(&mut self, dx: f64, dy: f64) {
        self.x += dx;
        self.y += dy;
        if let Shape::Path { points } = &mut self.shape {
            for p in points {
                p.x += dx;
                p.y += dy;
            }
        }
    }

    /// The anchors of an arrow, `(start, end)`. Non-arrows have none.
    #[must_use]
    pub fn anchors(&self) -> (Option<AnchorRef>, Option<AnchorRef>) {
        match &self.shape {
            Shape::Arrow { anchor_start, anchor_end, .. } => (*anchor_start, *anchor_end),
            _ => (None, None),
        }
    }

    /// Whether either arrow anchor references an id for which `is_moved`
    /// returns true. Always false for non-arrows.
    pub fn anchored_to(&self, is_moved: impl Fn(ElementId) -> bool) -> bool {
        let (start, end) = self.anchors();
        start.is_some_and(|a| is_moved(a.element_id)) || end.is_some_and(|a| is_moved(a.element_id))
    }
}

/// In-memory store of canvas elements, in z-order (last = topmost).
#[derive(Debug, Default)]
pub struct ElementStore {
    elements: Vec<Element>,
}

impl ElementStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self { elements: Vec::new() }
    }

    /// All elements in z-order, bottom first.
    #[must_use]
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Deep copy of the element array, used for history snapshots.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Element> {
        self.elements.clone()
    }

    /// Insert an element on top of the z-order. If an element with the same
    /// id already exists it is replaced in place, keeping its z position.
    pub fn insert(&mut self, element: Element) {
        if let Some(existing) = self.get_mut(element.id) {
            *existing = element;
        } else {
            self.elements.push(element);
        }
    }

    /// Remove an element by id, returning it if it was present.
    pub fn remove(&mut self, id: ElementId) -> Option<Element> {
        let idx = self.elements.iter().position(|e| e.id == id)?;
        Some(self.elements.remove(idx))
    }

    /// Remove every element whose id satisfies the predicate.
    pub fn remove_where(&mut self, mut pred: impl FnMut(&Element) -> bool) {
        self.elements.retain(|e| !pred(e));
    }

    /// Return a reference to an element by id.
    #[must_use]
    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.iter().find(|e| e.id == id)
    }

    /// Return a mutable reference to an element by id.
    pub fn get_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.elements.iter_mut().find(|e| e.id == id)
    }

    #[must_use]
    pub fn contains(&self, id: ElementId) -> bool {
        self.get(id).is_some()
    }

    /// Ids of every element sharing the given group tag.
    #[must_use]
    pub fn group_members(&self, group: GroupId) -> Vec<ElementId> {
        self.elements
            .iter()
            .filter(|e| e.group_id == Some(group))
            .map(|e| e.id)
            .collect()
    }

    /// Replace all elements with a full snapshot, preserving snapshot order.
    /// Duplicate ids are collapsed, last occurrence wins.
    pub fn load_snapshot(&mut self, elements: Vec<Element>) {
        self.elements.clear();
        for element in elements {
            self.insert(element);
        }
    }

    /// Remove every element.
    pub fn clear(&mut self) {
        self.elements.clear();
    }

    /// Number of elements currently in the store.
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns `true` if the store contains no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub(crate) fn elements_mut(&mut self) -> &mut Vec<Element> {
        &mut self.elements
    }
}
