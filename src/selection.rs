//! Selection state and its click / shift / marquee semantics.
//!
//! A group is a rigid co-selection unit: any path into the selection (click,
//! shift-click, marquee) expands to the full group, so a group is always
//! either fully selected or fully unselected.

#[cfg(test)]
#[path = "selection_test.rs"]
mod selection_test;

use crate::bounds::bounds;
use crate::element::{ElementId, ElementStore};
use crate::geometry::Rect;

/// The set of currently selected element ids, in selection order.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    ids: Vec<ElementId>,
}

impl Selection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Selected ids in the order they were added.
    #[must_use]
    pub fn ids(&self) -> &[ElementId] {
        &self.ids
    }

    #[must_use]
    pub fn contains(&self, id: ElementId) -> bool {
        self.ids.contains(&id)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Drop ids that no longer exist in the store (after deletes or undo).
    pub fn retain_existing(&mut self, store: &ElementStore) {
        self.ids.retain(|id| store.contains(*id));
    }

    /// Apply a click on `id`. The clicked element expands to its full group.
    ///
    /// Plain click replaces the selection. Shift-click toggles: a unit that
    /// is already fully selected is removed, anything else is unioned in.
    pub fn click(&mut self, store: &ElementStore, id: ElementId, shift: bool) {
        let unit = expand_to_group(store, id);
        if shift {
            if unit.iter().all(|i| self.contains(*i)) {
                self.ids.retain(|i| !unit.contains(i));
            } else {
                self.extend_missing(unit);
            }
        } else {
            self.ids = unit;
        }
    }

    /// Replace the selection with a marquee result, expanded to full groups.
    /// With `additive` the prior selection is kept and unioned.
    pub fn apply_marquee(&mut self, store: &ElementStore, hits: &[ElementId], prior: &[ElementId], additive: bool) {
        self.ids = if additive { prior.to_vec() } else { Vec::new() };
        for id in hits {
            self.extend_missing(expand_to_group(store, *id));
        }
    }

    /// Union bounds of the selected elements; `None` when nothing selected
    /// or no member has usable bounds.
    #[must_use]
    pub fn bounds(&self, store: &ElementStore) -> Option<Rect> {
        self.ids
            .iter()
            .filter_map(|id| store.get(*id))
            .filter_map(bounds)
            .reduce(|acc, r| acc.union(&r))
    }

    fn extend_missing(&mut self, unit: Vec<ElementId>) {
        for id in unit {
            if !self.contains(id) {
                self.ids.push(id);
            }
        }
    }
}

/// The full co-selection unit for an element: its group members when
/// grouped, just itself otherwise.
#[must_use]
pub fn expand_to_group(store: &ElementStore, id: ElementId) -> Vec<ElementId> {
    match store.get(id).and_then(|e| e.group_id) {
        Some(group) => store.group_members(group),
        None => vec![id],
    }
}
