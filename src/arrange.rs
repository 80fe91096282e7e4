//! Structural arrangement: z-order moves and group membership.

#[cfg(test)]
#[path = "arrange_test.rs"]
mod arrange_test;

use uuid::Uuid;

use crate::element::{ElementId, ElementStore, GroupId};

/// Move the named elements to the top of the z-order.
///
/// Stable partition: the relative order inside both the moved set and the
/// remainder is preserved, which also makes the operation idempotent.
pub fn bring_to_front(store: &mut ElementStore, ids: &[ElementId]) {
    let elements = store.elements_mut();
    let (others, selected): (Vec<_>, Vec<_>) =
        elements.drain(..).partition(|e| !ids.contains(&e.id));
    elements.extend(others);
    elements.extend(selected);
}

/// Move the named elements to the bottom of the z-order. Stable, idempotent.
pub fn send_to_back(store: &mut ElementStore, ids: &[ElementId]) {
    let elements = store.elements_mut();
    let (selected, others): (Vec<_>, Vec<_>) =
        elements.drain(..).partition(|e| ids.contains(&e.id));
    elements.extend(selected);
    elements.extend(others);
}

/// Tag the named elements with a freshly generated group id, overwriting any
/// prior membership. Returns the new id, or `None` when fewer than two of
/// the ids exist in the store (a one-element group is never created).
pub fn group(store: &mut ElementStore, ids: &[ElementId]) -> Option<GroupId> {
    let existing: Vec<ElementId> = ids.iter().copied().filter(|id| store.contains(*id)).collect();
    if existing.len() < 2 {
        return None;
    }
    let group_id = Uuid::new_v4();
    for id in existing {
        if let Some(element) = store.get_mut(id) {
            element.group_id = Some(group_id);
        }
    }
    Some(group_id)
}

/// Strip group membership from every element carrying any group id touched
/// by the named elements. Ungrouping is a full-group operation: naming one
/// member dissolves the whole group, so a group id never survives on a
/// partial subset.
pub fn ungroup(store: &mut ElementStore, ids: &[ElementId]) {
    let touched: Vec<GroupId> = ids
        .iter()
        .filter_map(|id| store.get(*id).and_then(|e| e.group_id))
        .collect();
    if touched.is_empty() {
        return;
    }
    for element in store.elements_mut() {
        if element.group_id.is_some_and(|g| touched.contains(&g)) {
            element.group_id = None;
        }
    }
}
