#![allow(clippy::clone_on_copy, clippy::float_cmp)]

use super::*;

fn rect_element(x: f64, y: f64, w: f64, h: f64) -> Element {
    Element::new(x, y, "#000".to_owned(), 1.0, Shape::Rectangle { width: w, height: h })
}

fn arrow_between(
    start: Point,
    end: Point,
    anchor_start: Option<AnchorRef>,
    anchor_end: Option<AnchorRef>,
) -> Element {
    Element::new(
        start.x,
        start.y,
        "#000".to_owned(),
        1.0,
        Shape::Arrow {
            width: end.x - start.x,
            height: end.y - start.y,
            anchor_start,
            anchor_end,
        },
    )
}

fn arrow_endpoints(e: &Element) -> (Point, Point) {
    let Shape::Arrow { width, height, .. } = &e.shape else {
        panic!("expected arrow");
    };
    (Point::new(e.x, e.y), Point::new(e.x + width, e.y + height))
}

// =============================================================
// Side points
// =============================================================

#[test]
fn side_points_are_edge_midpoints() {
    let r = Rect::new(0.0, 0.0, 100.0, 50.0);
    assert_eq!(side_point(&r, Side::Top), Point::new(50.0, 0.0));
    assert_eq!(side_point(&r, Side::Right), Point::new(100.0, 25.0));
    assert_eq!(side_point(&r, Side::Bottom), Point::new(50.0, 50.0));
    assert_eq!(side_point(&r, Side::Left), Point::new(0.0, 25.0));
}

#[test]
fn side_points_enumerates_all_four() {
    let r = Rect::new(0.0, 0.0, 10.0, 10.0);
    let sides: Vec<Side> = side_points(&r).into_iter().map(|(s, _)| s).collect();
    assert_eq!(sides, vec![Side::Top, Side::Right, Side::Bottom, Side::Left]);
}

#[test]
fn closest_side_picks_nearest_midpoint() {
    let e = rect_element(0.0, 0.0, 100.0, 100.0);
    let (side, point) = closest_side(Point::new(95.0, 50.0), &e).unwrap();
    assert_eq!(side, Side::Right);
    assert_eq!(point, Point::new(100.0, 50.0));
}

#[test]
fn closest_side_of_degenerate_element_is_none() {
    let broken = Element::new(0.0, 0.0, "#000".to_owned(), 1.0, Shape::Path { points: Vec::new() });
    assert!(closest_side(Point::new(0.0, 0.0), &broken).is_none());
}

// =============================================================
// Endpoint resolution
// =============================================================

#[test]
fn resolve_endpoint_follows_anchor() {
    let target = rect_element(200.0, 0.0, 100.0, 100.0);
    let anchor = AnchorRef { element_id: target.id, side: Side::Left };
    let mut store = ElementStore::new();
    store.insert(target);
    let resolved = resolve_endpoint(&store, Some(anchor), Point::new(0.0, 0.0));
    assert_eq!(resolved, Point::new(200.0, 50.0));
}

#[test]
fn resolve_endpoint_without_anchor_keeps_stored() {
    let store = ElementStore::new();
    let stored = Point::new(7.0, 8.0);
    assert_eq!(resolve_endpoint(&store, None, stored), stored);
}

#[test]
fn stale_anchor_freezes_at_stored_position() {
    let store = ElementStore::new();
    let stale = AnchorRef { element_id: uuid::Uuid::new_v4(), side: Side::Top };
    let stored = Point::new(3.0, 4.0);
    assert_eq!(resolve_endpoint(&store, Some(stale), stored), stored);
}

// =============================================================
// Cascade on move
// =============================================================

#[test]
fn cascade_updates_anchored_end_and_keeps_free_end() {
    let a = rect_element(0.0, 0.0, 100.0, 100.0);
    let a_id = a.id;
    let free_end = Point::new(400.0, 50.0);
    let arrow = arrow_between(
        Point::new(100.0, 50.0),
        free_end,
        Some(AnchorRef { element_id: a_id, side: Side::Right }),
        None,
    );
    let arrow_id = arrow.id;

    let mut store = ElementStore::new();
    store.insert(a);
    store.insert(arrow);

    // Move A, then cascade.
    if let Some(e) = store.get_mut(a_id) {
        e.translate(30.0, 10.0);
    }
    cascade_moved(&mut store, &[a_id]);

    let (start, end) = arrow_endpoints(store.get(arrow_id).unwrap());
    assert_eq!(start, Point::new(130.0, 60.0), "anchored end tracks the new side midpoint");
    assert_eq!(end, free_end, "free end is numerically unchanged");
}

#[test]
fn cascade_updates_both_anchored_ends() {
    let a = rect_element(0.0, 0.0, 100.0, 100.0);
    let b = rect_element(200.0, 0.0, 100.0, 100.0);
    let (a_id, b_id) = (a.id, b.id);
    let arrow = arrow_between(
        Point::new(100.0, 50.0),
        Point::new(200.0, 50.0),
        Some(AnchorRef { element_id: a_id, side: Side::Right }),
        Some(AnchorRef { element_id: b_id, side: Side::Left }),
    );
    let arrow_id = arrow.id;

    let mut store = ElementStore::new();
    store.insert(a);
    store.insert(b);
    store.insert(arrow);

    if let Some(e) = store.get_mut(b_id) {
        e.translate(50.0, 0.0);
    }
    cascade_moved(&mut store, &[b_id]);

    let (start, end) = arrow_endpoints(store.get(arrow_id).unwrap());
    assert_eq!(start, Point::new(100.0, 50.0), "unmoved referent's end stays");
    assert_eq!(end, Point::new(250.0, 50.0));
}

#[test]
fn cascade_ignores_arrows_anchored_elsewhere() {
    let a = rect_element(0.0, 0.0, 100.0, 100.0);
    let other = rect_element(500.0, 500.0, 10.0, 10.0);
    let other_id = other.id;
    let arrow = arrow_between(
        Point::new(505.0, 500.0),
        Point::new(600.0, 600.0),
        Some(AnchorRef { element_id: other_id, side: Side::Top }),
        None,
    );
    let arrow_id = arrow.id;
    let a_id = a.id;

    let mut store = ElementStore::new();
    store.insert(a);
    store.insert(other);
    store.insert(arrow.clone());

    cascade_moved(&mut store, &[a_id]);
    assert_eq!(store.get(arrow_id), Some(&arrow));
}

#[test]
fn cascade_with_stale_anchor_leaves_arrow_frozen() {
    let ghost_id = uuid::Uuid::new_v4();
    let arrow = arrow_between(
        Point::new(10.0, 10.0),
        Point::new(20.0, 20.0),
        Some(AnchorRef { element_id: ghost_id, side: Side::Bottom }),
        None,
    );
    let arrow_id = arrow.id;
    let mut store = ElementStore::new();
    store.insert(arrow.clone());

    cascade_moved(&mut store, &[ghost_id]);
    assert_eq!(store.get(arrow_id), Some(&arrow));
}

// =============================================================
// apply_endpoints
// =============================================================

#[test]
fn apply_endpoints_rewrites_arrow_encoding() {
    let mut arrow = arrow_between(Point::new(0.0, 0.0), Point::new(10.0, 10.0), None, None);
    apply_endpoints(&mut arrow, Point::new(5.0, 5.0), Point::new(1.0, 2.0));
    let (start, end) = arrow_endpoints(&arrow);
    assert_eq!(start, Point::new(5.0, 5.0));
    assert_eq!(end, Point::new(1.0, 2.0));
}

#[test]
fn apply_endpoints_is_a_no_op_for_non_arrows() {
    let mut e = rect_element(1.0, 2.0, 3.0, 4.0);
    let before = e.clone();
    apply_endpoints(&mut e, Point::new(9.0, 9.0), Point::new(10.0, 10.0));
    assert_eq!(e, before);
}
