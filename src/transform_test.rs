#![allow(clippy::clone_on_copy, clippy::float_cmp)]

use super::*;
use crate::element::Shape;

const EPSILON: f64 = 1e-9;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

/// Transform with an 800×600 surface and the view at zoom 1 on the origin.
fn ready_transform() -> CoordinateTransform {
    let mut t = CoordinateTransform::new();
    t.set_surface_size(800.0, 600.0);
    t
}

fn rect_element(x: f64, y: f64, w: f64, h: f64) -> Element {
    Element::new(x, y, "#000".to_owned(), 1.0, Shape::Rectangle { width: w, height: h })
}

// =============================================================
// Surface and defaults
// =============================================================

#[test]
fn default_has_no_surface() {
    let t = CoordinateTransform::new();
    assert!(!t.has_surface());
    assert_eq!(t.zoom(), 1.0);
}

#[test]
fn first_surface_size_initializes_view_at_zoom_one() {
    let t = ready_transform();
    assert!(t.has_surface());
    assert_eq!(t.zoom(), 1.0);
    let v = t.view();
    assert_eq!(v.x, 0.0);
    assert_eq!(v.y, 0.0);
    assert_eq!(v.width, 800.0);
    assert_eq!(v.height, 600.0);
}

#[test]
fn invalid_surface_sizes_are_ignored() {
    let mut t = ready_transform();
    t.set_surface_size(0.0, 600.0);
    t.set_surface_size(-5.0, 600.0);
    t.set_surface_size(f64::NAN, 600.0);
    assert_eq!(t.view().width, 800.0);
}

#[test]
fn resize_preserves_zoom() {
    let mut t = ready_transform();
    t.zoom_by(2.0, Point::new(400.0, 300.0));
    let zoom = t.zoom();
    t.set_surface_size(1600.0, 600.0);
    assert!(approx_eq(t.zoom(), zoom));
}

// =============================================================
// Coordinate mapping
// =============================================================

#[test]
fn screen_to_canvas_identity_at_zoom_one() {
    let t = ready_transform();
    let p = t.screen_to_canvas(Point::new(50.0, 75.0));
    assert!(approx_eq(p.x, 50.0));
    assert!(approx_eq(p.y, 75.0));
}

#[test]
fn round_trip_screen_canvas() {
    let mut t = ready_transform();
    t.pan_by(120.0, 45.0);
    t.zoom_by(1.7, Point::new(200.0, 100.0));
    let screen = Point::new(333.0, 214.0);
    let back = t.canvas_to_screen(t.screen_to_canvas(screen));
    assert!(approx_eq(back.x, screen.x));
    assert!(approx_eq(back.y, screen.y));
}

#[test]
fn screen_dist_scales_with_zoom() {
    let mut t = ready_transform();
    t.zoom_by(2.0, Point::new(400.0, 300.0));
    assert!(approx_eq(t.screen_dist_to_canvas(10.0), 5.0));
}

// =============================================================
// Pan
// =============================================================

#[test]
fn pan_moves_view_origin() {
    let mut t = ready_transform();
    t.pan_by(100.0, 50.0);
    assert!(approx_eq(t.view().x, 100.0));
    assert!(approx_eq(t.view().y, 50.0));
}

#[test]
fn pan_clamps_at_canvas_origin() {
    let mut t = ready_transform();
    t.pan_by(-500.0, -500.0);
    assert_eq!(t.view().x, 0.0);
    assert_eq!(t.view().y, 0.0);
}

#[test]
fn pan_clamps_at_canvas_far_edge() {
    let mut t = ready_transform();
    t.pan_by(1e9, 1e9);
    let v = t.view();
    assert!(approx_eq(v.right(), crate::consts::CANVAS_WIDTH));
    assert!(approx_eq(v.bottom(), crate::consts::CANVAS_HEIGHT));
}

#[test]
fn pan_with_non_finite_delta_is_ignored() {
    let mut t = ready_transform();
    t.pan_by(f64::NAN, 0.0);
    assert_eq!(t.view().x, 0.0);
}

// =============================================================
// Zoom
// =============================================================

#[test]
fn zoom_in_shrinks_view() {
    let mut t = ready_transform();
    t.zoom_by(2.0, Point::new(400.0, 300.0));
    assert!(approx_eq(t.zoom(), 2.0));
    assert!(approx_eq(t.view().width, 400.0));
}

#[test]
fn zoom_keeps_cursor_point_stationary() {
    let mut t = ready_transform();
    t.pan_by(200.0, 100.0);
    let cursor = Point::new(250.0, 140.0);
    let before = t.screen_to_canvas(cursor);
    t.zoom_by(1.5, cursor);
    let after = t.screen_to_canvas(cursor);
    assert!(approx_eq(before.x, after.x));
    assert!(approx_eq(before.y, after.y));
}

#[test]
fn zoom_clamps_to_maximum() {
    let mut t = ready_transform();
    for _ in 0..100 {
        t.zoom_by(2.0, Point::new(400.0, 300.0));
    }
    assert!(approx_eq(t.zoom(), crate::consts::ZOOM_MAX));
}

#[test]
fn zoom_out_is_limited_by_canvas_extent() {
    let mut t = ready_transform();
    for _ in 0..200 {
        t.zoom_by(0.5, Point::new(400.0, 300.0));
    }
    // Never more zoomed out than ZOOM_MIN.
    assert!(t.zoom() >= crate::consts::ZOOM_MIN - EPSILON);
    // And the window never exceeds the canvas extent off one edge: when
    // larger than the canvas it is centered on that axis.
    let v = t.view();
    if v.width >= crate::consts::CANVAS_WIDTH {
        assert!(approx_eq(v.center().x, crate::consts::CANVAS_WIDTH / 2.0));
    }
}

#[test]
fn zoom_with_invalid_factor_is_ignored() {
    let mut t = ready_transform();
    t.zoom_by(f64::NAN, Point::new(0.0, 0.0));
    t.zoom_by(0.0, Point::new(0.0, 0.0));
    t.zoom_by(-2.0, Point::new(0.0, 0.0));
    assert_eq!(t.zoom(), 1.0);
}

// =============================================================
// zoom_to_fit / zoom_to_focus
// =============================================================

#[test]
fn fit_centers_content() {
    let mut t = ready_transform();
    let elements = vec![rect_element(1000.0, 1000.0, 400.0, 300.0)];
    t.zoom_to_fit(&elements);
    let v = t.view();
    let center = v.center();
    assert!(approx_eq(center.x, 1200.0));
    assert!(approx_eq(center.y, 1150.0));
    // Content plus padding is inside the window.
    assert!(v.x <= 960.0 && v.right() >= 1440.0);
}

#[test]
fn fit_preserves_surface_aspect_ratio() {
    let mut t = ready_transform();
    let elements = vec![rect_element(0.0, 0.0, 100.0, 100.0)];
    t.zoom_to_fit(&elements);
    let v = t.view();
    assert!(approx_eq(v.width / v.height, 800.0 / 600.0));
}

#[test]
fn fit_of_empty_scene_is_a_no_op() {
    let mut t = ready_transform();
    let before = t.view();
    t.zoom_to_fit(&[]);
    assert_eq!(t.view(), before);
}

#[test]
fn fit_of_degenerate_bounds_is_a_no_op() {
    let mut t = ready_transform();
    let before = t.view();
    let broken = Element::new(0.0, 0.0, "#000".to_owned(), 1.0, Shape::Path { points: Vec::new() });
    t.zoom_to_fit(&[broken]);
    assert_eq!(t.view(), before);
}

#[test]
fn fit_respects_zoom_limits() {
    let mut t = ready_transform();
    // A tiny element would need zoom far above the maximum.
    let elements = vec![rect_element(500.0, 500.0, 0.5, 0.5)];
    t.zoom_to_fit(&elements);
    assert!(t.zoom() <= crate::consts::ZOOM_MAX + EPSILON);
}

#[test]
fn focus_fits_single_element() {
    let mut t = ready_transform();
    let e = rect_element(2000.0, 2000.0, 200.0, 100.0);
    t.zoom_to_focus(&e);
    let v = t.view();
    assert!(v.x <= 2000.0 && v.right() >= 2200.0);
    assert!(v.y <= 2000.0 && v.bottom() >= 2100.0);
}
