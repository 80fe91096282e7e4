//! Axis-aligned bounding box computation for every shape kind.
//!
//! [`bounds`] is the single source of spatial truth: hit-testing, marquee
//! intersection, selection outlines, anchor side points, and viewport fitting
//! all derive from it. It returns `None` for degenerate geometry (an empty
//! path, non-finite coordinates); callers must treat `None` as "excluded from
//! this computation", never as a zero-sized box.

#[cfg(test)]
#[path = "bounds_test.rs"]
mod bounds_test;

use crate::consts::{TEXT_HEIGHT_FACTOR, TEXT_WIDTH_FACTOR};
use crate::element::{Element, Shape};
use crate::geometry::{Point, Rect};

/// Bounding box of a single element, normalized so width and height are
/// non-negative and `(x, y)` is the true top-left.
#[must_use]
pub fn bounds(element: &Element) -> Option<Rect> {
    let rect = match &element.shape {
        Shape::Rectangle { width, height }
        | Shape::Line { width, height }
        | Shape::Arrow { width, height, .. } => Rect::new(element.x, element.y, *width, *height),
        Shape::Circle { radius } => {
            let r = radius.abs();
            Rect::new(element.x - r, element.y - r, 2.0 * r, 2.0 * r)
        }
        Shape::Path { points } => path_bounds(points)?,
        Shape::Text { text, font_size } => text_bounds(element.x, element.y, text, *font_size),
        Shape::SpaceEmbed { width, height, .. } | Shape::BlockEmbed { width, height, .. } => {
            Rect::new(element.x, element.y, *width, *height)
        }
    };
    rect.is_finite().then_some(rect)
}

/// Union of the bounds of every element in the iterator. `None` when no
/// element contributes a well-formed box.
#[must_use]
pub fn union_bounds<'a>(elements: impl IntoIterator<Item = &'a Element>) -> Option<Rect> {
    elements
        .into_iter()
        .filter_map(bounds)
        .reduce(|acc, r| acc.union(&r))
}

fn path_bounds(points: &[Point]) -> Option<Rect> {
    let (first, rest) = points.split_first()?;
    let mut min = *first;
    let mut max = *first;
    for p in rest {
        min.x = min.x.min(p.x);
        min.y = min.y.min(p.y);
        max.x = max.x.max(p.x);
        max.y = max.y.max(p.y);
    }
    Some(Rect::from_corners(min, max))
}

/// Heuristic text extent: the renderer owns real metrics, the scene only
/// needs a stable box for hit-testing and selection. `(x, y)` is the
/// baseline start, so the box sits mostly above the origin.
fn text_bounds(x: f64, y: f64, text: &str, font_size: f64) -> Rect {
    let width = text.chars().count() as f64 * font_size * TEXT_WIDTH_FACTOR;
    let height = font_size * TEXT_HEIGHT_FACTOR;
    Rect::new(x, y - font_size, width, height)
}
