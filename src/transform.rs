//! Viewport state and screen↔canvas coordinate mapping.
//!
//! The transform owns a viewBox — the rectangle of canvas-space coordinates
//! currently visible — plus the on-screen surface size in CSS pixels. Zoom is
//! derived (`surface_width / view.width`), never stored. Pan and zoom both
//! clamp the viewBox against the fixed canvas extent; axes where the window
//! is larger than the canvas are centered instead. Viewport state is
//! ephemeral UI state and is never part of the persisted element data.

#[cfg(test)]
#[path = "transform_test.rs"]
mod transform_test;

use crate::bounds::{bounds, union_bounds};
use crate::consts::{CANVAS_HEIGHT, CANVAS_WIDTH, FIT_PADDING_RATIO, ZOOM_MAX, ZOOM_MIN};
use crate::element::Element;
use crate::geometry::{Point, Rect};

/// Pan/zoom viewport for the canvas.
#[derive(Debug, Clone, Copy)]
pub struct CoordinateTransform {
    view: Rect,
    surface_width: f64,
    surface_height: f64,
}

impl Default for CoordinateTransform {
    fn default() -> Self {
        Self {
            view: Rect::new(0.0, 0.0, 0.0, 0.0),
            surface_width: 0.0,
            surface_height: 0.0,
        }
    }
}

impl CoordinateTransform {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The visible canvas-space window.
    #[must_use]
    pub fn view(&self) -> Rect {
        self.view
    }

    /// Current zoom scalar. 1.0 when the surface size is not yet known.
    #[must_use]
    pub fn zoom(&self) -> f64 {
        if self.view.width > 0.0 && self.surface_width > 0.0 {
            self.surface_width / self.view.width
        } else {
            1.0
        }
    }

    /// Whether the rendering surface has reported a usable size. Pointer
    /// handlers no-op while this is false.
    #[must_use]
    pub fn has_surface(&self) -> bool {
        self.surface_width > 0.0 && self.surface_height > 0.0
    }

    /// Update the on-screen surface size in CSS pixels.
    ///
    /// The first usable size initializes the viewBox at zoom 1.0; later
    /// resizes keep the current zoom and adjust the window height to the new
    /// aspect ratio. Non-positive or non-finite sizes are ignored.
    pub fn set_surface_size(&mut self, width: f64, height: f64) {
        if !(width > 0.0 && height > 0.0 && width.is_finite() && height.is_finite()) {
            return;
        }
        let zoom = if self.view.width > 0.0 && self.surface_width > 0.0 {
            self.surface_width / self.view.width
        } else {
            1.0
        };
        self.surface_width = width;
        self.surface_height = height;
        self.view.width = width / zoom;
        self.view.height = height / zoom;
        self.clamp_view();
    }

    /// Map a screen-space point (CSS pixels) to canvas coordinates.
    #[must_use]
    pub fn screen_to_canvas(&self, screen: Point) -> Point {
        if !self.has_surface() {
            return Point::new(self.view.x, self.view.y);
        }
        Point::new(
            self.view.x + screen.x / self.surface_width * self.view.width,
            self.view.y + screen.y / self.surface_height * self.view.height,
        )
    }

    /// Map a canvas-space point to screen coordinates (CSS pixels).
    #[must_use]
    pub fn canvas_to_screen(&self, canvas: Point) -> Point {
        if self.view.width <= 0.0 || self.view.height <= 0.0 {
            return Point::new(0.0, 0.0);
        }
        Point::new(
            (canvas.x - self.view.x) / self.view.width * self.surface_width,
            (canvas.y - self.view.y) / self.view.height * self.surface_height,
        )
    }

    /// Convert a screen-space distance (pixels) to canvas-space distance.
    #[must_use]
    pub fn screen_dist_to_canvas(&self, screen_dist: f64) -> f64 {
        screen_dist / self.zoom()
    }

    /// Pan by a screen-space delta. Positive deltas move the window toward
    /// larger canvas coordinates.
    pub fn pan_by(&mut self, screen_dx: f64, screen_dy: f64) {
        if !self.has_surface() || !(screen_dx.is_finite() && screen_dy.is_finite()) {
            return;
        }
        self.view.x += screen_dx / self.surface_width * self.view.width;
        self.view.y += screen_dy / self.surface_height * self.view.height;
        self.clamp_view();
    }

    /// Zoom by a multiplicative factor keeping the canvas point under
    /// `cursor_screen` stationary. The resulting zoom is clamped to
    /// [`ZOOM_MIN`, `ZOOM_MAX`].
    pub fn zoom_by(&mut self, factor: f64, cursor_screen: Point) {
        if !self.has_surface() || !factor.is_finite() || factor <= 0.0 {
            return;
        }
        let target = (self.zoom() * factor).clamp(ZOOM_MIN, ZOOM_MAX);
        let anchor = self.screen_to_canvas(cursor_screen);
        let new_width = self.surface_width / target;
        let new_height = self.surface_height / target;
        // Keep the anchor at the same fractional position in the window.
        let fx = (anchor.x - self.view.x) / self.view.width;
        let fy = (anchor.y - self.view.y) / self.view.height;
        self.view = Rect {
            x: anchor.x - fx * new_width,
            y: anchor.y - fy * new_height,
            width: new_width,
            height: new_height,
        };
        self.clamp_view();
    }

    /// Fit the union bounds of `elements` into the window, with proportional
    /// padding. Leaves the transform unchanged when nothing fits: no
    /// elements with usable bounds, or a degenerate result.
    pub fn zoom_to_fit(&mut self, elements: &[Element]) {
        if let Some(target) = union_bounds(elements) {
            self.fit_rect(target);
        }
    }

    /// Fit a single element's bounds into the window.
    pub fn zoom_to_focus(&mut self, element: &Element) {
        if let Some(target) = bounds(element) {
            self.fit_rect(target);
        }
    }

    fn fit_rect(&mut self, target: Rect) {
        if !self.has_surface() {
            return;
        }
        let padded = target.expanded(
            target.width * FIT_PADDING_RATIO,
            target.height * FIT_PADDING_RATIO,
        );
        let aspect = self.surface_width / self.surface_height;
        // Expand whichever dimension is under-constrained to preserve the
        // surface aspect ratio, keeping the target centered.
        let mut view = padded;
        if padded.width <= 0.0 && padded.height <= 0.0 {
            return;
        }
        if padded.width / padded.height < aspect || padded.width <= 0.0 {
            view.width = padded.height * aspect;
            view.x = padded.x - (view.width - padded.width) / 2.0;
        } else {
            view.height = padded.width / aspect;
            view.y = padded.y - (view.height - padded.height) / 2.0;
        }
        if !view.is_finite() || view.width <= 0.0 || view.height <= 0.0 {
            return;
        }
        self.view = view;
        let clamped_zoom = self.zoom().clamp(ZOOM_MIN, ZOOM_MAX);
        self.view.width = self.surface_width / clamped_zoom;
        self.view.height = self.surface_height / clamped_zoom;
        // Re-center after any zoom clamp so the target stays in the middle.
        let center = padded.center();
        self.view.x = center.x - self.view.width / 2.0;
        self.view.y = center.y - self.view.height / 2.0;
        self.clamp_view();
    }

    /// Clamp the window inside the fixed canvas extent, centering any axis
    /// where the window is larger than the canvas.
    fn clamp_view(&mut self) {
        self.view.x = clamp_axis(self.view.x, self.view.width, CANVAS_WIDTH);
        self.view.y = clamp_axis(self.view.y, self.view.height, CANVAS_HEIGHT);
    }
}

fn clamp_axis(origin: f64, window: f64, extent: f64) -> f64 {
    if window >= extent {
        (extent - window) / 2.0
    } else {
        origin.clamp(0.0, extent - window)
    }
}
