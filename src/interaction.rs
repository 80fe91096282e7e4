//! Input model: tools, modifier keys, mouse buttons, and the gesture state
//! machine.
//!
//! `Tool` and `Modifiers` capture the user's intent at the time of a pointer
//! event. [`InteractionState`] is the active gesture being tracked between
//! pointer-down and pointer-up; each variant carries the context needed to
//! compute incremental deltas and, on release, decide whether anything
//! actually changed. Every mutating variant holds a `before` snapshot of the
//! whole element array, taken at gesture start, so aborting restores the
//! store exactly and committing can compare before/after.

#[cfg(test)]
#[path = "interaction_test.rs"]
mod interaction_test;

use crate::element::{AnchorRef, Element, ElementId};
use crate::geometry::{Point, Rect};
use crate::hit::ResizeHandle;

/// Which tool is currently active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tool {
    /// Pointer / selection tool (default).
    #[default]
    Select,
    /// Freehand pen; draws a path of points.
    Pen,
    /// Draw a rectangle.
    Rect,
    /// Draw a circle from its center.
    Circle,
    /// Draw a straight line segment.
    Line,
    /// Draw a connector arrow that can anchor to elements.
    Arrow,
    /// Place a text element with a click.
    Text,
}

impl Tool {
    /// Whether this tool creates a drag-sized shape (rect, circle, line).
    #[must_use]
    pub fn is_shape(self) -> bool {
        matches!(self, Self::Rect | Self::Circle | Self::Line)
    }

    /// The tool bound to a single-letter keyboard shortcut, if any.
    #[must_use]
    pub fn from_shortcut(key: &str) -> Option<Self> {
        match key {
            "s" => Some(Self::Select),
            "p" => Some(Self::Pen),
            "r" => Some(Self::Rect),
            "c" => Some(Self::Circle),
            "l" => Some(Self::Line),
            "a" => Some(Self::Arrow),
            _ => None,
        }
    }
}

/// Keyboard/mouse modifier keys held during an event.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default)]
pub struct Modifiers {
    /// Shift key is held.
    pub shift: bool,
    /// Ctrl key is held.
    pub ctrl: bool,
    /// Alt / Option key is held.
    pub alt: bool,
    /// Meta / Command key is held.
    pub meta: bool,
}

impl Modifiers {
    /// Ctrl or Meta, the zoom-gesture modifier on wheel events.
    #[must_use]
    pub fn zoom_gesture(self) -> bool {
        self.ctrl || self.meta
    }
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Left mouse button (or single-finger tap).
    Primary,
    /// Middle mouse button (scroll wheel click).
    Middle,
    /// Right mouse button (or two-finger tap).
    Secondary,
}

/// A keyboard key, by its reported name (e.g. `"Delete"`, `"Escape"`, `"r"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key(pub String);

/// Wheel / trackpad scroll delta.
#[derive(Debug, Clone, Copy)]
pub struct WheelDelta {
    /// Horizontal scroll amount in pixels.
    pub dx: f64,
    /// Vertical scroll amount in pixels (positive = down).
    pub dy: f64,
}

/// The gesture currently in progress.
#[derive(Debug, Clone, Default)]
pub enum InteractionState {
    /// No gesture in progress; waiting for the next pointer-down.
    #[default]
    Idle,
    /// Alt- or middle-button drag panning the viewport.
    Panning {
        /// Screen-space position of the previous pointer event.
        last_screen: Point,
    },
    /// Drag-drawing a selection marquee from an empty-canvas press.
    Marquee {
        /// Canvas-space corner where the drag started.
        start: Point,
        /// Canvas-space position of the latest pointer event.
        current: Point,
        /// Selection at gesture start, kept when shift makes this additive.
        prior: Vec<ElementId>,
        /// Shift was held at pointer-down.
        additive: bool,
    },
    /// Moving the selected elements (and cascading their anchored arrows).
    Dragging {
        /// Ids being moved this gesture.
        moved: Vec<ElementId>,
        /// Canvas-space pointer position at the previous event.
        last_canvas: Point,
        /// Whole-array snapshot at gesture start.
        before: Vec<Element>,
    },
    /// Resizing a single element by one of its eight handles.
    Resizing {
        /// Id of the element being resized.
        id: ElementId,
        /// Which handle is being dragged.
        handle: ResizeHandle,
        /// Element bounds at gesture start; deltas apply to these edges.
        start_bounds: Rect,
        /// Canvas-space pointer position at gesture start.
        start_canvas: Point,
        /// Whole-array snapshot at gesture start.
        before: Vec<Element>,
    },
    /// Drag-sizing a freshly created rectangle, circle, or line.
    DrawingShape {
        /// Id of the provisional element being sized.
        id: ElementId,
        /// Canvas-space point where the drag started.
        anchor: Point,
        /// Whole-array snapshot at gesture start.
        before: Vec<Element>,
    },
    /// Extending a freshly created pen path point by point.
    DrawingPath {
        /// Id of the provisional path.
        id: ElementId,
        /// Whole-array snapshot at gesture start.
        before: Vec<Element>,
    },
    /// Arrow tool engaged: start point fixed, free end following the
    /// cursor, snapping to hovered elements.
    Anchoring {
        /// Raw canvas-space pointer-down position, used to tell a two-click
        /// gesture (press, release in place, click elsewhere) from a drag.
        press: Point,
        /// Canvas-space start point (already snapped when anchored).
        start: Point,
        /// Anchor for the start point, when the press hit an element.
        anchor_start: Option<AnchorRef>,
        /// Canvas-space position of the free end.
        end: Point,
        /// Preview anchor for the free end while hovering an element.
        anchor_end: Option<AnchorRef>,
        /// Whole-array snapshot at gesture start.
        before: Vec<Element>,
    },
}
