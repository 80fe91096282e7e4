//! The canvas engine: event handlers, gesture lifecycle, and commit points.
//!
//! [`CanvasEngine`] owns the element store, the viewport transform, the
//! selection, and the in-flight gesture. The host feeds it screen-space
//! pointer / wheel / keyboard events and drop payloads; handlers return
//! [`Action`] values telling the host what to do (re-render, persist the
//! element array, push an undo/redo command, change the cursor).
//!
//! Gestures mutate the store transiently and commit exactly once, on
//! pointer-up or on an explicit structural action. A commit compares the
//! whole-array snapshot taken at gesture start against the current array; if
//! nothing changed, no history entry and no persistence are emitted. Escape
//! aborts the in-flight gesture by restoring the snapshot verbatim.

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use thiserror::Error;

use crate::anchor::{self, closest_side};
use crate::arrange;
use crate::bounds::bounds;
use crate::consts::{EMBED_HEIGHT, EMBED_WIDTH, MIN_SHAPE_SIZE, ZOOM_STEP};
use crate::element::{AnchorRef, Element, ElementId, ElementStore, Shape};
use crate::geometry::{Point, Rect};
use crate::hit::{self, ResizeHandle, element_at, handle_at};
use crate::interaction::{Button, InteractionState, Key, Modifiers, Tool, WheelDelta};
use crate::selection::Selection;
use crate::transform::CoordinateTransform;

/// A committed before/after snapshot pair for the external history store.
///
/// Both arrays are independent deep copies; the host implements undo/redo by
/// feeding `before` or `after` back through [`CanvasEngine::load_snapshot`].
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    /// Human-readable description of the committed action.
    pub description: String,
    /// Element array before the gesture began.
    pub before: Vec<Element>,
    /// Element array after the commit.
    pub after: Vec<Element>,
}

/// Instructions returned from event handlers for the host to process.
#[derive(Debug, Clone)]
pub enum Action {
    /// The scene changed visually; redraw.
    RenderNeeded,
    /// Change the pointer cursor (CSS cursor name).
    SetCursor(String),
    /// Persist this element array (the post-commit state).
    ElementsPersisted(Vec<Element>),
    /// Push this entry onto the undo/redo history.
    HistoryCommitted(HistoryEntry),
    /// Open the host text editor for the given text element.
    EditTextRequested {
        /// Id of the text element to edit.
        id: ElementId,
    },
}

/// Errors surfaced to the host. Everything else in the engine degrades
/// silently per frame.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CanvasError {
    /// A space was dropped onto its own canvas.
    #[error("a space cannot be embedded into its own canvas")]
    SelfEmbed,
}

/// What an external drop payload refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropKind {
    /// A whole space (document).
    Space,
    /// A content block, usually from another space.
    Block,
}

/// Payload dropped onto the canvas from the file browser or document tree.
#[derive(Debug, Clone)]
pub struct DropPayload {
    /// Whether this references a space or a block.
    pub kind: DropKind,
    /// Id of the referenced space or block.
    pub ref_id: String,
    /// For blocks, the space the block lives in.
    pub source_space_id: Option<String>,
    /// Display title for the embed tile.
    pub display_hint: String,
}

/// The infinite-canvas scene editor for one canvas space.
pub struct CanvasEngine {
    store: ElementStore,
    transform: CoordinateTransform,
    selection: Selection,
    interaction: InteractionState,
    tool: Tool,
    space_id: String,
    color: String,
    stroke_width: f64,
    font_size: f64,
    text_editing: bool,
}

impl CanvasEngine {
    /// Create an engine for the canvas of the given space.
    #[must_use]
    pub fn new(space_id: impl Into<String>) -> Self {
        Self {
            store: ElementStore::new(),
            transform: CoordinateTransform::new(),
            selection: Selection::new(),
            interaction: InteractionState::Idle,
            tool: Tool::default(),
            space_id: space_id.into(),
            color: "#1F1A17".to_owned(),
            stroke_width: 2.0,
            font_size: 16.0,
            text_editing: false,
        }
    }

    // --- Queries ---

    /// All elements in z-order, bottom first.
    #[must_use]
    pub fn elements(&self) -> &[Element] {
        self.store.elements()
    }

    /// Look up an element by id.
    #[must_use]
    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.store.get(id)
    }

    /// The current selection.
    #[must_use]
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Union bounds of the current selection.
    #[must_use]
    pub fn selection_bounds(&self) -> Option<Rect> {
        self.selection.bounds(&self.store)
    }

    /// The currently active tool.
    #[must_use]
    pub fn tool(&self) -> Tool {
        self.tool
    }

    /// The viewport transform.
    #[must_use]
    pub fn transform(&self) -> &CoordinateTransform {
        &self.transform
    }

    /// The gesture currently in progress.
    #[must_use]
    pub fn interaction(&self) -> &InteractionState {
        &self.interaction
    }

    // --- Host state inputs ---

    /// Hydrate the scene from persistence, replacing all elements. Also used
    /// by the host's undo/redo to apply a [`HistoryEntry`] snapshot.
    pub fn load_snapshot(&mut self, elements: Vec<Element>) {
        self.store.load_snapshot(elements);
        self.selection.retain_existing(&self.store);
        self.interaction = InteractionState::Idle;
    }

    /// Update the on-screen surface size in CSS pixels.
    pub fn set_surface_size(&mut self, width: f64, height: f64) {
        self.transform.set_surface_size(width, height);
    }

    /// Set the active tool.
    pub fn set_tool(&mut self, tool: Tool) {
        self.tool = tool;
    }

    /// Tell the engine whether the host text editor is open; keyboard
    /// shortcuts are suppressed while it is.
    pub fn set_text_editing(&mut self, editing: bool) {
        self.text_editing = editing;
    }

    // --- Pointer events ---

    /// Handle pointer-down at a screen-space position.
    pub fn on_pointer_down(&mut self, screen: Point, button: Button, modifiers: Modifiers) -> Vec<Action> {
        if !self.transform.has_surface() || !screen.is_finite() {
            return Vec::new();
        }
        let canvas = self.transform.screen_to_canvas(screen);

        // A second primary press while the arrow tool is waiting for its end
        // point finalizes the connector there (two-click creation). Other
        // buttons and Alt-presses leave the gesture armed.
        match std::mem::take(&mut self.interaction) {
            InteractionState::Anchoring { press, start, anchor_start, end, anchor_end, before } => {
                if button == Button::Primary && !modifiers.alt {
                    return self.finalize_arrow(canvas, start, anchor_start, before);
                }
                self.interaction =
                    InteractionState::Anchoring { press, start, anchor_start, end, anchor_end, before };
                return Vec::new();
            }
            other => self.interaction = other,
        }
        if !matches!(self.interaction, InteractionState::Idle) {
            return Vec::new();
        }

        if modifiers.alt || button == Button::Middle {
            self.interaction = InteractionState::Panning { last_screen: screen };
            return vec![Action::SetCursor("grabbing".to_owned()), Action::RenderNeeded];
        }
        if button != Button::Primary {
            return Vec::new();
        }

        match self.tool {
            Tool::Select => self.select_pointer_down(canvas, modifiers.shift),
            Tool::Pen => self.begin_path(canvas),
            Tool::Arrow => self.begin_arrow(canvas),
            Tool::Text => self.place_text(canvas),
            Tool::Rect | Tool::Circle | Tool::Line => self.begin_shape(canvas),
        }
    }

    /// Handle pointer movement at a screen-space position.
    pub fn on_pointer_move(&mut self, screen: Point, _modifiers: Modifiers) -> Vec<Action> {
        if !self.transform.has_surface() || !screen.is_finite() {
            return Vec::new();
        }
        let canvas = self.transform.screen_to_canvas(screen);

        match std::mem::take(&mut self.interaction) {
            InteractionState::Idle => Vec::new(),
            InteractionState::Panning { last_screen } => {
                self.transform.pan_by(last_screen.x - screen.x, last_screen.y - screen.y);
                self.interaction = InteractionState::Panning { last_screen: screen };
                vec![Action::RenderNeeded]
            }
            InteractionState::Marquee { start, prior, additive, .. } => {
                let rect = Rect::from_corners(start, canvas);
                let hits = hit::marquee_hits(&self.store, &rect);
                self.selection.apply_marquee(&self.store, &hits, &prior, additive);
                self.interaction = InteractionState::Marquee { start, current: canvas, prior, additive };
                vec![Action::RenderNeeded]
            }
            InteractionState::Dragging { moved, last_canvas, before } => {
                let dx = canvas.x - last_canvas.x;
                let dy = canvas.y - last_canvas.y;
                if dx.is_finite() && dy.is_finite() {
                    self.translate_moved(&moved, dx, dy);
                }
                self.interaction = InteractionState::Dragging { moved, last_canvas: canvas, before };
                vec![Action::RenderNeeded]
            }
            InteractionState::Resizing { id, handle, start_bounds, start_canvas, before } => {
                let dx = canvas.x - start_canvas.x;
                let dy = canvas.y - start_canvas.y;
                if dx.is_finite() && dy.is_finite() {
                    self.apply_resize(id, handle, &start_bounds, dx, dy, &before);
                }
                self.interaction =
                    InteractionState::Resizing { id, handle, start_bounds, start_canvas, before };
                vec![Action::RenderNeeded]
            }
            InteractionState::DrawingShape { id, anchor, before } => {
                self.size_provisional_shape(id, anchor, canvas);
                self.interaction = InteractionState::DrawingShape { id, anchor, before };
                vec![Action::RenderNeeded]
            }
            InteractionState::DrawingPath { id, before } => {
                if let Some(Shape::Path { points }) =
                    self.store.get_mut(id).map(|e| &mut e.shape)
                {
                    points.push(canvas);
                }
                self.interaction = InteractionState::DrawingPath { id, before };
                vec![Action::RenderNeeded]
            }
            InteractionState::Anchoring { press, start, anchor_start, before, .. } => {
                let (end, anchor_end) = self.preview_arrow_end(canvas, anchor_start);
                self.interaction =
                    InteractionState::Anchoring { press, start, anchor_start, end, anchor_end, before };
                vec![Action::RenderNeeded]
            }
        }
    }

    /// Handle pointer-up at a screen-space position.
    pub fn on_pointer_up(&mut self, screen: Point, _button: Button, _modifiers: Modifiers) -> Vec<Action> {
        if !self.transform.has_surface() {
            return Vec::new();
        }
        let canvas = self.transform.screen_to_canvas(screen);

        match std::mem::take(&mut self.interaction) {
            InteractionState::Idle => Vec::new(),
            InteractionState::Panning { .. } => {
                vec![Action::SetCursor("default".to_owned()), Action::RenderNeeded]
            }
            InteractionState::Marquee { .. } => vec![Action::RenderNeeded],
            InteractionState::Dragging { before, .. } => self.commit("Move elements", before),
            InteractionState::Resizing { before, .. } => self.commit("Resize element", before),
            InteractionState::DrawingShape { id, before, .. } => self.finish_shape(id, before),
            InteractionState::DrawingPath { id, before } => {
                self.selection.clear();
                self.selection.click(&self.store, id, false);
                self.commit("Draw path", before)
            }
            InteractionState::Anchoring { press, start, anchor_start, end, anchor_end, before } => {
                if canvas == press {
                    // No drag: stay armed and wait for the second click.
                    self.interaction =
                        InteractionState::Anchoring { press, start, anchor_start, end, anchor_end, before };
                    Vec::new()
                } else {
                    self.finalize_arrow(canvas, start, anchor_start, before)
                }
            }
        }
    }

    /// Handle a wheel event: Ctrl/Cmd zooms about the cursor, otherwise the
    /// deltas pan the viewport (two-finger scroll).
    pub fn on_wheel(&mut self, screen: Point, delta: WheelDelta, modifiers: Modifiers) -> Vec<Action> {
        if !self.transform.has_surface() {
            return Vec::new();
        }
        if modifiers.zoom_gesture() {
            let factor = if delta.dy < 0.0 { ZOOM_STEP } else { 1.0 / ZOOM_STEP };
            self.transform.zoom_by(factor, screen);
        } else {
            self.transform.pan_by(delta.dx, delta.dy);
        }
        vec![Action::RenderNeeded]
    }

    /// Handle a key press. Shortcuts are suppressed while the host text
    /// editor is open.
    pub fn on_key_down(&mut self, key: &Key, _modifiers: Modifiers) -> Vec<Action> {
        if self.text_editing {
            return Vec::new();
        }
        match key.0.as_str() {
            "Escape" => self.abort_gesture(),
            "Delete" | "Backspace" => {
                if matches!(self.interaction, InteractionState::Idle) {
                    self.delete_selection()
                } else {
                    Vec::new()
                }
            }
            k => match Tool::from_shortcut(k) {
                Some(tool) if matches!(self.interaction, InteractionState::Idle) => {
                    self.tool = tool;
                    vec![Action::RenderNeeded]
                }
                _ => Vec::new(),
            },
        }
    }

    // --- Structural actions (toolbar surface) ---

    /// Delete the selected elements. Anchors referencing them go stale and
    /// their connectors freeze in place.
    pub fn delete_selection(&mut self) -> Vec<Action> {
        if self.selection.is_empty() {
            return Vec::new();
        }
        let before = self.store.snapshot();
        let ids: Vec<ElementId> = self.selection.ids().to_vec();
        self.store.remove_where(|e| ids.contains(&e.id));
        self.selection.clear();
        self.commit("Delete elements", before)
    }

    /// Remove every element from the canvas.
    pub fn clear_all(&mut self) -> Vec<Action> {
        if self.store.is_empty() {
            return Vec::new();
        }
        let before = self.store.snapshot();
        self.store.clear();
        self.selection.clear();
        self.commit("Clear canvas", before)
    }

    /// Raise the selected elements to the top of the z-order.
    pub fn bring_selection_to_front(&mut self) -> Vec<Action> {
        let before = self.store.snapshot();
        arrange::bring_to_front(&mut self.store, self.selection.ids());
        self.commit("Bring to front", before)
    }

    /// Lower the selected elements to the bottom of the z-order.
    pub fn send_selection_to_back(&mut self) -> Vec<Action> {
        let before = self.store.snapshot();
        arrange::send_to_back(&mut self.store, self.selection.ids());
        self.commit("Send to back", before)
    }

    /// Group the selected elements under a fresh group id. No-op for fewer
    /// than two selected elements.
    pub fn group_selection(&mut self) -> Vec<Action> {
        let before = self.store.snapshot();
        if arrange::group(&mut self.store, self.selection.ids()).is_none() {
            return Vec::new();
        }
        self.commit("Group elements", before)
    }

    /// Dissolve every group touched by the selection.
    pub fn ungroup_selection(&mut self) -> Vec<Action> {
        let before = self.store.snapshot();
        arrange::ungroup(&mut self.store, self.selection.ids());
        self.commit("Ungroup elements", before)
    }

    /// Apply color and/or stroke width to the selection, or set the defaults
    /// for newly created elements when nothing is selected.
    pub fn set_style(&mut self, color: Option<&str>, stroke_width: Option<f64>) -> Vec<Action> {
        if let Some(color) = color {
            self.color = color.to_owned();
        }
        if let Some(sw) = stroke_width {
            if sw.is_finite() && sw > 0.0 {
                self.stroke_width = sw;
            }
        }
        if self.selection.is_empty() {
            return Vec::new();
        }
        let before = self.store.snapshot();
        for id in self.selection.ids().to_vec() {
            if let Some(element) = self.store.get_mut(id) {
                if let Some(color) = color {
                    element.color = color.to_owned();
                }
                if let Some(sw) = stroke_width {
                    if sw.is_finite() && sw > 0.0 {
                        element.stroke_width = sw;
                    }
                }
            }
        }
        self.commit("Edit style", before)
    }

    /// Commit text from the host editor back into a text element.
    pub fn set_text(&mut self, id: ElementId, text: String) -> Vec<Action> {
        let before = self.store.snapshot();
        match self.store.get_mut(id).map(|e| &mut e.shape) {
            Some(Shape::Text { text: stored, .. }) => {
                *stored = text;
                self.commit("Edit text", before)
            }
            _ => Vec::new(),
        }
    }

    /// Convert an external drop payload into an embed element at the drop's
    /// screen position.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::SelfEmbed`] when a space is dropped onto its
    /// own canvas.
    pub fn on_drop(&mut self, payload: &DropPayload, screen: Point) -> Result<Vec<Action>, CanvasError> {
        if payload.kind == DropKind::Space && payload.ref_id == self.space_id {
            tracing::warn!(space_id = %self.space_id, "rejected drop of a space onto its own canvas");
            return Err(CanvasError::SelfEmbed);
        }
        let canvas = self.transform.screen_to_canvas(screen);
        let before = self.store.snapshot();
        let (shape, description) = match payload.kind {
            DropKind::Space => (
                Shape::SpaceEmbed {
                    width: EMBED_WIDTH,
                    height: EMBED_HEIGHT,
                    space_id: payload.ref_id.clone(),
                    label: payload.display_hint.clone(),
                },
                "Embed space",
            ),
            DropKind::Block => (
                Shape::BlockEmbed {
                    width: EMBED_WIDTH,
                    height: EMBED_HEIGHT,
                    block_id: payload.ref_id.clone(),
                    source_space_id: payload.source_space_id.clone(),
                    label: payload.display_hint.clone(),
                },
                "Embed block",
            ),
        };
        let element = Element::new(
            canvas.x - EMBED_WIDTH / 2.0,
            canvas.y - EMBED_HEIGHT / 2.0,
            self.color.clone(),
            self.stroke_width,
            shape,
        );
        let id = element.id;
        self.store.insert(element);
        self.selection.clear();
        self.selection.click(&self.store, id, false);
        Ok(self.commit(description, before))
    }

    // --- Viewport ---

    /// Fit all elements into the viewport.
    pub fn zoom_to_fit(&mut self) -> Vec<Action> {
        self.transform.zoom_to_fit(self.store.elements());
        vec![Action::RenderNeeded]
    }

    /// Fit a single element into the viewport.
    pub fn zoom_to_focus(&mut self, id: ElementId) -> Vec<Action> {
        if let Some(element) = self.store.get(id) {
            self.transform.zoom_to_focus(element);
        }
        vec![Action::RenderNeeded]
    }

    // --- Gesture internals ---

    fn select_pointer_down(&mut self, canvas: Point, shift: bool) -> Vec<Action> {
        if let Some((id, handle, start_bounds)) = self.resize_handle_hit(canvas) {
            self.interaction = InteractionState::Resizing {
                id,
                handle,
                start_bounds,
                start_canvas: canvas,
                before: self.store.snapshot(),
            };
            return vec![Action::RenderNeeded];
        }

        if let Some(hit_id) = element_at(&self.store, canvas) {
            if shift {
                // Shift-click only adjusts the selection; no drag starts.
                self.selection.click(&self.store, hit_id, true);
                return vec![Action::RenderNeeded];
            }
            if !self.selection.contains(hit_id) {
                self.selection.click(&self.store, hit_id, false);
            }
            self.interaction = InteractionState::Dragging {
                moved: self.selection.ids().to_vec(),
                last_canvas: canvas,
                before: self.store.snapshot(),
            };
            vec![Action::RenderNeeded]
        } else {
            let prior = self.selection.ids().to_vec();
            if !shift {
                self.selection.clear();
            }
            self.interaction =
                InteractionState::Marquee { start: canvas, current: canvas, prior, additive: shift };
            vec![Action::RenderNeeded]
        }
    }

    /// Resize handles are offered only for a single selected, ungrouped,
    /// non-text element; text size is derived, groups resize is a non-goal.
    fn resize_handle_hit(&self, canvas: Point) -> Option<(ElementId, ResizeHandle, Rect)> {
        if self.selection.len() != 1 {
            return None;
        }
        let id = *self.selection.ids().first()?;
        let element = self.store.get(id)?;
        if element.group_id.is_some() || matches!(element.shape, Shape::Text { .. }) {
            return None;
        }
        let rect = bounds(element)?;
        let handle = handle_at(&rect, canvas, self.transform.zoom())?;
        Some((id, handle, rect))
    }

    fn begin_shape(&mut self, canvas: Point) -> Vec<Action> {
        let before = self.store.snapshot();
        let shape = match self.tool {
            Tool::Circle => Shape::Circle { radius: 0.0 },
            Tool::Line => Shape::Line { width: 0.0, height: 0.0 },
            _ => Shape::Rectangle { width: 0.0, height: 0.0 },
        };
        let element = Element::new(canvas.x, canvas.y, self.color.clone(), self.stroke_width, shape);
        let id = element.id;
        self.store.insert(element);
        self.interaction = InteractionState::DrawingShape { id, anchor: canvas, before };
        vec![Action::RenderNeeded]
    }

    fn begin_path(&mut self, canvas: Point) -> Vec<Action> {
        let before = self.store.snapshot();
        let element = Element::new(
            canvas.x,
            canvas.y,
            self.color.clone(),
            self.stroke_width,
            Shape::Path { points: vec![canvas] },
        );
        let id = element.id;
        self.store.insert(element);
        self.interaction = InteractionState::DrawingPath { id, before };
        vec![Action::RenderNeeded]
    }

    fn begin_arrow(&mut self, canvas: Point) -> Vec<Action> {
        let before = self.store.snapshot();
        let (start, anchor_start) = match element_at(&self.store, canvas) {
            Some(id) => match self.store.get(id).and_then(|e| closest_side(canvas, e)) {
                Some((side, point)) => (point, Some(AnchorRef { element_id: id, side })),
                None => (canvas, None),
            },
            None => (canvas, None),
        };
        self.interaction = InteractionState::Anchoring {
            press: canvas,
            start,
            anchor_start,
            end: canvas,
            anchor_end: None,
            before,
        };
        vec![Action::RenderNeeded]
    }

    fn place_text(&mut self, canvas: Point) -> Vec<Action> {
        let before = self.store.snapshot();
        let element = Element::new(
            canvas.x,
            canvas.y,
            self.color.clone(),
            self.stroke_width,
            Shape::Text { text: String::new(), font_size: self.font_size },
        );
        let id = element.id;
        self.store.insert(element);
        self.selection.clear();
        self.selection.click(&self.store, id, false);
        let mut actions = self.commit("Add text", before);
        actions.push(Action::EditTextRequested { id });
        actions
    }

    /// Preview position of the arrow's free end: snapped to the closest side
    /// of a hovered element (other than the start's referent), raw cursor
    /// otherwise.
    fn preview_arrow_end(&self, canvas: Point, anchor_start: Option<AnchorRef>) -> (Point, Option<AnchorRef>) {
        let hover = element_at(&self.store, canvas);
        let start_referent = anchor_start.map(|a| a.element_id);
        match hover {
            Some(id) if Some(id) != start_referent => {
                match self.store.get(id).and_then(|e| closest_side(canvas, e)) {
                    Some((side, point)) => (point, Some(AnchorRef { element_id: id, side })),
                    None => (canvas, None),
                }
            }
            _ => (canvas, None),
        }
    }

    /// Finish the arrow gesture whose state the caller has already taken out
    /// of `self.interaction`.
    fn finalize_arrow(
        &mut self,
        canvas: Point,
        start: Point,
        anchor_start: Option<AnchorRef>,
        before: Vec<Element>,
    ) -> Vec<Action> {
        let (end, anchor_end) = self.preview_arrow_end(canvas, anchor_start);
        let element = Element::new(
            start.x,
            start.y,
            self.color.clone(),
            self.stroke_width,
            Shape::Arrow {
                width: end.x - start.x,
                height: end.y - start.y,
                anchor_start,
                anchor_end,
            },
        );
        let id = element.id;
        self.store.insert(element);
        self.selection.clear();
        self.selection.click(&self.store, id, false);
        self.commit("Create arrow", before)
    }

    fn finish_shape(&mut self, id: ElementId, before: Vec<Element>) -> Vec<Action> {
        let too_small = self
            .store
            .get(id)
            .and_then(bounds)
            .is_none_or(|b| b.width < MIN_SHAPE_SIZE && b.height < MIN_SHAPE_SIZE);
        if too_small {
            // Accidental click; removing the provisional element makes the
            // commit below a no-op.
            self.store.remove(id);
        } else {
            if let Some(element) = self.store.get_mut(id) {
                normalize_creation(element);
            }
            self.selection.clear();
            self.selection.click(&self.store, id, false);
        }
        self.commit("Draw shape", before)
    }

    fn size_provisional_shape(&mut self, id: ElementId, anchor: Point, canvas: Point) {
        if !canvas.is_finite() {
            return;
        }
        let Some(element) = self.store.get_mut(id) else {
            return;
        };
        match &mut element.shape {
            Shape::Rectangle { width, height } | Shape::Line { width, height } => {
                element.x = anchor.x;
                element.y = anchor.y;
                *width = canvas.x - anchor.x;
                *height = canvas.y - anchor.y;
            }
            Shape::Circle { radius } => {
                element.x = anchor.x;
                element.y = anchor.y;
                *radius = anchor.distance_to(canvas);
            }
            _ => {}
        }
    }

    /// Translate the moved set by one frame's delta. Arrows anchored to a
    /// moved element are left in place and re-resolved by the anchor
    /// cascade so their free endpoints stay put.
    fn translate_moved(&mut self, moved: &[ElementId], dx: f64, dy: f64) {
        for id in moved {
            let anchored = self
                .store
                .get(*id)
                .is_some_and(|e| e.anchored_to(|target| moved.contains(&target)));
            if anchored {
                continue;
            }
            if let Some(element) = self.store.get_mut(*id) {
                element.translate(dx, dy);
            }
        }
        anchor::cascade_moved(&mut self.store, moved);
    }

    fn apply_resize(
        &mut self,
        id: ElementId,
        handle: ResizeHandle,
        start_bounds: &Rect,
        dx: f64,
        dy: f64,
        before: &[Element],
    ) {
        let Some(original) = before.iter().find(|e| e.id == id) else {
            return;
        };
        let (west, north, east, south) = handle.edges();
        let x1 = start_bounds.x + if west { dx } else { 0.0 };
        let y1 = start_bounds.y + if north { dy } else { 0.0 };
        let x2 = start_bounds.right() + if east { dx } else { 0.0 };
        let y2 = start_bounds.bottom() + if south { dy } else { 0.0 };
        let new_bounds = Rect::from_corners(Point::new(x1, y1), Point::new(x2, y2));

        let mut resized = original.clone();
        write_back_bounds(&mut resized, start_bounds, &new_bounds);
        self.store.insert(resized);
        anchor::cascade_moved(&mut self.store, &[id]);
    }

    fn abort_gesture(&mut self) -> Vec<Action> {
        let restored = match std::mem::take(&mut self.interaction) {
            InteractionState::Idle => return Vec::new(),
            InteractionState::Panning { .. } => {
                return vec![Action::SetCursor("default".to_owned()), Action::RenderNeeded];
            }
            InteractionState::Marquee { .. } => None,
            InteractionState::Dragging { before, .. }
            | InteractionState::Resizing { before, .. }
            | InteractionState::DrawingShape { before, .. }
            | InteractionState::DrawingPath { before, .. }
            | InteractionState::Anchoring { before, .. } => Some(before),
        };
        if let Some(before) = restored {
            self.store.load_snapshot(before);
            self.selection.retain_existing(&self.store);
        }
        vec![Action::RenderNeeded]
    }

    /// Commit a finished gesture: compare the whole-array snapshot from
    /// gesture start against the current array, and emit a history entry
    /// plus a persistence request only when something actually changed.
    fn commit(&mut self, description: &str, before: Vec<Element>) -> Vec<Action> {
        let after = self.store.snapshot();
        if after == before {
            return vec![Action::RenderNeeded];
        }
        tracing::debug!(description, elements = after.len(), "scene mutation committed");
        vec![
            Action::HistoryCommitted(HistoryEntry {
                description: description.to_owned(),
                before,
                after: after.clone(),
            }),
            Action::ElementsPersisted(after),
            Action::RenderNeeded,
        ]
    }
}

/// Normalize a just-created element so stored geometry is upright where the
/// shape has no direction (rectangles); lines keep their signed direction.
fn normalize_creation(element: &mut Element) {
    if let Shape::Rectangle { width, height } = &mut element.shape {
        if *width < 0.0 {
            element.x += *width;
            *width = -*width;
        }
        if *height < 0.0 {
            element.y += *height;
            *height = -*height;
        }
    }
}

/// Map an element's geometry from its old bounds into new bounds, writing
/// back sign-normalized position/size fields per shape.
fn write_back_bounds(element: &mut Element, old: &Rect, new: &Rect) {
    let fx = |v: f64| {
        if old.width > 0.0 { (v - old.x) / old.width } else { 0.0 }
    };
    let fy = |v: f64| {
        if old.height > 0.0 { (v - old.y) / old.height } else { 0.0 }
    };
    match &mut element.shape {
        Shape::Rectangle { width, height }
        | Shape::SpaceEmbed { width, height, .. }
        | Shape::BlockEmbed { width, height, .. } => {
            element.x = new.x;
            element.y = new.y;
            *width = new.width;
            *height = new.height;
        }
        Shape::Line { width, height } | Shape::Arrow { width, height, .. } => {
            let start = Point::new(element.x, element.y);
            let end = Point::new(element.x + *width, element.y + *height);
            let ns = Point::new(new.x + fx(start.x) * new.width, new.y + fy(start.y) * new.height);
            let ne = Point::new(new.x + fx(end.x) * new.width, new.y + fy(end.y) * new.height);
            element.x = ns.x;
            element.y = ns.y;
            *width = ne.x - ns.x;
            *height = ne.y - ns.y;
        }
        Shape::Circle { radius } => {
            let center = new.center();
            element.x = center.x;
            element.y = center.y;
            *radius = new.width.min(new.height) / 2.0;
        }
        Shape::Path { points } => {
            for p in points.iter_mut() {
                p.x = new.x + fx(p.x) * new.width;
                p.y = new.y + fy(p.y) * new.height;
            }
        }
        Shape::Text { .. } => {}
    }
}
