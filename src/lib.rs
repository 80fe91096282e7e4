//! Scene-graph and interaction engine for the workspace's infinite-canvas
//! spaces.
//!
//! This crate owns everything between raw pointer/keyboard input and the
//! persisted element array: the element data model, coordinate transforms for
//! pan/zoom, hit-testing, selection, drag/resize/creation gestures, connector
//! anchoring, and z-order/group operations. The host UI layer wires events
//! into [`engine::CanvasEngine`] and processes the returned
//! [`engine::Action`]s (re-render, persist, push an undo/redo entry). The
//! engine never renders and never talks to storage directly.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Top-level [`engine::CanvasEngine`]: event handlers and commits |
//! | [`element`] | Element sum type and the z-ordered [`element::ElementStore`] |
//! | [`geometry`] | Points and normalized axis-aligned rectangles |
//! | [`bounds`] | Per-shape bounding box computation |
//! | [`transform`] | ViewBox pan/zoom and screen↔canvas mapping |
//! | [`hit`] | Topmost-wins hit test, marquee intersection, resize handles |
//! | [`selection`] | Click/shift/marquee selection with group expansion |
//! | [`anchor`] | Connector side snapping and the moved-element cascade |
//! | [`arrange`] | Z-order moves and group/ungroup |
//! | [`interaction`] | Tools, modifiers, and the gesture state machine |
//! | [`consts`] | Shared numeric constants (extent, zoom limits, slop) |

pub mod anchor;
pub mod arrange;
pub mod bounds;
pub mod consts;
pub mod element;
pub mod engine;
pub mod geometry;
pub mod hit;
pub mod interaction;
pub mod selection;
pub mod transform;
