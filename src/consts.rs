//! Shared numeric constants for the scene engine.

// ── Canvas extent ───────────────────────────────────────────────

/// Width of the canvas coordinate space in canvas units.
pub const CANVAS_WIDTH: f64 = 10_000.0;

/// Height of the canvas coordinate space in canvas units.
pub const CANVAS_HEIGHT: f64 = 8_000.0;

// ── Zoom ────────────────────────────────────────────────────────

/// Minimum zoom scalar (most zoomed out).
pub const ZOOM_MIN: f64 = 0.1;

/// Maximum zoom scalar (most zoomed in).
pub const ZOOM_MAX: f64 = 10.0;

/// Multiplicative zoom change per wheel step.
pub const ZOOM_STEP: f64 = 1.1;

/// Padding added around content by zoom-to-fit, as a fraction of each
/// dimension of the fitted bounds.
pub const FIT_PADDING_RATIO: f64 = 0.1;

// ── Hit-testing ─────────────────────────────────────────────────

/// Screen-space hit slop in pixels for resize handles.
pub const HANDLE_RADIUS_PX: f64 = 8.0;

// ── Creation ────────────────────────────────────────────────────

/// Drag-created shapes smaller than this in both dimensions (canvas units)
/// are discarded as accidental clicks.
pub const MIN_SHAPE_SIZE: f64 = 2.0;

// ── Embeds ──────────────────────────────────────────────────────

/// Initial width of a dropped space/block embed tile, in canvas units.
pub const EMBED_WIDTH: f64 = 320.0;

/// Initial height of a dropped space/block embed tile, in canvas units.
pub const EMBED_HEIGHT: f64 = 180.0;

// ── Text metrics ────────────────────────────────────────────────

/// Approximate glyph advance as a fraction of font size.
pub const TEXT_WIDTH_FACTOR: f64 = 0.6;

/// Approximate line height as a multiple of font size.
pub const TEXT_HEIGHT_FACTOR: f64 = 1.2;
