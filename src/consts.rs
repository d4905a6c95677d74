//! Shared numeric constants for the design canvas.

// ── Layer store ─────────────────────────────────────────────────

/// Offset in canvas pixels applied to both axes of a duplicated layer.
pub const DUPLICATE_OFFSET_PX: f64 = 20.0;

/// Smallest font size the store will accept for a text layer.
pub const MIN_FONT_SIZE_PX: f64 = 2.0;

// ── Gestures ────────────────────────────────────────────────────

/// Horizontal pointer travel that scales a group by a factor of `e`.
pub const GROUP_RESIZE_DIVISOR_PX: f64 = 200.0;

/// Font pixels gained per pixel of horizontal drag on the text resize handle.
pub const TEXT_RESIZE_SLOPE: f64 = 0.4;

/// Floor for the text resize handle fast path.
pub const TEXT_RESIZE_MIN_FONT_PX: f64 = 8.0;

/// Lower bound on the group resize scale factor, relative to gesture start.
pub const MIN_GROUP_SCALE: f64 = 0.05;

// ── Overlay ─────────────────────────────────────────────────────

/// Radius of the delete / duplicate / resize affordances, in canvas pixels.
pub const AFFORDANCE_RADIUS_PX: f64 = 10.0;
