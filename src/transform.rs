//! Transform engine: turns gesture deltas into layer store writes while
//! keeping every touched layer inside the print-safe boundary.
//!
//! Functions here are stateless. Gesture context (start positions, the group
//! anchor) lives in [`crate::selection::Gesture`] and is passed in, so each
//! pointer-move is computed from the gesture start rather than accumulated.

#[cfg(test)]
#[path = "transform_test.rs"]
mod transform_test;

use crate::consts::MIN_GROUP_SCALE;
use crate::geom::{Boundary, Point, Rect, Size, clamp_origin, clamp_proportional_resize};
use crate::layer::{Flip, GeometryPatch, Layer, LayerContent, LayerStore};
use crate::metrics::{TextMetrics, measured_size};
use crate::selection::LayerOrigin;

// =============================================================
// Translate
// =============================================================

/// Move every origin by `(dx, dy)` from its start position, clamping each
/// layer independently so it slides along the boundary edge instead of
/// leaving it.
pub fn translate(store: &mut LayerStore, origins: &[LayerOrigin], dx: f64, dy: f64, boundary: Option<&Boundary>) {
    for origin in origins {
        let target = origin.position.offset(dx, dy);
        let position = match boundary {
            Some(b) => clamp_origin(target, origin.measured, b),
            None => target,
        };
        store.update_geometry(&origin.id, &GeometryPatch::position(position));
    }
}

/// Pull a layer back inside the boundary. Returns `true` if it moved.
pub fn reclamp(store: &mut LayerStore, id: &str, measured: Size, boundary: &Boundary) -> bool {
    let Some(layer) = store.get(id) else {
        return false;
    };
    let clamped = clamp_origin(layer.position, measured, boundary);
    if clamped == layer.position {
        return false;
    }
    store.update_geometry(id, &GeometryPatch::position(clamped))
}

/// Pull a fresh duplicate inside the boundary without stacking it on its
/// source. A copy of a layer pinned to the far corner would clamp straight
/// back onto `source`; it is offset up and left by `offset` instead.
/// Returns `true` if it moved.
pub fn place_duplicate(
    store: &mut LayerStore,
    id: &str,
    source: Point,
    measured: Size,
    offset: f64,
    boundary: &Boundary,
) -> bool {
    let Some(layer) = store.get(id) else {
        return false;
    };
    let wanted = layer.position;
    let mut placed = clamp_origin(wanted, measured, boundary);
    if placed == source {
        placed = clamp_origin(source.offset(-offset, -offset), measured, boundary);
    }
    if placed == wanted {
        return false;
    }
    store.update_geometry(id, &GeometryPatch::position(placed))
}

// =============================================================
// Group resize
// =============================================================

/// Exponential mapping from horizontal travel to a scale factor.
#[must_use]
pub fn group_scale(dx: f64, divisor: f64) -> f64 {
    (dx / divisor).exp()
}

/// Largest scale that keeps `anchor`, grown from its top-left, inside the
/// boundary. `None` when the anchor already sits on or past the far edges.
#[must_use]
pub fn max_group_scale(anchor: &Rect, boundary: &Boundary) -> Option<f64> {
    let available_w = boundary.right() - anchor.left;
    let available_h = boundary.bottom() - anchor.top;
    if available_w <= 0.0 || available_h <= 0.0 {
        return None;
    }
    let by_w = if anchor.width > 0.0 { available_w / anchor.width } else { f64::INFINITY };
    let by_h = if anchor.height > 0.0 { available_h / anchor.height } else { f64::INFINITY };
    Some(by_w.min(by_h))
}

/// Clamp a raw scale into `[MIN_GROUP_SCALE, max_group_scale]`; the boundary
/// wins if the two conflict.
#[must_use]
pub fn clamp_group_scale(scale: f64, anchor: &Rect, boundary: Option<&Boundary>) -> Option<f64> {
    let floored = scale.max(MIN_GROUP_SCALE);
    match boundary {
        Some(b) => max_group_scale(anchor, b).map(|max| floored.min(max)),
        None => Some(floored),
    }
}

/// Scale every origin by `scale` about the anchor's top-left corner. Text
/// layers scale through their font size so the store's font floor applies.
pub fn apply_group_scale(store: &mut LayerStore, anchor: &Rect, origins: &[LayerOrigin], scale: f64) {
    for origin in origins {
        let position = Point::new(
            anchor.left + (origin.position.x - anchor.left) * scale,
            anchor.top + (origin.position.y - anchor.top) * scale,
        );
        let is_text = store.get(&origin.id).is_some_and(Layer::is_text);
        if is_text {
            store.update_geometry(&origin.id, &GeometryPatch::position(position));
            store.resize_font_size(&origin.id, origin.size.h * scale);
        } else {
            let patch = GeometryPatch { position: Some(position), size: Some(origin.size.scale(scale)), ..Default::default() };
            store.update_geometry(&origin.id, &patch);
        }
    }
}

// =============================================================
// Text handle fast path
// =============================================================

/// Font size for the text resize handle: linear in horizontal travel,
/// floored at `min_font`.
#[must_use]
pub fn text_handle_font(start_font: f64, dx: f64, slope: f64, min_font: f64) -> f64 {
    (start_font + dx * slope).max(min_font)
}

// =============================================================
// Single-layer resize, rotate, flip
// =============================================================

/// Aspect-locked resize of one layer to `requested_width` (in rendered
/// pixels), shrunk to fit the boundary. Returns `false` and leaves the layer
/// untouched when there is no room.
///
/// Text is resized through its font size. The stroke border does not grow
/// with the font, so only the glyph box is scaled and the stroke is added
/// back on top.
pub fn resize_layer(
    store: &mut LayerStore,
    id: &str,
    requested_width: f64,
    metrics: &dyn TextMetrics,
    boundary: Option<&Boundary>,
) -> bool {
    let Some(layer) = store.get(id) else {
        return false;
    };
    let measured = measured_size(layer, metrics);
    let glyphs = match &layer.content {
        LayerContent::Text(t) => Some(metrics.measure(&t.text, &t.font_family, layer.size.h, 0.0)),
        LayerContent::Image(_) => None,
    };
    let position = layer.position;
    let font = layer.size.h;

    let fitted = match boundary {
        Some(b) => clamp_proportional_resize(requested_width, measured.w, measured.h, position, b),
        None => Some(Size::new(requested_width, requested_width * measured.h / measured.w))
            .filter(|s| requested_width > 0.0 && s.w.is_finite() && s.h.is_finite() && s.h > 0.0),
    };
    let Some(fitted) = fitted else {
        tracing::debug!(id = %id, requested_width, "resize rejected: no finite fit inside boundary");
        return false;
    };

    let Some(glyphs) = glyphs else {
        return store.update_geometry(id, &GeometryPatch { size: Some(fitted), ..Default::default() });
    };
    let stroke = Size::new(measured.w - glyphs.w, measured.h - glyphs.h);
    let factor = ((fitted.w - stroke.w) / glyphs.w).min((fitted.h - stroke.h) / glyphs.h);
    if !(factor.is_finite() && factor > 0.0) {
        tracing::debug!(id = %id, requested_width, "resize rejected: narrower than the text stroke");
        return false;
    }
    store.resize_font_size(id, font * factor)
}

/// Fold any angle into `[-180, 180)`.
#[must_use]
pub fn normalize_rotation(degrees: f64) -> f64 {
    (degrees + 180.0).rem_euclid(360.0) - 180.0
}

/// Set a layer's rotation. Position and size are untouched.
pub fn rotate(store: &mut LayerStore, id: &str, degrees: f64) -> bool {
    store.update_geometry(id, &GeometryPatch { rotation: Some(normalize_rotation(degrees)), ..Default::default() })
}

/// Toggle a flip axis on a layer. Position and size are untouched.
pub fn flip(store: &mut LayerStore, id: &str, axis: Flip) -> bool {
    let Some(layer) = store.get(id) else {
        return false;
    };
    let next = layer.flip.toggled(axis);
    store.update_geometry(id, &GeometryPatch { flip: Some(next), ..Default::default() })
}
