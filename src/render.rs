//! Rendering: builds the display list for the current canvas state.
//!
//! The canvas does not own a drawing surface. [`build_scene`] turns the layer
//! store, the selection and the live marquee into a [`Scene`] that the host
//! paints in order. It receives read-only views and never mutates state.
//!
//! Paint order is two-tier: every unselected, unhovered layer first, then the
//! selected or hovered ones, each tier keeping store order. The selection
//! overlay is one box around the whole selection, as drawn after rotation,
//! with three affordances on its corners.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use crate::consts::AFFORDANCE_RADIUS_PX;
use crate::geom::{Point, Rect, Size, union_all};
use crate::layer::{Flip, Layer};
use crate::metrics::{TextMetrics, layer_rect};
use crate::selection::{Marquee, Selection};

/// Stacking tier for a layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Tier {
    Base,
    Raised,
}

/// 2D affine transform `[a, b, c, d, e, f]` in canvas `setTransform` order:
/// `x' = a*x + c*y + e`, `y' = b*x + d*y + f`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Affine(pub [f64; 6]);

impl Affine {
    pub const IDENTITY: Self = Self([1.0, 0.0, 0.0, 1.0, 0.0, 0.0]);

    /// `self` applied after `rhs`.
    #[must_use]
    pub fn then(self, rhs: Affine) -> Affine {
        let [a1, b1, c1, d1, e1, f1] = rhs.0;
        let [a2, b2, c2, d2, e2, f2] = self.0;
        Affine([
            a2 * a1 + c2 * b1,
            b2 * a1 + d2 * b1,
            a2 * c1 + c2 * d1,
            b2 * c1 + d2 * d1,
            a2 * e1 + c2 * f1 + e2,
            b2 * e1 + d2 * f1 + f2,
        ])
    }

    #[must_use]
    pub fn translate(dx: f64, dy: f64) -> Affine {
        Affine([1.0, 0.0, 0.0, 1.0, dx, dy])
    }

    #[must_use]
    pub fn rotate_deg(degrees: f64) -> Affine {
        let (sin, cos) = degrees.to_radians().sin_cos();
        Affine([cos, sin, -sin, cos, 0.0, 0.0])
    }

    #[must_use]
    pub fn scale(sx: f64, sy: f64) -> Affine {
        Affine([sx, 0.0, 0.0, sy, 0.0, 0.0])
    }

    #[must_use]
    pub fn apply(&self, pt: Point) -> Point {
        let [a, b, c, d, e, f] = self.0;
        Point::new(a * pt.x + c * pt.y + e, b * pt.x + d * pt.y + f)
    }

    /// Inverse transform, or `None` when the matrix is singular.
    #[must_use]
    pub fn invert(&self) -> Option<Affine> {
        let [a, b, c, d, e, f] = self.0;
        let det = a * d - b * c;
        if det.abs() < f64::EPSILON {
            return None;
        }
        Some(Affine([
            d / det,
            -b / det,
            -c / det,
            a / det,
            (c * f - d * e) / det,
            (b * e - a * f) / det,
        ]))
    }
}

/// Local-to-canvas transform for a layer: flip about its center, rotate about
/// its top-left, then move to its position. Local space spans `(0,0)` to
/// `(width, height)`.
#[must_use]
pub fn layer_transform(rect: &Rect, rotation: f64, flip: Flip) -> Affine {
    let (sx, sy) = match flip {
        Flip::None => (1.0, 1.0),
        Flip::Horizontal => (-1.0, 1.0),
        Flip::Vertical => (1.0, -1.0),
    };
    let cx = rect.width * 0.5;
    let cy = rect.height * 0.5;
    let mirror = Affine::translate(cx, cy)
        .then(Affine::scale(sx, sy))
        .then(Affine::translate(-cx, -cy));
    Affine::translate(rect.left, rect.top)
        .then(Affine::rotate_deg(rotation))
        .then(mirror)
}

/// Axis-aligned canvas box around `rect`'s local corners mapped through
/// `transform`.
#[must_use]
pub fn drawn_bounds(rect: &Rect, transform: &Affine) -> Rect {
    let corners = [(0.0, 0.0), (rect.width, 0.0), (0.0, rect.height), (rect.width, rect.height)]
        .map(|(x, y)| Rect::at(transform.apply(Point::new(x, y)), Size::default()));
    corners.iter().fold(corners[0], |acc, corner| acc.union(corner))
}

/// Canvas-space bounds of a layer as drawn, rotation and flip included.
#[must_use]
pub fn layer_bounds(layer: &Layer, metrics: &dyn TextMetrics) -> Rect {
    let rect = layer_rect(layer, metrics);
    drawn_bounds(&rect, &layer_transform(&rect, layer.rotation, layer.flip))
}

/// One layer in the display list.
#[derive(Debug, Clone)]
pub struct DrawLayer<'a> {
    pub layer: &'a Layer,
    /// Measured, unrotated rectangle.
    pub rect: Rect,
    pub transform: Affine,
    pub tier: Tier,
}

impl DrawLayer<'_> {
    /// Whether `pt` falls inside the layer as drawn, rotation included.
    #[must_use]
    pub fn contains(&self, pt: Point) -> bool {
        let Some(inverse) = self.transform.invert() else {
            return false;
        };
        let local = inverse.apply(pt);
        Rect::new(0.0, 0.0, self.rect.width, self.rect.height).contains(local)
    }

    /// Axis-aligned box the drawn layer covers.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        drawn_bounds(&self.rect, &self.transform)
    }
}

/// Controls anchored on the selection box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Affordance {
    /// Top-right.
    Delete,
    /// Bottom-left.
    Duplicate,
    /// Bottom-right.
    Resize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Handle {
    pub affordance: Affordance,
    pub center: Point,
    pub radius: f64,
}

impl Handle {
    #[must_use]
    pub fn contains(&self, pt: Point) -> bool {
        let dx = pt.x - self.center.x;
        let dy = pt.y - self.center.y;
        dx * dx + dy * dy <= self.radius * self.radius
    }
}

/// Single bounding box around the entire selection.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionOverlay {
    pub bounds: Rect,
    pub handles: [Handle; 3],
}

impl SelectionOverlay {
    #[must_use]
    pub fn new(bounds: Rect) -> Self {
        let handle = |affordance, center| Handle { affordance, center, radius: AFFORDANCE_RADIUS_PX };
        Self {
            bounds,
            handles: [
                handle(Affordance::Delete, Point::new(bounds.right(), bounds.top)),
                handle(Affordance::Duplicate, Point::new(bounds.left, bounds.bottom())),
                handle(Affordance::Resize, Point::new(bounds.right(), bounds.bottom())),
            ],
        }
    }

    #[must_use]
    pub fn handle(&self, affordance: Affordance) -> Handle {
        match affordance {
            Affordance::Delete => self.handles[0],
            Affordance::Duplicate => self.handles[1],
            Affordance::Resize => self.handles[2],
        }
    }
}

/// Everything the host needs to paint one frame, in paint order.
#[derive(Debug, Clone)]
pub struct Scene<'a> {
    pub layers: Vec<DrawLayer<'a>>,
    pub overlay: Option<SelectionOverlay>,
    pub marquee: Option<Rect>,
}

/// Build the display list.
#[must_use]
pub fn build_scene<'a>(
    layers: impl Iterator<Item = &'a Layer>,
    metrics: &dyn TextMetrics,
    selection: &Selection,
    marquee: Option<&Marquee>,
) -> Scene<'a> {
    let mut drawn: Vec<DrawLayer<'a>> = layers
        .map(|layer| {
            let rect = layer_rect(layer, metrics);
            let raised = selection.contains(&layer.id) || marquee.is_some_and(|m| m.is_hovered(&layer.id));
            DrawLayer {
                layer,
                rect,
                transform: layer_transform(&rect, layer.rotation, layer.flip),
                tier: if raised { Tier::Raised } else { Tier::Base },
            }
        })
        .collect();
    // Stable: store order survives inside each tier.
    drawn.sort_by_key(|d| d.tier);

    let overlay = union_all(
        drawn
            .iter()
            .filter(|d| selection.contains(&d.layer.id))
            .map(DrawLayer::bounds),
    )
    .map(SelectionOverlay::new);

    Scene { layers: drawn, overlay, marquee: marquee.map(Marquee::rect) }
}
