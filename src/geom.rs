//! Geometry primitives and the pure helpers the rest of the canvas builds on.
//!
//! All coordinates are canvas pixels with the origin at the top-left and `y`
//! growing downwards. Nothing in this module knows about layers beyond an id
//! lookup; it only answers questions about points, sizes and rectangles.

#[cfg(test)]
#[path = "geom_test.rs"]
mod geom_test;

use std::collections::HashMap;
use std::hash::BuildHasher;

use serde::{Deserialize, Serialize};

/// Tolerance used when comparing an edge against the boundary.
const EDGE_EPSILON: f64 = 1e-9;

/// A point in canvas space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Component-wise offset by `dx`, `dy`.
    #[must_use]
    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self { x: self.x + dx, y: self.y + dy }
    }
}

/// A width/height pair in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub w: f64,
    pub h: f64,
}

impl Size {
    #[must_use]
    pub fn new(w: f64, h: f64) -> Self {
        Self { w, h }
    }

    #[must_use]
    pub fn scale(self, factor: f64) -> Self {
        Self { w: self.w * factor, h: self.h * factor }
    }
}

/// Axis-aligned rectangle. Also used for the print-safe boundary and for
/// selection bounding boxes.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

/// The print-safe region supplied per product view.
pub type Boundary = Rect;

impl Rect {
    #[must_use]
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self { left, top, width, height }
    }

    /// Rectangle anchored at `origin` with the given size.
    #[must_use]
    pub fn at(origin: Point, size: Size) -> Self {
        Self { left: origin.x, top: origin.y, width: size.w, height: size.h }
    }

    /// Normalised rectangle spanning two arbitrary corners.
    #[must_use]
    pub fn from_corners(a: Point, b: Point) -> Self {
        let left = a.x.min(b.x);
        let top = a.y.min(b.y);
        Self { left, top, width: (a.x - b.x).abs(), height: (a.y - b.y).abs() }
    }

    #[must_use]
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    #[must_use]
    pub fn origin(&self) -> Point {
        Point::new(self.left, self.top)
    }

    #[must_use]
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Positive-area overlap on both axes. Rectangles that only share an
    /// edge do not intersect.
    #[must_use]
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left < other.right() && other.left < self.right() && self.top < other.bottom() && other.top < self.bottom()
    }

    /// Whether `pt` lies inside the rectangle (edges inclusive).
    #[must_use]
    pub fn contains(&self, pt: Point) -> bool {
        pt.x >= self.left && pt.x <= self.right() && pt.y >= self.top && pt.y <= self.bottom()
    }

    /// Whether this rectangle lies entirely inside `outer`.
    #[must_use]
    pub fn fits_within(&self, outer: &Rect) -> bool {
        self.left >= outer.left - EDGE_EPSILON
            && self.top >= outer.top - EDGE_EPSILON
            && self.right() <= outer.right() + EDGE_EPSILON
            && self.bottom() <= outer.bottom() + EDGE_EPSILON
    }

    /// Smallest rectangle enclosing both.
    #[must_use]
    pub fn union(&self, other: &Rect) -> Rect {
        let left = self.left.min(other.left);
        let top = self.top.min(other.top);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Rect { left, top, width: right - left, height: bottom - top }
    }
}

/// Smallest rectangle enclosing every rectangle in `rects`, or `None` when
/// the iterator is empty.
pub fn union_all<I>(rects: I) -> Option<Rect>
where
    I: IntoIterator<Item = Rect>,
{
    rects.into_iter().reduce(|acc, r| acc.union(&r))
}

/// Minimal axis-aligned box around every id that has both a position and a
/// size entry.
///
/// Ids missing from either map are skipped. Returns `None` when no id
/// resolves. Repeated ids do not change the result.
pub fn compute_bounding_box<I, S, H>(
    positions: &HashMap<String, Point, H>,
    sizes: &HashMap<String, Size, H>,
    ids: I,
) -> Option<Rect>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
    H: BuildHasher,
{
    union_all(ids.into_iter().filter_map(|id| {
        let id = id.as_ref();
        let pos = positions.get(id)?;
        let size = sizes.get(id)?;
        Some(Rect::at(*pos, *size))
    }))
}

/// Aspect-locked resize that never leaves the boundary.
///
/// The requested width keeps the `current_height / current_width` ratio.
/// Both dimensions are then scaled down (never up) until the far edges sit at
/// or inside `boundary.right()` / `boundary.bottom()`. Returns `None` when
/// there is no room at `position` or the inputs cannot produce a finite
/// positive size; callers must leave the layer untouched in that case.
#[must_use]
pub fn clamp_proportional_resize(
    requested_width: f64,
    current_width: f64,
    current_height: f64,
    position: Point,
    boundary: &Boundary,
) -> Option<Size> {
    let positive = |v: f64| v.is_finite() && v > 0.0;
    if !(positive(requested_width) && positive(current_width) && positive(current_height)) {
        return None;
    }
    let available_w = boundary.right() - position.x;
    let available_h = boundary.bottom() - position.y;
    if available_w <= 0.0 || available_h <= 0.0 {
        return None;
    }

    let width = requested_width;
    let height = requested_width * (current_height / current_width);
    if !height.is_finite() {
        return None;
    }
    let scale = (available_w / width).min(available_h / height).min(1.0);

    positive(scale).then(|| Size::new(width * scale, height * scale))
}

/// Clamp `origin` component-wise so a box of `size` stays inside `boundary`.
///
/// A box larger than the boundary on an axis is pinned to the boundary's
/// leading edge on that axis.
#[must_use]
pub fn clamp_origin(origin: Point, size: Size, boundary: &Boundary) -> Point {
    Point {
        x: clamp_axis(origin.x, size.w, boundary.left, boundary.right()),
        y: clamp_axis(origin.y, size.h, boundary.top, boundary.bottom()),
    }
}

fn clamp_axis(value: f64, extent: f64, lo: f64, hi: f64) -> f64 {
    let max = (hi - extent).max(lo);
    value.max(lo).min(max)
}
