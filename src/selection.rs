//! Selection set, marquee, and the gesture session state machine.
//!
//! A [`Gesture`] is created on pointer-down and owns every piece of context
//! the gesture needs until its terminal event (pointer-up, pointer-cancel or
//! Escape). [`SelectionController`] holds at most one gesture; while one is
//! active new pointer-downs are refused, and tearing it down is a single
//! `take` so no handler outlives its gesture.

#[cfg(test)]
#[path = "selection_test.rs"]
mod selection_test;

use std::collections::HashMap;

use crate::geom::{Point, Rect, Size};
use crate::layer::{LayerId, LayerStore};

// =============================================================
// Selection
// =============================================================

/// Ordered, duplicate-free set of selected layer ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: Vec<LayerId>,
}

impl Selection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn ids(&self) -> &[LayerId] {
        &self.ids
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|s| s == id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Replace the whole set. Returns `true` if the set changed.
    pub fn replace<I>(&mut self, ids: I) -> bool
    where
        I: IntoIterator<Item = LayerId>,
    {
        let mut next: Vec<LayerId> = Vec::new();
        for id in ids {
            if !next.contains(&id) {
                next.push(id);
            }
        }
        if next == self.ids {
            return false;
        }
        self.ids = next;
        true
    }

    /// Returns `true` if the set was non-empty.
    pub fn clear(&mut self) -> bool {
        let changed = !self.ids.is_empty();
        self.ids.clear();
        changed
    }

    /// Add `id` if absent, remove it if present. Returns whether it is now
    /// selected.
    pub fn toggle(&mut self, id: &str) -> bool {
        if let Some(idx) = self.ids.iter().position(|s| s == id) {
            self.ids.remove(idx);
            false
        } else {
            self.ids.push(id.to_string());
            true
        }
    }

    /// Drop ids that no longer exist in `store`. Returns `true` if any were
    /// dropped.
    pub fn reconcile(&mut self, store: &LayerStore) -> bool {
        let before = self.ids.len();
        self.ids.retain(|id| store.contains(id));
        before != self.ids.len()
    }
}

// =============================================================
// Marquee
// =============================================================

/// Drag-to-select rectangle and the layers it currently touches.
#[derive(Debug, Clone, PartialEq)]
pub struct Marquee {
    pub origin: Point,
    pub current: Point,
    pub hovered: HashMap<LayerId, bool>,
}

impl Marquee {
    #[must_use]
    pub fn new(origin: Point) -> Self {
        Self { origin, current: origin, hovered: HashMap::new() }
    }

    #[must_use]
    pub fn rect(&self) -> Rect {
        Rect::from_corners(self.origin, self.current)
    }

    /// Move the free corner and re-test every layer rectangle against the
    /// marquee. Edge contact alone does not count.
    pub fn update<'a, I>(&mut self, current: Point, layers: I)
    where
        I: IntoIterator<Item = (&'a LayerId, Rect)>,
    {
        self.current = current;
        let rect = self.rect();
        self.hovered = layers
            .into_iter()
            .map(|(id, layer_rect)| (id.clone(), layer_rect.intersects(&rect)))
            .collect();
    }

    #[must_use]
    pub fn is_hovered(&self, id: &str) -> bool {
        self.hovered.get(id).copied().unwrap_or(false)
    }

    /// Hovered ids in the order given by `order`.
    #[must_use]
    pub fn hovered_ids(&self, order: &[LayerId]) -> Vec<LayerId> {
        order.iter().filter(|id| self.is_hovered(id)).cloned().collect()
    }
}

// =============================================================
// Gesture session
// =============================================================

/// Where one selected layer started when a gesture began.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerOrigin {
    pub id: LayerId,
    pub position: Point,
    /// Stored size (font size in `h` for text).
    pub size: Size,
    /// Rendered size, used for boundary clamping.
    pub measured: Size,
}

/// Pointer interaction mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Idle,
    DraggingLayers,
    MarqueeSelecting,
    GroupResizing,
    TextResizing,
}

/// An active pointer gesture with everything needed to compute deltas from
/// its start.
#[derive(Debug, Clone, PartialEq)]
pub enum Gesture {
    /// Translating every selected layer by the same delta.
    DraggingLayers { start: Point, origins: Vec<LayerOrigin> },
    /// Drawing a selection rectangle.
    MarqueeSelecting(Marquee),
    /// Proportional scaling of the selection about `anchor`'s top-left.
    GroupResizing {
        start: Point,
        /// Selection box captured once at gesture start.
        anchor: Rect,
        origins: Vec<LayerOrigin>,
    },
    /// Text resize-handle fast path: font size follows horizontal travel.
    TextResizing { start: Point, fonts: Vec<(LayerId, f64)> },
}

impl Gesture {
    #[must_use]
    pub fn mode(&self) -> Mode {
        match self {
            Self::DraggingLayers { .. } => Mode::DraggingLayers,
            Self::MarqueeSelecting(_) => Mode::MarqueeSelecting,
            Self::GroupResizing { .. } => Mode::GroupResizing,
            Self::TextResizing { .. } => Mode::TextResizing,
        }
    }
}

/// The committed selection plus the (at most one) active gesture.
#[derive(Debug, Clone, Default)]
pub struct SelectionController {
    pub selection: Selection,
    gesture: Option<Gesture>,
}

impl SelectionController {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn mode(&self) -> Mode {
        self.gesture.as_ref().map_or(Mode::Idle, Gesture::mode)
    }

    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.gesture.is_none()
    }

    /// Start a gesture. Refused (returns `false`) while another is active.
    pub fn begin(&mut self, gesture: Gesture) -> bool {
        if self.gesture.is_some() {
            return false;
        }
        self.gesture = Some(gesture);
        true
    }

    #[must_use]
    pub fn gesture(&self) -> Option<&Gesture> {
        self.gesture.as_ref()
    }

    pub fn gesture_mut(&mut self) -> Option<&mut Gesture> {
        self.gesture.as_mut()
    }

    /// Tear down the active gesture, handing it back for its final step.
    pub fn finish(&mut self) -> Option<Gesture> {
        self.gesture.take()
    }

    /// The live marquee, if one is being drawn.
    #[must_use]
    pub fn marquee(&self) -> Option<&Marquee> {
        match &self.gesture {
            Some(Gesture::MarqueeSelecting(m)) => Some(m),
            _ => None,
        }
    }
}
