//! Auto-fit: shrink text layers that overflow the print-safe boundary.
//!
//! The pass observes [`LayerChange`]s instead of rescanning the store. Each
//! observed change queues the layer; the next frame re-measures it and, if it
//! still overflows, takes one pixel off its font size. That write is itself a
//! change, so the layer is queued again for the following frame. Shrinking
//! therefore happens one step per frame and stops at the font floor.

#[cfg(test)]
#[path = "autofit_test.rs"]
mod autofit_test;

use crate::consts::MIN_FONT_SIZE_PX;
use crate::geom::{Boundary, Rect};
use crate::layer::{Layer, LayerChange, LayerId, LayerStore};
use crate::metrics::{TextMetrics, layer_rect};

/// Font pixels removed per auto-fit step.
const SHRINK_STEP_PX: f64 = 1.0;

/// Next font size for a layer occupying `rect`, or `None` when no shrink is
/// due (it fits, or it is already at the floor).
#[must_use]
pub fn next_font_size(rect: &Rect, boundary: &Boundary, font_size: f64, min_font_size: f64) -> Option<f64> {
    if rect.fits_within(boundary) || font_size <= min_font_size {
        return None;
    }
    Some((font_size - SHRINK_STEP_PX).max(min_font_size))
}

#[derive(Debug, Clone)]
pub struct AutoFit {
    min_font_size: f64,
    /// Text layers waiting for the next frame, in arrival order.
    pending: Vec<LayerId>,
}

impl Default for AutoFit {
    fn default() -> Self {
        Self::new(MIN_FONT_SIZE_PX)
    }
}

impl AutoFit {
    #[must_use]
    pub fn new(min_font_size: f64) -> Self {
        Self { min_font_size, pending: Vec::new() }
    }

    /// React to one store change. Only text layers are queued.
    pub fn observe(&mut self, change: &LayerChange, store: &LayerStore) {
        match change {
            LayerChange::Removed(id) => self.pending.retain(|p| p != id),
            LayerChange::Created(id) | LayerChange::Geometry(id) | LayerChange::Content(id) => {
                let is_text = store.get(id).is_some_and(Layer::is_text);
                if is_text {
                    self.queue(id);
                }
            }
        }
    }

    /// The boundary moved: every text layer needs another look.
    pub fn observe_boundary(&mut self, store: &LayerStore) {
        for layer in store.iter().filter(|l| l.is_text()) {
            self.queue(&layer.id);
        }
    }

    fn queue(&mut self, id: &LayerId) {
        if !self.pending.contains(id) {
            self.pending.push(id.clone());
        }
    }

    #[must_use]
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Run one frame: re-measure every queued layer, refresh its cached width,
    /// and take one step off any that overflow. Returns the ids that shrank.
    pub fn run_frame(
        &mut self,
        store: &mut LayerStore,
        metrics: &dyn TextMetrics,
        boundary: Option<&Boundary>,
    ) -> Vec<LayerId> {
        let queued = std::mem::take(&mut self.pending);
        let mut shrunk = Vec::new();

        for id in queued {
            let Some(layer) = store.get(&id) else {
                continue;
            };
            let Some(font_size) = layer.font_size() else {
                continue;
            };
            let rect = layer_rect(layer, metrics);
            store.cache_text_width(&id, rect.width);

            let Some(boundary) = boundary else {
                continue;
            };
            if let Some(next) = next_font_size(&rect, boundary, font_size, self.min_font_size) {
                tracing::debug!(id = %id, from = font_size, to = next, "auto-fit shrink");
                store.resize_font_size(&id, next);
                shrunk.push(id);
            }
        }
        shrunk
    }
}
