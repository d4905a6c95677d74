#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::geom::Point;
use crate::layer::LayerId;
use crate::render::{Affordance, Scene};

/// What a pointer landed on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Hit {
    Affordance(Affordance),
    Layer(LayerId),
}

/// Test what is under `pt`, checking the selection affordances first and
/// then layers from the top of the paint order down.
#[must_use]
pub fn hit_test(pt: Point, scene: &Scene<'_>) -> Option<Hit> {
    if let Some(overlay) = &scene.overlay {
        if let Some(handle) = overlay.handles.iter().find(|h| h.contains(pt)) {
            return Some(Hit::Affordance(handle.affordance));
        }
    }
    scene
        .layers
        .iter()
        .rev()
        .find(|d| d.contains(pt))
        .map(|d| Hit::Layer(d.layer.id.clone()))
}

/// Whether `pt` falls on any of `ids` as drawn.
#[must_use]
pub fn hits_any(pt: Point, scene: &Scene<'_>, ids: &[LayerId]) -> bool {
    scene
        .layers
        .iter()
        .any(|d| ids.contains(&d.layer.id) && d.contains(pt))
}

/// CSS cursor hint for an idle pointer over `hit`.
#[must_use]
pub fn cursor_for(hit: Option<&Hit>) -> &'static str {
    match hit {
        Some(Hit::Affordance(Affordance::Resize)) => "nwse-resize",
        Some(Hit::Affordance(Affordance::Delete | Affordance::Duplicate)) => "pointer",
        Some(Hit::Layer(_)) => "move",
        None => "default",
    }
}
