//! Layer model and the authoritative layer store.
//!
//! A [`Layer`] is one placeable design element: text, an uploaded image or a
//! clip-art image. [`LayerStore`] owns every live layer, keeps their paint
//! order, and records a [`LayerChange`] for each mutation so observers (the
//! auto-fit pass, property panels) react to exactly the layers that moved.

#[cfg(test)]
#[path = "layer_test.rs"]
mod layer_test;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::consts::{DUPLICATE_OFFSET_PX, MIN_FONT_SIZE_PX};
use crate::geom::{Point, Size};

/// Opaque layer identifier, stable for the layer's lifetime.
pub type LayerId = String;

/// Mirror applied about the layer's own center.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Flip {
    #[default]
    None,
    Horizontal,
    Vertical,
}

impl Flip {
    /// Flip along `axis`: applying the current axis again clears the flip.
    #[must_use]
    pub fn toggled(self, axis: Flip) -> Flip {
        if self == axis { Flip::None } else { axis }
    }
}

/// Content of a text layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextContent {
    pub text: String,
    pub font_family: String,
    pub color: String,
    pub border_color: String,
    pub border_width: f64,
}

/// Content of an image layer (upload or clip-art).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageContent {
    pub source_url: String,
    #[serde(default)]
    pub is_clipart: bool,
}

/// Per-kind attributes. Every site that inspects the kind matches on this.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum LayerContent {
    Text(TextContent),
    Image(ImageContent),
}

/// A single placeable design element.
///
/// For text layers `size.h` is the font size in pixels and `size.w` is a
/// cache of the last measured glyph width; the measured box is the source of
/// truth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    pub id: LayerId,
    pub position: Point,
    pub size: Size,
    /// Degrees, applied visually about the top-left origin.
    #[serde(default)]
    pub rotation: f64,
    #[serde(default)]
    pub flip: Flip,
    #[serde(flatten)]
    pub content: LayerContent,
}

impl Layer {
    /// A text layer with default styling. The width is filled in on first
    /// measurement.
    #[must_use]
    pub fn text(id: impl Into<LayerId>, position: Point, text: impl Into<String>, font_size: f64) -> Self {
        Self {
            id: id.into(),
            position,
            size: Size::new(0.0, font_size),
            rotation: 0.0,
            flip: Flip::None,
            content: LayerContent::Text(TextContent {
                text: text.into(),
                font_family: "sans-serif".into(),
                color: "#000000".into(),
                border_color: "#000000".into(),
                border_width: 0.0,
            }),
        }
    }

    /// An uploaded image layer.
    #[must_use]
    pub fn image(id: impl Into<LayerId>, position: Point, size: Size, source_url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            position,
            size,
            rotation: 0.0,
            flip: Flip::None,
            content: LayerContent::Image(ImageContent { source_url: source_url.into(), is_clipart: false }),
        }
    }

    /// A clip-art image layer; its source can be swapped later.
    #[must_use]
    pub fn clipart(id: impl Into<LayerId>, position: Point, size: Size, source_url: impl Into<String>) -> Self {
        Self {
            content: LayerContent::Image(ImageContent { source_url: source_url.into(), is_clipart: true }),
            ..Self::image(id, position, size, "")
        }
    }

    #[must_use]
    pub fn is_text(&self) -> bool {
        matches!(self.content, LayerContent::Text(_))
    }

    /// Font size for text layers.
    #[must_use]
    pub fn font_size(&self) -> Option<f64> {
        match self.content {
            LayerContent::Text(_) => Some(self.size.h),
            LayerContent::Image(_) => None,
        }
    }
}

/// Sparse geometry update. Absent fields are left as they are.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GeometryPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<Point>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<Size>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flip: Option<Flip>,
}

impl GeometryPatch {
    #[must_use]
    pub fn position(position: Point) -> Self {
        Self { position: Some(position), ..Self::default() }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.position.is_none() && self.size.is_none() && self.rotation.is_none() && self.flip.is_none()
    }
}

/// One store mutation, recorded per layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayerChange {
    Created(LayerId),
    Geometry(LayerId),
    Content(LayerId),
    Removed(LayerId),
}

impl LayerChange {
    #[must_use]
    pub fn id(&self) -> &LayerId {
        match self {
            Self::Created(id) | Self::Geometry(id) | Self::Content(id) | Self::Removed(id) => id,
        }
    }
}

/// Authoritative store of every layer, addressable by id, in paint order.
#[derive(Debug)]
pub struct LayerStore {
    layers: HashMap<LayerId, Layer>,
    /// Back-to-front paint order.
    order: Vec<LayerId>,
    changes: Vec<LayerChange>,
    duplicate_offset: f64,
    min_font_size: f64,
}

impl LayerStore {
    /// Create an empty store with the default duplicate offset and font floor.
    #[must_use]
    pub fn new() -> Self {
        Self::with_limits(DUPLICATE_OFFSET_PX, MIN_FONT_SIZE_PX)
    }

    #[must_use]
    pub fn with_limits(duplicate_offset: f64, min_font_size: f64) -> Self {
        Self { layers: HashMap::new(), order: Vec::new(), changes: Vec::new(), duplicate_offset, min_font_size }
    }

    /// Insert a layer on top of the paint order, or replace an existing one
    /// in place.
    pub fn insert(&mut self, layer: Layer) {
        let id = layer.id.clone();
        if self.layers.insert(id.clone(), layer).is_none() {
            self.order.push(id.clone());
        }
        self.changes.push(LayerChange::Created(id));
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Layer> {
        self.layers.get(id)
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.layers.contains_key(id)
    }

    /// Layers back to front.
    pub fn iter(&self) -> impl Iterator<Item = &Layer> {
        self.order.iter().filter_map(|id| self.layers.get(id))
    }

    /// Ids back to front.
    #[must_use]
    pub fn ids(&self) -> &[LayerId] {
        &self.order
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Copy each existing source layer, offset by the duplicate delta, and
    /// return the new ids in input order. Unknown ids produce nothing.
    pub fn duplicate<S: AsRef<str>>(&mut self, ids: &[S]) -> Vec<LayerId> {
        let mut created = Vec::with_capacity(ids.len());
        for source in ids {
            let source = source.as_ref();
            let Some(original) = self.layers.get(source) else {
                tracing::debug!(id = %source, "duplicate skipped unknown layer");
                continue;
            };
            let mut copy = original.clone();
            copy.id = self.fresh_id(source);
            copy.position = copy.position.offset(self.duplicate_offset, self.duplicate_offset);
            created.push(copy.id.clone());
            self.insert(copy);
        }
        created
    }

    fn fresh_id(&self, source: &str) -> LayerId {
        loop {
            let candidate = format!("{source}-{}", Uuid::new_v4().simple());
            if !self.layers.contains_key(&candidate) {
                return candidate;
            }
        }
    }

    /// Merge the present patch fields into the layer. Returns `false` if the
    /// layer does not exist.
    pub fn update_geometry(&mut self, id: &str, patch: &GeometryPatch) -> bool {
        let Some(layer) = self.layers.get_mut(id) else {
            return false;
        };
        if patch.is_empty() {
            return true;
        }
        if let Some(position) = patch.position {
            layer.position = position;
        }
        if let Some(size) = patch.size {
            layer.size = size;
        }
        if let Some(rotation) = patch.rotation {
            layer.rotation = rotation;
        }
        if let Some(flip) = patch.flip {
            layer.flip = flip;
        }
        self.changes.push(LayerChange::Geometry(layer.id.clone()));
        true
    }

    /// Delete every matching layer and return the ids that were present.
    pub fn remove<S: AsRef<str>>(&mut self, ids: &[S]) -> Vec<LayerId> {
        let mut removed = Vec::new();
        for id in ids {
            if let Some(layer) = self.layers.remove(id.as_ref()) {
                removed.push(layer.id);
            }
        }
        if !removed.is_empty() {
            self.order.retain(|id| self.layers.contains_key(id));
            self.changes.extend(removed.iter().cloned().map(LayerChange::Removed));
        }
        removed
    }

    /// Remove every layer.
    pub fn clear(&mut self) -> Vec<LayerId> {
        let ids = self.order.clone();
        self.remove(ids.as_slice())
    }

    /// Set a text layer's font size, floored at the minimum font size.
    /// Returns `false` for image layers and unknown ids.
    pub fn resize_font_size(&mut self, id: &str, new_size: f64) -> bool {
        let Some(layer) = self.layers.get_mut(id) else {
            return false;
        };
        if !layer.is_text() {
            return false;
        }
        layer.size.h = new_size.max(self.min_font_size);
        self.changes.push(LayerChange::Geometry(layer.id.clone()));
        true
    }

    /// Edit a text layer's content in place.
    pub fn edit_text(&mut self, id: &str, edit: impl FnOnce(&mut TextContent)) -> bool {
        let Some(layer) = self.layers.get_mut(id) else {
            return false;
        };
        let LayerContent::Text(content) = &mut layer.content else {
            return false;
        };
        edit(content);
        self.changes.push(LayerChange::Content(layer.id.clone()));
        true
    }

    /// Edit an image layer's content in place.
    pub fn edit_image(&mut self, id: &str, edit: impl FnOnce(&mut ImageContent)) -> bool {
        let Some(layer) = self.layers.get_mut(id) else {
            return false;
        };
        let LayerContent::Image(content) = &mut layer.content else {
            return false;
        };
        edit(content);
        self.changes.push(LayerChange::Content(layer.id.clone()));
        true
    }

    /// Refresh the cached width of a text layer after measurement. Not
    /// recorded as a change: it follows from one.
    pub fn cache_text_width(&mut self, id: &str, width: f64) {
        if let Some(layer) = self.layers.get_mut(id) {
            if layer.is_text() {
                layer.size.w = width;
            }
        }
    }

    /// Drain the mutations recorded since the last call.
    pub fn take_changes(&mut self) -> Vec<LayerChange> {
        std::mem::take(&mut self.changes)
    }

    /// Replace all layers; `layers` is taken as back-to-front order.
    pub fn load(&mut self, layers: Vec<Layer>) {
        let previous = self.order.clone();
        self.remove(previous.as_slice());
        for layer in layers {
            self.insert(layer);
        }
    }

    /// Clone every layer back to front.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Layer> {
        self.iter().cloned().collect()
    }
}

impl Default for LayerStore {
    fn default() -> Self {
        Self::new()
    }
}
