use crate::autofit::AutoFit;
use crate::config::CanvasConfig;
use crate::geom::{Boundary, Point, Rect, Size, clamp_origin, union_all};
use crate::hit::{Hit, cursor_for, hit_test, hits_any};
use crate::input::{Button, Key, Modifiers};
use crate::layer::{Flip, GeometryPatch, ImageContent, Layer, LayerChange, LayerContent, LayerId, LayerStore};
use crate::metrics::{MonospaceMetrics, TextMetrics, layer_rect, measured_size};
use crate::render::{Affordance, Scene, build_scene, layer_bounds};
use crate::selection::{Gesture, LayerOrigin, Marquee, Mode, SelectionController};
use crate::snapshot::{DesignSnapshot, SnapshotError};
use crate::transform;

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    LayerCreated(LayerId),
    LayerUpdated(LayerId),
    LayerDeleted(LayerId),
    /// The committed selection changed; carries the new ids in order.
    SelectionChanged(Vec<LayerId>),
    SetCursor(String),
    RenderNeeded,
}

/// Core engine state: the layer store, selection, active gesture, auto-fit
/// queue and the current print-safe boundary.
pub struct EngineCore {
    pub store: LayerStore,
    pub controller: SelectionController,
    pub autofit: AutoFit,
    pub config: CanvasConfig,
    boundary: Option<Boundary>,
    metrics: Box<dyn TextMetrics>,
    cursor: &'static str,
}

impl Default for EngineCore {
    fn default() -> Self {
        Self::with_config(CanvasConfig::default(), Box::new(MonospaceMetrics::default()))
    }
}

impl EngineCore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_config(config: CanvasConfig, metrics: Box<dyn TextMetrics>) -> Self {
        Self {
            store: LayerStore::with_limits(config.duplicate_offset, config.min_font_size),
            controller: SelectionController::new(),
            autofit: AutoFit::new(config.min_font_size),
            config,
            boundary: None,
            metrics,
            cursor: "default",
        }
    }

    // --- Data inputs ---

    /// Place a layer created by a tool panel on top of the design.
    pub fn add_layer(&mut self, mut layer: Layer) -> Vec<Action> {
        if let Some(boundary) = &self.boundary {
            let measured = measured_size(&layer, self.metrics.as_ref());
            layer.position = clamp_origin(layer.position, measured, boundary);
        }
        self.store.insert(layer);
        self.finish(Vec::new(), false)
    }

    /// Replace the print-safe boundary and pull every layer back inside it.
    pub fn set_boundary(&mut self, boundary: Boundary) -> Vec<Action> {
        self.boundary = Some(boundary);
        let targets: Vec<(LayerId, Size)> = self
            .store
            .iter()
            .map(|l| (l.id.clone(), measured_size(l, self.metrics.as_ref())))
            .collect();
        let mut moved = 0usize;
        for (id, measured) in &targets {
            if transform::reclamp(&mut self.store, id, *measured, &boundary) {
                moved += 1;
            }
        }
        self.autofit.observe_boundary(&self.store);
        tracing::info!(?boundary, moved, "print boundary updated");
        self.finish(vec![Action::RenderNeeded], false)
    }

    /// Drop every layer and any gesture in flight.
    pub fn reset(&mut self) -> Vec<Action> {
        self.controller.finish();
        self.store.clear();
        self.finish(Vec::new(), false)
    }

    /// Restore a saved design. The selection and any gesture are discarded.
    ///
    /// # Errors
    ///
    /// Returns the snapshot's validation error; the canvas is left unchanged.
    pub fn load_snapshot(&mut self, snapshot: DesignSnapshot) -> Result<Vec<Action>, SnapshotError> {
        snapshot.validate()?;
        self.controller.finish();
        let cleared = self.controller.selection.clear();
        tracing::info!(layers = snapshot.layers.len(), "design snapshot restored");
        self.store.load(snapshot.layers);
        Ok(self.finish(Vec::new(), cleared))
    }

    /// Serialisable copy of every layer, back to front.
    #[must_use]
    pub fn snapshot(&self) -> DesignSnapshot {
        DesignSnapshot::new(self.store.snapshot())
    }

    // --- Selection ---

    /// Replace the selection with the given ids; unknown ids are dropped.
    pub fn select(&mut self, ids: &[LayerId]) -> Vec<Action> {
        let known: Vec<LayerId> = ids.iter().filter(|id| self.store.contains(id)).cloned().collect();
        let changed = self.controller.selection.replace(known);
        self.finish(Vec::new(), changed)
    }

    pub fn clear_selection(&mut self) -> Vec<Action> {
        let changed = self.controller.selection.clear();
        self.finish(Vec::new(), changed)
    }

    /// Deselect everything when a click lands outside every selected layer.
    pub fn on_outside_click(&mut self, pt: Point) -> Vec<Action> {
        if !self.controller.is_idle() || self.controller.selection.is_empty() {
            return Vec::new();
        }
        let inside = {
            let scene = self.scene();
            matches!(hit_test(pt, &scene), Some(Hit::Affordance(_)))
                || hits_any(pt, &scene, self.controller.selection.ids())
        };
        if inside {
            return Vec::new();
        }
        self.clear_selection()
    }

    // --- Selection commands ---

    pub fn delete_selection(&mut self) -> Vec<Action> {
        let ids = self.controller.selection.ids().to_vec();
        if ids.is_empty() {
            return Vec::new();
        }
        self.store.remove(ids.as_slice());
        let changed = self.controller.selection.clear();
        self.finish(Vec::new(), changed)
    }

    /// Duplicate the selection and select the copies.
    pub fn duplicate_selection(&mut self) -> Vec<Action> {
        let ids = self.controller.selection.ids().to_vec();
        let mut created = Vec::with_capacity(ids.len());
        for source in &ids {
            let Some(origin) = self.store.get(source).map(|l| l.position) else {
                continue;
            };
            let Some(copy) = self.store.duplicate(std::slice::from_ref(source)).pop() else {
                continue;
            };
            let measured = self.store.get(&copy).map(|l| measured_size(l, self.metrics.as_ref()));
            if let (Some(boundary), Some(measured)) = (self.boundary, measured) {
                let offset = self.config.duplicate_offset;
                transform::place_duplicate(&mut self.store, &copy, origin, measured, offset, &boundary);
            }
            created.push(copy);
        }
        if created.is_empty() {
            return self.finish(Vec::new(), false);
        }
        let changed = self.controller.selection.replace(created);
        self.finish(Vec::new(), changed)
    }

    /// Set the rotation of every selected layer.
    pub fn rotate_selection(&mut self, degrees: f64) -> Vec<Action> {
        for id in self.controller.selection.ids() {
            transform::rotate(&mut self.store, id, degrees);
        }
        self.finish(Vec::new(), false)
    }

    /// Toggle a flip axis on every selected layer.
    pub fn flip_selection(&mut self, axis: Flip) -> Vec<Action> {
        for id in self.controller.selection.ids() {
            transform::flip(&mut self.store, id, axis);
        }
        self.finish(Vec::new(), false)
    }

    /// Aspect-locked resize of one layer to a rendered width.
    pub fn resize_layer(&mut self, id: &str, requested_width: f64) -> Vec<Action> {
        transform::resize_layer(&mut self.store, id, requested_width, self.metrics.as_ref(), self.boundary.as_ref());
        self.finish(Vec::new(), false)
    }

    // --- Content edits ---

    pub fn set_text(&mut self, id: &str, text: &str) -> Vec<Action> {
        self.store.edit_text(id, |t| text.clone_into(&mut t.text));
        self.finish(Vec::new(), false)
    }

    pub fn set_font_family(&mut self, id: &str, font_family: &str) -> Vec<Action> {
        self.store.edit_text(id, |t| font_family.clone_into(&mut t.font_family));
        self.finish(Vec::new(), false)
    }

    pub fn set_font_size(&mut self, id: &str, font_size: f64) -> Vec<Action> {
        self.store.resize_font_size(id, font_size);
        self.finish(Vec::new(), false)
    }

    pub fn set_color(&mut self, id: &str, color: &str) -> Vec<Action> {
        self.store.edit_text(id, |t| color.clone_into(&mut t.color));
        self.finish(Vec::new(), false)
    }

    pub fn set_border(&mut self, id: &str, color: &str, width: f64) -> Vec<Action> {
        self.store.edit_text(id, |t| {
            color.clone_into(&mut t.border_color);
            t.border_width = width.max(0.0);
        });
        self.finish(Vec::new(), false)
    }

    /// Point a clip-art layer at a different artwork. Uploads are left alone.
    pub fn swap_clipart_source(&mut self, id: &str, source_url: &str) -> Vec<Action> {
        let is_clipart = matches!(
            self.store.get(id).map(|l| &l.content),
            Some(LayerContent::Image(ImageContent { is_clipart: true, .. }))
        );
        if !is_clipart {
            return Vec::new();
        }
        self.store.edit_image(id, |img| source_url.clone_into(&mut img.source_url));
        self.finish(Vec::new(), false)
    }

    // --- Frames ---

    /// Run the deferred auto-fit pass. Call once per animation frame, after
    /// layout, while [`Self::needs_frame`] is true.
    pub fn on_frame(&mut self) -> Vec<Action> {
        self.autofit.run_frame(&mut self.store, self.metrics.as_ref(), self.boundary.as_ref());
        self.finish(Vec::new(), false)
    }

    #[must_use]
    pub fn needs_frame(&self) -> bool {
        self.autofit.has_pending()
    }

    // --- Input events ---

    pub fn on_pointer_down(&mut self, pt: Point, button: Button, modifiers: Modifiers) -> Vec<Action> {
        if button != Button::Primary {
            return Vec::new();
        }
        if !self.controller.is_idle() {
            tracing::debug!(mode = ?self.controller.mode(), "pointer-down ignored during active gesture");
            return Vec::new();
        }
        let hit = hit_test(pt, &self.scene());
        match hit {
            Some(Hit::Affordance(Affordance::Delete)) => self.delete_selection(),
            Some(Hit::Affordance(Affordance::Duplicate)) => self.duplicate_selection(),
            Some(Hit::Affordance(Affordance::Resize)) => self.begin_resize(pt),
            Some(Hit::Layer(id)) => self.begin_drag(pt, id, modifiers),
            None => self.begin_marquee(pt),
        }
    }

    pub fn on_pointer_move(&mut self, pt: Point, _modifiers: Modifiers) -> Vec<Action> {
        if self.controller.is_idle() {
            return self.update_cursor(pt);
        }
        let config = self.config;
        let boundary = self.boundary;
        let metrics = self.metrics.as_ref();

        match self.controller.gesture_mut() {
            Some(Gesture::DraggingLayers { start, origins }) => {
                transform::translate(&mut self.store, origins, pt.x - start.x, pt.y - start.y, boundary.as_ref());
            }
            Some(Gesture::MarqueeSelecting(marquee)) => {
                marquee.update(pt, self.store.iter().map(|l| (&l.id, layer_bounds(l, metrics))));
                return self.finish(vec![Action::RenderNeeded], false);
            }
            Some(Gesture::GroupResizing { start, anchor, origins }) => {
                let raw = transform::group_scale(pt.x - start.x, config.group_resize_divisor);
                if let Some(scale) = transform::clamp_group_scale(raw, anchor, boundary.as_ref()) {
                    transform::apply_group_scale(&mut self.store, anchor, origins, scale);
                }
            }
            Some(Gesture::TextResizing { start, fonts }) => {
                let dx = pt.x - start.x;
                for (id, font) in fonts.iter() {
                    let next = transform::text_handle_font(
                        *font,
                        dx,
                        config.text_resize_slope,
                        config.text_resize_min_font,
                    );
                    self.store.resize_font_size(id, next);
                }
            }
            None => return Vec::new(),
        }
        self.finish(Vec::new(), false)
    }

    /// Terminal event for the active gesture. A stray pointer-up is a no-op.
    pub fn on_pointer_up(&mut self, pt: Point) -> Vec<Action> {
        let Some(gesture) = self.controller.finish() else {
            return Vec::new();
        };
        self.complete(gesture, Some(pt))
    }

    /// The pointer left the window or the host lost capture. Ends the
    /// gesture exactly like pointer-up at the last known position.
    pub fn on_pointer_cancel(&mut self) -> Vec<Action> {
        let Some(gesture) = self.controller.finish() else {
            return Vec::new();
        };
        self.complete(gesture, None)
    }

    pub fn on_key_down(&mut self, key: &Key, modifiers: Modifiers) -> Vec<Action> {
        if key.is_escape() {
            return match self.controller.finish() {
                Some(gesture) => self.abort(gesture),
                None => self.clear_selection(),
            };
        }
        if !self.controller.is_idle() {
            return Vec::new();
        }
        if key.is_delete() {
            return self.delete_selection();
        }
        if modifiers.command() && key.is_char('d') {
            return self.duplicate_selection();
        }
        Vec::new()
    }

    // --- Queries ---

    #[must_use]
    pub fn selection(&self) -> &[LayerId] {
        self.controller.selection.ids()
    }

    #[must_use]
    pub fn mode(&self) -> Mode {
        self.controller.mode()
    }

    #[must_use]
    pub fn layer(&self, id: &str) -> Option<&Layer> {
        self.store.get(id)
    }

    #[must_use]
    pub fn boundary(&self) -> Option<Boundary> {
        self.boundary
    }

    /// Rendered rectangle of a layer.
    #[must_use]
    pub fn layer_rect(&self, id: &str) -> Option<Rect> {
        self.store.get(id).map(|l| layer_rect(l, self.metrics.as_ref()))
    }

    /// Bounding box of the whole selection as drawn, rotation included.
    #[must_use]
    pub fn selection_box(&self) -> Option<Rect> {
        let metrics = self.metrics.as_ref();
        let ids = self.controller.selection.ids();
        union_all(ids.iter().filter_map(|id| self.store.get(id).map(|l| layer_bounds(l, metrics))))
    }

    /// Display list for the current state.
    #[must_use]
    pub fn scene(&self) -> Scene<'_> {
        build_scene(
            self.store.iter(),
            self.metrics.as_ref(),
            &self.controller.selection,
            self.controller.marquee(),
        )
    }

    // --- Gesture helpers ---

    fn origins(&self, ids: &[LayerId]) -> Vec<LayerOrigin> {
        ids.iter()
            .filter_map(|id| self.store.get(id))
            .map(|layer| LayerOrigin {
                id: layer.id.clone(),
                position: layer.position,
                size: layer.size,
                measured: measured_size(layer, self.metrics.as_ref()),
            })
            .collect()
    }

    fn begin_drag(&mut self, pt: Point, id: LayerId, modifiers: Modifiers) -> Vec<Action> {
        let mut changed = false;
        if modifiers.shift {
            changed = true;
            if !self.controller.selection.toggle(&id) {
                return self.finish(Vec::new(), changed);
            }
        } else if !self.controller.selection.contains(&id) {
            changed = self.controller.selection.replace([id]);
        }
        let origins = self.origins(self.controller.selection.ids());
        tracing::debug!(layers = origins.len(), "drag started");
        self.controller.begin(Gesture::DraggingLayers { start: pt, origins });
        self.finish(Vec::new(), changed)
    }

    fn begin_marquee(&mut self, pt: Point) -> Vec<Action> {
        let changed = self.controller.selection.clear();
        self.controller.begin(Gesture::MarqueeSelecting(Marquee::new(pt)));
        self.finish(vec![Action::RenderNeeded], changed)
    }

    fn begin_resize(&mut self, pt: Point) -> Vec<Action> {
        let ids = self.controller.selection.ids().to_vec();
        let all_text = !ids.is_empty() && ids.iter().all(|id| self.store.get(id).is_some_and(Layer::is_text));
        if all_text {
            let fonts = ids
                .iter()
                .filter_map(|id| self.store.get(id).and_then(|l| l.font_size().map(|f| (id.clone(), f))))
                .collect();
            self.controller.begin(Gesture::TextResizing { start: pt, fonts });
            tracing::debug!(layers = ids.len(), "text resize started");
            return Vec::new();
        }
        let Some(anchor) = self.selection_box() else {
            return Vec::new();
        };
        let origins = self.origins(&ids);
        self.controller.begin(Gesture::GroupResizing { start: pt, anchor, origins });
        tracing::debug!(layers = ids.len(), ?anchor, "group resize started");
        Vec::new()
    }

    fn complete(&mut self, gesture: Gesture, pt: Option<Point>) -> Vec<Action> {
        let mode = gesture.mode();
        let changed = match gesture {
            Gesture::MarqueeSelecting(mut marquee) => {
                if let Some(pt) = pt {
                    let metrics = self.metrics.as_ref();
                    marquee.update(pt, self.store.iter().map(|l| (&l.id, layer_bounds(l, metrics))));
                }
                let hovered = marquee.hovered_ids(self.store.ids());
                self.controller.selection.replace(hovered)
            }
            Gesture::DraggingLayers { .. } | Gesture::GroupResizing { .. } | Gesture::TextResizing { .. } => false,
        };
        tracing::debug!(?mode, "gesture ended");
        self.finish(vec![Action::RenderNeeded], changed)
    }

    /// Cancel a gesture, putting every touched layer back where it started.
    fn abort(&mut self, gesture: Gesture) -> Vec<Action> {
        match gesture {
            Gesture::DraggingLayers { origins, .. } => {
                for origin in &origins {
                    self.store.update_geometry(&origin.id, &GeometryPatch::position(origin.position));
                }
            }
            Gesture::GroupResizing { origins, .. } => {
                for origin in &origins {
                    let patch = GeometryPatch { position: Some(origin.position), size: Some(origin.size), ..Default::default() };
                    self.store.update_geometry(&origin.id, &patch);
                }
            }
            Gesture::TextResizing { fonts, .. } => {
                for (id, font) in &fonts {
                    self.store.resize_font_size(id, *font);
                }
            }
            Gesture::MarqueeSelecting(_) => {}
        }
        tracing::debug!("gesture aborted");
        self.finish(vec![Action::RenderNeeded], false)
    }

    fn update_cursor(&mut self, pt: Point) -> Vec<Action> {
        let cursor = {
            let scene = self.scene();
            cursor_for(hit_test(pt, &scene).as_ref())
        };
        if cursor == self.cursor {
            return Vec::new();
        }
        self.cursor = cursor;
        vec![Action::SetCursor(cursor.to_string())]
    }

    /// Drain store changes into actions, feed them to auto-fit, and drop
    /// selected ids that no longer exist.
    fn finish(&mut self, mut actions: Vec<Action>, mut selection_changed: bool) -> Vec<Action> {
        let changes = self.store.take_changes();
        for change in &changes {
            self.autofit.observe(change, &self.store);
            let action = match change {
                LayerChange::Created(id) => Action::LayerCreated(id.clone()),
                LayerChange::Geometry(id) | LayerChange::Content(id) => Action::LayerUpdated(id.clone()),
                LayerChange::Removed(id) => Action::LayerDeleted(id.clone()),
            };
            if !actions.contains(&action) {
                actions.push(action);
            }
        }
        if self.controller.selection.reconcile(&self.store) {
            selection_changed = true;
        }
        if selection_changed {
            actions.push(Action::SelectionChanged(self.controller.selection.ids().to_vec()));
        }
        if (selection_changed || !changes.is_empty()) && !actions.contains(&Action::RenderNeeded) {
            actions.push(Action::RenderNeeded);
        }
        actions
    }
}
