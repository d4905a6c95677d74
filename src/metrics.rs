//! Text measurement seam.
//!
//! The canvas never measures glyphs itself. Hosts inject a [`TextMetrics`]
//! backed by whatever layout engine they have (a browser `measureText`, a
//! font-metrics library). [`MonospaceMetrics`] is a deterministic stand-in used
//! by the CLI and by tests.

#[cfg(test)]
#[path = "metrics_test.rs"]
mod metrics_test;

use crate::geom::{Rect, Size};
use crate::layer::{Layer, LayerContent};

/// Synchronous text measurement: given content and style, return the size of
/// the rendered glyph box in canvas pixels.
pub trait TextMetrics {
    fn measure(&self, text: &str, font_family: &str, font_size: f64, border_width: f64) -> Size;
}

/// Fixed-advance approximation: every character is `advance * font_size`
/// wide and each line is `line_height * font_size` tall. The stroke border
/// adds its width on every side.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonospaceMetrics {
    pub advance: f64,
    pub line_height: f64,
}

impl Default for MonospaceMetrics {
    fn default() -> Self {
        Self { advance: 0.6, line_height: 1.2 }
    }
}

impl TextMetrics for MonospaceMetrics {
    #[allow(clippy::cast_precision_loss)]
    fn measure(&self, text: &str, _font_family: &str, font_size: f64, border_width: f64) -> Size {
        let lines = text.split('\n');
        let (count, widest) = lines.fold((0usize, 0usize), |(count, widest), line| {
            (count + 1, widest.max(line.chars().count()))
        });
        let stroke = border_width.max(0.0) * 2.0;
        Size::new(
            widest as f64 * self.advance * font_size + stroke,
            count as f64 * self.line_height * font_size + stroke,
        )
    }
}

/// The rendered box of a layer: measured glyph extents for text, the stored
/// size for images.
#[must_use]
pub fn measured_size(layer: &Layer, metrics: &dyn TextMetrics) -> Size {
    match &layer.content {
        LayerContent::Text(text) => metrics.measure(&text.text, &text.font_family, layer.size.h, text.border_width),
        LayerContent::Image(_) => layer.size,
    }
}

/// Unrotated rendered rectangle of a layer in canvas space.
#[must_use]
pub fn layer_rect(layer: &Layer, metrics: &dyn TextMetrics) -> Rect {
    Rect::at(layer.position, measured_size(layer, metrics))
}
