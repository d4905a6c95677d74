#![allow(clippy::float_cmp)]

use super::*;
use crate::geom::Point;

#[test]
fn monospace_width_scales_with_chars_and_font() {
    let m = MonospaceMetrics::default();
    let size = m.measure("abcd", "serif", 10.0, 0.0);
    assert!((size.w - 24.0).abs() < 1e-9);
    assert!((size.h - 12.0).abs() < 1e-9);
}

#[test]
fn monospace_uses_widest_line_and_counts_lines() {
    let m = MonospaceMetrics { advance: 1.0, line_height: 1.0 };
    let size = m.measure("ab\nabcde\nc", "serif", 10.0, 0.0);
    assert_eq!(size.w, 50.0);
    assert_eq!(size.h, 30.0);
}

#[test]
fn monospace_border_pads_every_side() {
    let m = MonospaceMetrics { advance: 1.0, line_height: 1.0 };
    let size = m.measure("a", "serif", 10.0, 3.0);
    assert_eq!(size.w, 16.0);
    assert_eq!(size.h, 16.0);
}

#[test]
fn monospace_empty_text_has_no_width() {
    let m = MonospaceMetrics::default();
    assert_eq!(m.measure("", "serif", 20.0, 0.0).w, 0.0);
}

#[test]
fn layer_rect_for_image_uses_stored_size() {
    let layer = Layer::image("img", Point::new(5.0, 6.0), Size::new(40.0, 30.0), "a.png");
    let rect = layer_rect(&layer, &MonospaceMetrics::default());
    assert_eq!(rect, Rect::new(5.0, 6.0, 40.0, 30.0));
}

#[test]
fn layer_rect_for_text_ignores_cached_width() {
    let mut layer = Layer::text("t", Point::new(0.0, 0.0), "hello", 10.0);
    layer.size.w = 999.0;
    let m = MonospaceMetrics { advance: 1.0, line_height: 1.0 };
    let rect = layer_rect(&layer, &m);
    assert_eq!(rect.width, 50.0);
    assert_eq!(rect.height, 10.0);
}
