#![allow(clippy::float_cmp)]

use std::collections::HashMap;

use super::*;

fn maps(entries: &[(&str, f64, f64, f64, f64)]) -> (HashMap<String, Point>, HashMap<String, Size>) {
    let mut positions = HashMap::new();
    let mut sizes = HashMap::new();
    for &(id, x, y, w, h) in entries {
        positions.insert(id.to_string(), Point::new(x, y));
        sizes.insert(id.to_string(), Size::new(w, h));
    }
    (positions, sizes)
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

// =============================================================
// Rect
// =============================================================

#[test]
fn rect_from_corners_normalises_any_drag_direction() {
    let r = Rect::from_corners(Point::new(50.0, 40.0), Point::new(10.0, 100.0));
    assert_eq!(r, Rect::new(10.0, 40.0, 40.0, 60.0));
}

#[test]
fn rect_intersects_on_overlap() {
    let a = Rect::new(0.0, 0.0, 10.0, 10.0);
    let b = Rect::new(9.0, 9.0, 10.0, 10.0);
    assert!(a.intersects(&b));
    assert!(b.intersects(&a));
}

#[test]
fn rect_edge_contact_is_not_intersection() {
    let a = Rect::new(0.0, 0.0, 10.0, 10.0);
    let right = Rect::new(10.0, 0.0, 10.0, 10.0);
    let below = Rect::new(0.0, 10.0, 10.0, 10.0);
    assert!(!a.intersects(&right));
    assert!(!a.intersects(&below));
}

#[test]
fn rect_fits_within_inclusive_edges() {
    let outer = Rect::new(0.0, 0.0, 100.0, 100.0);
    assert!(Rect::new(0.0, 0.0, 100.0, 100.0).fits_within(&outer));
    assert!(!Rect::new(1.0, 0.0, 100.0, 100.0).fits_within(&outer));
    assert!(!Rect::new(-1.0, 0.0, 10.0, 10.0).fits_within(&outer));
}

#[test]
fn rect_union_covers_both() {
    let u = Rect::new(0.0, 0.0, 10.0, 10.0).union(&Rect::new(20.0, 5.0, 5.0, 30.0));
    assert_eq!(u, Rect::new(0.0, 0.0, 25.0, 35.0));
}

// =============================================================
// compute_bounding_box
// =============================================================

#[test]
fn bounding_box_spans_min_and_max_edges() {
    let (positions, sizes) = maps(&[("a", 10.0, 10.0, 50.0, 50.0), ("b", 100.0, 100.0, 50.0, 50.0)]);
    let bb = compute_bounding_box(&positions, &sizes, ["a", "b"]).unwrap();
    assert_eq!(bb.left, 10.0);
    assert_eq!(bb.top, 10.0);
    assert_eq!(bb.right(), 150.0);
    assert_eq!(bb.bottom(), 150.0);
}

#[test]
fn bounding_box_single_entity_is_its_rect() {
    let (positions, sizes) = maps(&[("a", 3.0, 4.0, 5.0, 6.0)]);
    let bb = compute_bounding_box(&positions, &sizes, ["a"]).unwrap();
    assert_eq!(bb, Rect::new(3.0, 4.0, 5.0, 6.0));
}

#[test]
fn bounding_box_empty_ids_is_none() {
    let (positions, sizes) = maps(&[]);
    assert!(compute_bounding_box(&positions, &sizes, Vec::<String>::new()).is_none());
}

#[test]
fn bounding_box_unknown_id_is_none() {
    let (positions, sizes) = maps(&[("a", 0.0, 0.0, 1.0, 1.0)]);
    assert!(compute_bounding_box(&positions, &sizes, ["nonexistent"]).is_none());
}

#[test]
fn bounding_box_skips_ids_missing_size() {
    let (mut positions, sizes) = maps(&[("a", 0.0, 0.0, 10.0, 10.0)]);
    positions.insert("orphan".into(), Point::new(500.0, 500.0));
    let bb = compute_bounding_box(&positions, &sizes, ["a", "orphan"]).unwrap();
    assert_eq!(bb, Rect::new(0.0, 0.0, 10.0, 10.0));
}

#[test]
fn bounding_box_duplicate_ids_are_idempotent() {
    let (positions, sizes) = maps(&[("a", 0.0, 0.0, 10.0, 10.0), ("b", 20.0, 30.0, 5.0, 5.0)]);
    let once = compute_bounding_box(&positions, &sizes, ["a", "b"]);
    let twice = compute_bounding_box(&positions, &sizes, ["a", "b", "a", "b", "b"]);
    assert_eq!(once, twice);
}

#[test]
fn bounding_box_handles_negative_coordinates() {
    let (positions, sizes) = maps(&[("a", -20.0, -10.0, 5.0, 5.0), ("b", 0.0, 0.0, 5.0, 5.0)]);
    let bb = compute_bounding_box(&positions, &sizes, ["a", "b"]).unwrap();
    assert_eq!(bb, Rect::new(-20.0, -10.0, 25.0, 15.0));
}

// =============================================================
// clamp_proportional_resize
// =============================================================

#[test]
fn resize_within_room_keeps_request() {
    let b = Rect::new(0.0, 0.0, 300.0, 300.0);
    let size = clamp_proportional_resize(100.0, 50.0, 25.0, Point::new(0.0, 0.0), &b).unwrap();
    assert!(approx(size.w, 100.0));
    assert!(approx(size.h, 50.0));
}

#[test]
fn resize_scales_down_to_right_edge() {
    let b = Rect::new(0.0, 0.0, 300.0, 300.0);
    let size = clamp_proportional_resize(200.0, 100.0, 50.0, Point::new(200.0, 0.0), &b).unwrap();
    assert!(approx(size.w, 100.0));
    assert!(approx(size.h, 50.0));
}

#[test]
fn resize_scales_down_to_bottom_edge() {
    let b = Rect::new(0.0, 0.0, 300.0, 300.0);
    let size = clamp_proportional_resize(100.0, 50.0, 100.0, Point::new(0.0, 250.0), &b).unwrap();
    assert!(approx(size.h, 50.0));
    assert!(approx(size.w, 25.0));
}

#[test]
fn resize_never_scales_up() {
    let b = Rect::new(0.0, 0.0, 1000.0, 1000.0);
    let size = clamp_proportional_resize(10.0, 100.0, 100.0, Point::new(0.0, 0.0), &b).unwrap();
    assert!(approx(size.w, 10.0));
    assert!(approx(size.h, 10.0));
}

#[test]
fn resize_rejects_when_no_room() {
    let b = Rect::new(0.0, 0.0, 300.0, 300.0);
    assert!(clamp_proportional_resize(50.0, 10.0, 10.0, Point::new(300.0, 10.0), &b).is_none());
    assert!(clamp_proportional_resize(50.0, 10.0, 10.0, Point::new(10.0, 320.0), &b).is_none());
}

#[test]
fn resize_rejects_degenerate_inputs() {
    let b = Rect::new(0.0, 0.0, 300.0, 300.0);
    assert!(clamp_proportional_resize(50.0, 0.0, 10.0, Point::default(), &b).is_none());
    assert!(clamp_proportional_resize(0.0, 10.0, 10.0, Point::default(), &b).is_none());
    assert!(clamp_proportional_resize(f64::NAN, 10.0, 10.0, Point::default(), &b).is_none());
}

#[test]
fn resize_rejects_requests_that_overflow() {
    let b = Rect::new(0.0, 0.0, 300.0, 300.0);
    let at = Point::new(10.0, 10.0);
    // 1e308 is finite, but the derived height overflows to infinity.
    assert!(clamp_proportional_resize(1e308, 10.0, 100.0, at, &b).is_none());
    assert!(clamp_proportional_resize(f64::INFINITY, 10.0, 100.0, at, &b).is_none());
    assert!(clamp_proportional_resize(50.0, f64::INFINITY, 100.0, at, &b).is_none());
    assert!(clamp_proportional_resize(50.0, 10.0, f64::INFINITY, at, &b).is_none());
}

#[test]
fn huge_finite_request_still_scales_into_boundary() {
    let b = Rect::new(0.0, 0.0, 300.0, 300.0);
    let size = clamp_proportional_resize(1e300, 10.0, 10.0, Point::new(0.0, 0.0), &b).unwrap();
    assert!(approx(size.w, 300.0));
    assert!(approx(size.h, 300.0));
}

#[test]
fn resize_result_never_exceeds_boundary() {
    let b = Rect::new(0.0, 0.0, 300.0, 300.0);
    for &(x, y) in &[(0.0, 0.0), (120.0, 7.0), (299.0, 150.0), (42.5, 288.25)] {
        for &req in &[1.0, 37.0, 250.0, 10_000.0] {
            for &(w, h) in &[(10.0, 10.0), (100.0, 3.0), (3.0, 100.0)] {
                if let Some(size) = clamp_proportional_resize(req, w, h, Point::new(x, y), &b) {
                    assert!(x + size.w <= b.width + 1e-9, "x={x} req={req} w={}", size.w);
                    assert!(y + size.h <= b.height + 1e-9, "y={y} req={req} h={}", size.h);
                    assert!(approx(size.h / size.w, h / w));
                }
            }
        }
    }
}

// =============================================================
// clamp_origin
// =============================================================

#[test]
fn clamp_origin_inside_is_unchanged() {
    let b = Rect::new(0.0, 0.0, 100.0, 100.0);
    assert_eq!(clamp_origin(Point::new(10.0, 20.0), Size::new(30.0, 30.0), &b), Point::new(10.0, 20.0));
}

#[test]
fn clamp_origin_each_axis_independently() {
    let b = Rect::new(0.0, 0.0, 100.0, 100.0);
    let p = clamp_origin(Point::new(90.0, -5.0), Size::new(30.0, 30.0), &b);
    assert_eq!(p, Point::new(70.0, 0.0));
}

#[test]
fn clamp_origin_oversized_pins_to_leading_edge() {
    let b = Rect::new(10.0, 10.0, 100.0, 100.0);
    let p = clamp_origin(Point::new(50.0, 50.0), Size::new(300.0, 20.0), &b);
    assert_eq!(p, Point::new(10.0, 50.0));
}
