#![allow(clippy::float_cmp)]

use super::*;
use crate::geom::{Point, Size};
use crate::layer::Flip;

fn sample() -> DesignSnapshot {
    let mut text = Layer::text("t", Point::new(10.125, 20.0), "Hello\nworld", 36.5);
    text.rotation = -45.0;
    let mut img = Layer::image("i", Point::new(0.1 + 0.2, 7.0), Size::new(123.456_789, 98.7), "https://cdn.test/i.png");
    img.flip = Flip::Horizontal;
    let clip = Layer::clipart("c", Point::new(1.0, 2.0), Size::new(3.0, 4.0), "star.svg");
    DesignSnapshot::new(vec![text, img, clip])
}

// =============================================================
// round trip
// =============================================================

#[test]
fn json_round_trip_preserves_everything() {
    let snap = sample();
    let json = snap.to_json().unwrap();
    let back = DesignSnapshot::from_json(&json).unwrap();
    assert_eq!(back, snap);
}

#[test]
fn round_trip_keeps_full_float_precision() {
    let json = sample().to_json().unwrap();
    let back = DesignSnapshot::from_json(&json).unwrap();
    assert_eq!(back.layers[1].position.x, 0.1 + 0.2);
    assert_eq!(back.layers[1].size.w, 123.456_789);
}

#[test]
fn round_trip_keeps_paint_order() {
    let back = DesignSnapshot::from_json(&sample().to_json().unwrap()).unwrap();
    let ids: Vec<&str> = back.layers.iter().map(|l| l.id.as_str()).collect();
    assert_eq!(ids, vec!["t", "i", "c"]);
}

#[test]
fn missing_rotation_and_flip_default() {
    let raw = r#"{
        "version": 1,
        "layers": [{
            "id": "a",
            "position": {"x": 1.0, "y": 2.0},
            "size": {"w": 3.0, "h": 4.0},
            "kind": "image",
            "source_url": "a.png"
        }]
    }"#;
    let snap = DesignSnapshot::from_json(raw).unwrap();
    let layer = &snap.layers[0];
    assert_eq!(layer.rotation, 0.0);
    assert_eq!(layer.flip, Flip::None);
    assert!(!layer.is_text());
}

// =============================================================
// validation
// =============================================================

#[test]
fn rejects_unknown_version() {
    let mut snap = sample();
    snap.version = 99;
    let json = serde_json::to_string(&snap).unwrap();
    let err = DesignSnapshot::from_json(&json).unwrap_err();
    assert!(matches!(err, SnapshotError::UnsupportedVersion { found: 99 }));
}

#[test]
fn rejects_duplicate_ids() {
    let layer = Layer::text("dup", Point::default(), "x", 10.0);
    let snap = DesignSnapshot::new(vec![layer.clone(), layer]);
    let err = snap.validate().unwrap_err();
    assert!(matches!(err, SnapshotError::DuplicateId(ref id) if id == "dup"));
}

#[test]
fn rejects_malformed_json() {
    let err = DesignSnapshot::from_json("{not json").unwrap_err();
    assert!(matches!(err, SnapshotError::Json(_)));
}

#[test]
fn empty_snapshot_is_valid() {
    assert!(DesignSnapshot::new(Vec::new()).validate().is_ok());
}
