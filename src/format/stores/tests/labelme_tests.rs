//! Tests for the LabelMe JSON store.

use super::TestDirs;
use crate::format::stores::LabelMeStore;
use crate::format::traits::LabelStore;
use crate::model::{BBox, Label};

#[test]
fn test_metadata() {
    let store = LabelMeStore;
    assert_eq!(store.kind(), "LabelMe JSON");
    assert_eq!(store.label_file_name("photo.png"), "photo.json");
}

#[test]
fn test_save_and_load_roundtrip() {
    let dirs = TestDirs::new();
    dirs.write_png("a.png", 320, 240);
    let store = LabelMeStore;

    let labels = vec![Label::new(
        0,
        "a.png",
        "cat",
        BBox::new(10.0, 20.0, 30.0, 40.0),
        [0, 0, 0],
    )];
    let mut classes = Vec::new();
    store
        .save(&dirs.ctx(), "a.json", "a.png", &labels, &mut classes)
        .unwrap();

    let json = dirs.read_label_file("a.json");
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed["imagePath"], "a.png");
    assert_eq!(parsed["imageWidth"], 320);
    assert_eq!(parsed["shapes"][0]["shape_type"], "rectangle");

    let mut classes = Vec::new();
    let loaded = store.load(&dirs.ctx(), "a.png", &mut classes).unwrap();
    assert_eq!(loaded.labels.len(), 1);
    let bbox = loaded.labels[0].bbox;
    assert!((bbox.x - 10.0).abs() < 1e-4);
    assert!((bbox.width - 30.0).abs() < 1e-4);
}

#[test]
fn test_non_rectangle_shapes_are_skipped() {
    let dirs = TestDirs::new();
    let store = LabelMeStore;
    dirs.write_label_file(
        "a.json",
        r#"{
            "version": "5.2.1",
            "imagePath": "a.png",
            "shapes": [
                {"label": "cat", "shape_type": "polygon",
                 "points": [[0.0, 0.0], [10.0, 0.0], [10.0, 10.0]]},
                {"label": "dog", "shape_type": "rectangle",
                 "points": [[5.0, 5.0], [15.0, 25.0]]}
            ]
        }"#,
    );

    let mut classes = Vec::new();
    let loaded = store.load(&dirs.ctx(), "a.png", &mut classes).unwrap();
    assert_eq!(loaded.labels.len(), 1);
    assert_eq!(loaded.labels[0].class_name, "dog");
    let bbox = loaded.labels[0].bbox;
    assert!((bbox.width - 10.0).abs() < 1e-4);
    assert!((bbox.height - 20.0).abs() < 1e-4);
}

#[test]
fn test_save_without_image_omits_dimensions() {
    let dirs = TestDirs::new();
    let store = LabelMeStore;

    let labels = vec![Label::new(
        0,
        "missing.png",
        "cat",
        BBox::new(1.0, 2.0, 3.0, 4.0),
        [0, 0, 0],
    )];
    let mut classes = Vec::new();
    store
        .save(&dirs.ctx(), "missing.json", "missing.png", &labels, &mut classes)
        .unwrap();

    let json = dirs.read_label_file("missing.json");
    assert!(!json.contains("imageWidth"));
    assert!(!json.contains("imageHeight"));
}

#[test]
fn test_missing_file_yields_empty_labels() {
    let dirs = TestDirs::new();
    let store = LabelMeStore;
    let mut classes = Vec::new();
    let loaded = store.load(&dirs.ctx(), "nothing.png", &mut classes).unwrap();
    assert!(loaded.labels.is_empty());
}
