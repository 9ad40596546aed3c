//! Tests for the Pascal VOC XML store.

use super::TestDirs;
use crate::format::stores::PascalVocStore;
use crate::format::traits::LabelStore;
use crate::model::{BBox, Label};

#[test]
fn test_metadata() {
    let store = PascalVocStore;
    // Legacy kind string carried by existing project settings.
    assert_eq!(store.kind(), "Pascal VOC JSON");
    assert_eq!(store.label_file_name("photo.png"), "photo.xml");
}

#[test]
fn test_save_and_load_roundtrip() {
    let dirs = TestDirs::new();
    dirs.write_png("a.png", 640, 480);
    let store = PascalVocStore;

    let labels = vec![Label::new(
        0,
        "a.png",
        "person",
        BBox::new(100.0, 120.0, 80.0, 200.0),
        [0, 0, 0],
    )];
    let mut classes = Vec::new();
    store
        .save(&dirs.ctx(), "a.xml", "a.png", &labels, &mut classes)
        .unwrap();

    let mut classes = Vec::new();
    let loaded = store.load(&dirs.ctx(), "a.png", &mut classes).unwrap();
    assert_eq!(loaded.labels.len(), 1);
    assert_eq!(loaded.labels[0].class_name, "person");
    let bbox = loaded.labels[0].bbox;
    assert!((bbox.x - 100.0).abs() < 1e-3);
    assert!((bbox.y - 120.0).abs() < 1e-3);
    assert!((bbox.width - 80.0).abs() < 1e-3);
    assert!((bbox.height - 200.0).abs() < 1e-3);
    assert_eq!(classes.len(), 1);
    assert_eq!(classes[0].name, "person");
}

#[test]
fn test_load_parses_standard_voc_xml() {
    let dirs = TestDirs::new();
    let store = PascalVocStore;
    dirs.write_label_file(
        "a.xml",
        "<annotation><folder>images</folder><filename>a.png</filename>\
         <size><width>640</width><height>480</height><depth>3</depth></size>\
         <object><name>car</name>\
         <bndbox><xmin>10</xmin><ymin>20</ymin><xmax>110</xmax><ymax>70</ymax></bndbox>\
         </object></annotation>",
    );

    let mut classes = Vec::new();
    let loaded = store.load(&dirs.ctx(), "a.png", &mut classes).unwrap();
    assert_eq!(loaded.labels.len(), 1);
    let bbox = loaded.labels[0].bbox;
    assert!((bbox.width - 100.0).abs() < 1e-3);
    assert!((bbox.height - 50.0).abs() < 1e-3);
}

#[test]
fn test_save_without_image_writes_zero_dimensions() {
    let dirs = TestDirs::new();
    let store = PascalVocStore;

    let labels = vec![Label::new(
        0,
        "missing.png",
        "cat",
        BBox::new(1.0, 2.0, 3.0, 4.0),
        [0, 0, 0],
    )];
    let mut classes = Vec::new();
    store
        .save(&dirs.ctx(), "missing.xml", "missing.png", &labels, &mut classes)
        .unwrap();

    let xml = dirs.read_label_file("missing.xml");
    assert!(xml.contains("<width>0</width>"));
    assert!(xml.contains("<height>0</height>"));
}

#[test]
fn test_missing_file_yields_empty_labels() {
    let dirs = TestDirs::new();
    let store = PascalVocStore;
    let mut classes = Vec::new();
    let loaded = store.load(&dirs.ctx(), "nothing.png", &mut classes).unwrap();
    assert!(loaded.labels.is_empty());
    assert_eq!(loaded.file_name, "nothing.xml");
}
