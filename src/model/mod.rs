//! Data model: labels, bounding boxes, and the class registry.

mod class;
mod label;

pub use class::{
    YoloClass, dedup_classes_by_name, palette_color, register_class, sort_classes_by_name,
};
pub use label::{BBox, Label, LabelId};
