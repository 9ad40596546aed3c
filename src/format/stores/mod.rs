//! Built-in label store implementations.

mod coco;
mod coreml;
mod labelme;
mod pascal_voc;
mod yolo_csv;
mod yolo_json;

pub use coco::CocoStore;
pub use coreml::CoreMlStore;
pub use labelme::LabelMeStore;
pub use pascal_voc::PascalVocStore;
pub use yolo_csv::YoloCsvStore;
pub use yolo_json::YoloJsonStore;

#[cfg(test)]
mod tests;
