//! Trait definition for label storage implementations.

use std::path::Path;

use crate::format::error::FormatError;
use crate::model::{Label, YoloClass};
use crate::settings::DatasetType;

/// Directories one store operates on.
///
/// `image_dir` is only consulted by stores that need image dimensions
/// (e.g. YOLO CSV normalization); `label_dir` holds the label files.
#[derive(Debug, Clone, Copy)]
pub struct StoreContext<'a> {
    pub image_dir: &'a Path,
    pub label_dir: &'a Path,
}

/// Result of loading one image's labels.
#[derive(Debug)]
pub struct LoadedLabels {
    /// Labels for the image; empty when no annotation file exists.
    pub labels: Vec<Label>,
    /// Name of the label file these came from (or would be written to).
    pub file_name: String,
}

/// Trait for label storage import/export implementations.
///
/// Each storage kind ("YOLO JSON", "COCO JSON", ...) implements this trait
/// to load and save one image's labels at a time. Loading may discover new
/// classes; implementations record them in the passed registry and the
/// caller re-asserts registry uniqueness and order afterwards.
pub trait LabelStore: Send + Sync {
    /// Storage kind string, e.g. "YOLO JSON". Used as the registry key and
    /// in project settings.
    fn kind(&self) -> &'static str;

    /// Human-readable description for UI display.
    fn description(&self) -> &'static str;

    /// Dataset types this storage kind can represent.
    fn dataset_types(&self) -> &[DatasetType];

    /// Label file name used for `image_name`.
    ///
    /// For aggregated single-file stores this is the shared file name.
    fn label_file_name(&self, image_name: &str) -> String;

    /// Load one image's labels.
    ///
    /// A missing annotation file is not an error: an empty label list is
    /// returned. Malformed content yields an error; the batch driver logs
    /// it and skips the file.
    fn load(
        &self,
        ctx: &StoreContext<'_>,
        image_name: &str,
        classes: &mut Vec<YoloClass>,
    ) -> Result<LoadedLabels, FormatError>;

    /// Save one image's labels to `label_file_name`.
    fn save(
        &self,
        ctx: &StoreContext<'_>,
        label_file_name: &str,
        image_name: &str,
        labels: &[Label],
        classes: &mut Vec<YoloClass>,
    ) -> Result<(), FormatError>;
}

/// File stem of an image name (strips the last extension).
pub(crate) fn image_stem(image_name: &str) -> &str {
    Path::new(image_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(image_name)
}
