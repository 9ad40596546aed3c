//! Project settings persisted as `settings.json` in the dataset root.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::format::FormatError;
use crate::model::{YoloClass, dedup_classes_by_name, sort_classes_by_name};

/// Kind of annotation the dataset carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DatasetType {
    Classification,
    BoundingBox,
    InstanceSegmentation,
    SemanticSegmentation,
    None,
}

impl Default for DatasetType {
    fn default() -> Self {
        DatasetType::BoundingBox
    }
}

/// Per-project configuration: dataset layout, storage kind, and the class
/// registry snapshot. The batch driver receives this by reference and never
/// persists it itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSettings {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub dataset_type: DatasetType,
    /// Storage kind string, e.g. "YOLO JSON" (see [`crate::StoreRegistry`]).
    pub label_storage: String,
    /// Subdirectory of the dataset root containing the images.
    #[serde(default = "default_image_subdirectory")]
    pub image_subdirectory: String,
    /// Subdirectory of the dataset root containing the label files.
    #[serde(default = "default_label_subdirectory")]
    pub label_subdirectory: String,
    /// Snapshot of the class registry.
    #[serde(default)]
    pub classes: Vec<YoloClass>,
}

fn default_image_subdirectory() -> String {
    "images".to_string()
}

fn default_label_subdirectory() -> String {
    "labels".to_string()
}

impl ProjectSettings {
    /// Create settings with default subdirectory names and no classes.
    pub fn new(name: impl Into<String>, label_storage: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            dataset_type: DatasetType::BoundingBox,
            label_storage: label_storage.into(),
            image_subdirectory: default_image_subdirectory(),
            label_subdirectory: default_label_subdirectory(),
            classes: Vec::new(),
        }
    }

    /// Image directory for a dataset rooted at `root`.
    pub fn image_dir(&self, root: &Path) -> PathBuf {
        root.join(&self.image_subdirectory)
    }

    /// Label directory for a dataset rooted at `root`.
    pub fn label_dir(&self, root: &Path) -> PathBuf {
        root.join(&self.label_subdirectory)
    }
}

/// Loads and saves [`ProjectSettings`] for one dataset directory.
pub struct SettingsManager {
    directory: PathBuf,
}

impl SettingsManager {
    /// File name of the settings file inside the dataset root.
    pub const FILE_NAME: &'static str = "settings.json";

    /// Create a manager for the given dataset root.
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    fn file_path(&self) -> PathBuf {
        self.directory.join(Self::FILE_NAME)
    }

    /// Load settings, re-asserting class registry uniqueness and order.
    pub fn load(&self) -> Result<ProjectSettings, FormatError> {
        let path = self.file_path();
        let json = std::fs::read_to_string(&path)?;
        let mut settings: ProjectSettings = serde_json::from_str(&json)?;

        dedup_classes_by_name(&mut settings.classes);
        sort_classes_by_name(&mut settings.classes);

        log::info!(
            "Loaded settings from {:?} ({} classes)",
            path,
            settings.classes.len()
        );
        Ok(settings)
    }

    /// Save settings as pretty-printed JSON.
    pub fn save(&self, settings: &ProjectSettings) -> Result<(), FormatError> {
        let path = self.file_path();
        let json = serde_json::to_string_pretty(settings)?;
        std::fs::write(&path, json)?;
        log::info!("Saved settings to {:?}", path);
        Ok(())
    }
}
