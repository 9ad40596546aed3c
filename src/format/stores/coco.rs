//! COCO JSON store: a single `coco_annotations.json` mapping image names to
//! their labels, updated read-modify-write one image at a time.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::format::error::FormatError;
use crate::format::traits::{LabelStore, LoadedLabels, StoreContext};
use crate::model::{BBox, Label, YoloClass, register_class};
use crate::settings::DatasetType;

/// Aggregated per-dataset JSON map (image name -> labels).
pub struct CocoStore;

impl CocoStore {
    /// Shared annotation file name inside the label directory.
    pub const FILE_NAME: &'static str = "coco_annotations.json";
}

#[derive(Serialize, Deserialize)]
struct CocoEntry {
    #[serde(rename = "className")]
    class_name: String,
    x: f32,
    y: f32,
    width: f32,
    height: f32,
    #[serde(default = "default_color")]
    color: [u8; 3],
}

fn default_color() -> [u8; 3] {
    [66, 133, 244]
}

type CocoMap = BTreeMap<String, Vec<CocoEntry>>;

fn read_map(ctx: &StoreContext<'_>) -> Result<CocoMap, FormatError> {
    let path = ctx.label_dir.join(CocoStore::FILE_NAME);
    if !path.exists() {
        return Ok(CocoMap::new());
    }
    let json = std::fs::read_to_string(&path)?;
    Ok(serde_json::from_str(&json)?)
}

impl LabelStore for CocoStore {
    fn kind(&self) -> &'static str {
        "COCO JSON"
    }

    fn description(&self) -> &'static str {
        "Standard format for object detection and instance segmentation."
    }

    fn dataset_types(&self) -> &[DatasetType] {
        &[DatasetType::BoundingBox, DatasetType::InstanceSegmentation]
    }

    fn label_file_name(&self, _image_name: &str) -> String {
        Self::FILE_NAME.to_string()
    }

    fn load(
        &self,
        ctx: &StoreContext<'_>,
        image_name: &str,
        classes: &mut Vec<YoloClass>,
    ) -> Result<LoadedLabels, FormatError> {
        let map = read_map(ctx)?;
        let labels = map
            .get(image_name)
            .map(|entries| {
                entries
                    .iter()
                    .enumerate()
                    .map(|(idx, e)| {
                        register_class(classes, &e.class_name);
                        Label::new(
                            idx as u32,
                            image_name,
                            e.class_name.clone(),
                            BBox::new(e.x, e.y, e.width, e.height),
                            e.color,
                        )
                    })
                    .collect()
            })
            .unwrap_or_default();

        Ok(LoadedLabels {
            labels,
            file_name: Self::FILE_NAME.to_string(),
        })
    }

    fn save(
        &self,
        ctx: &StoreContext<'_>,
        label_file_name: &str,
        image_name: &str,
        labels: &[Label],
        _classes: &mut Vec<YoloClass>,
    ) -> Result<(), FormatError> {
        let mut map = read_map(ctx)?;
        map.insert(
            image_name.to_string(),
            labels
                .iter()
                .map(|l| CocoEntry {
                    class_name: l.class_name.clone(),
                    x: l.bbox.x,
                    y: l.bbox.y,
                    width: l.bbox.width,
                    height: l.bbox.height,
                    color: l.color,
                })
                .collect(),
        );

        let path = ctx.label_dir.join(label_file_name);
        let json = serde_json::to_string(&map)?;
        std::fs::write(&path, json)?;
        log::debug!(
            "Saved {} COCO labels for {:?} to {:?}",
            labels.len(),
            image_name,
            path
        );
        Ok(())
    }
}
