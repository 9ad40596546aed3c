//! YOLO JSON store: one `<image>.json` per image, center-point boxes.

use serde::{Deserialize, Serialize};

use crate::format::error::FormatError;
use crate::format::traits::{LabelStore, LoadedLabels, StoreContext};
use crate::model::{BBox, Label, YoloClass, register_class};
use crate::settings::DatasetType;

/// Per-image JSON array of annotations with center coordinates in pixels.
pub struct YoloJsonStore;

#[derive(Serialize, Deserialize)]
struct YoloEntry {
    #[serde(rename = "className")]
    class_name: String,
    /// Box center x in pixels.
    x: f32,
    /// Box center y in pixels.
    y: f32,
    width: f32,
    height: f32,
}

impl LabelStore for YoloJsonStore {
    fn kind(&self) -> &'static str {
        "YOLO JSON"
    }

    fn description(&self) -> &'static str {
        "Simplified bounding box format for YOLO models."
    }

    fn dataset_types(&self) -> &[DatasetType] {
        &[DatasetType::BoundingBox]
    }

    fn label_file_name(&self, image_name: &str) -> String {
        format!("{image_name}.json")
    }

    fn load(
        &self,
        ctx: &StoreContext<'_>,
        image_name: &str,
        classes: &mut Vec<YoloClass>,
    ) -> Result<LoadedLabels, FormatError> {
        let file_name = self.label_file_name(image_name);
        let path = ctx.label_dir.join(&file_name);

        if !path.exists() {
            return Ok(LoadedLabels {
                labels: Vec::new(),
                file_name,
            });
        }

        let json = std::fs::read_to_string(&path)?;
        let entries: Vec<YoloEntry> = serde_json::from_str(&json)?;

        let labels = entries
            .into_iter()
            .enumerate()
            .map(|(idx, e)| {
                let bbox = BBox::new(e.x - e.width / 2.0, e.y - e.height / 2.0, e.width, e.height);
                let color = register_class(classes, &e.class_name);
                Label::new(idx as u32, image_name, e.class_name, bbox, color)
            })
            .collect();

        Ok(LoadedLabels { labels, file_name })
    }

    fn save(
        &self,
        ctx: &StoreContext<'_>,
        label_file_name: &str,
        _image_name: &str,
        labels: &[Label],
        _classes: &mut Vec<YoloClass>,
    ) -> Result<(), FormatError> {
        let entries: Vec<YoloEntry> = labels
            .iter()
            .map(|l| YoloEntry {
                class_name: l.class_name.clone(),
                x: l.bbox.center_x(),
                y: l.bbox.center_y(),
                width: l.bbox.width,
                height: l.bbox.height,
            })
            .collect();

        let path = ctx.label_dir.join(label_file_name);
        let json = serde_json::to_string(&entries)?;
        std::fs::write(&path, json)?;
        log::debug!("Saved {} YOLO JSON labels to {:?}", labels.len(), path);
        Ok(())
    }
}
