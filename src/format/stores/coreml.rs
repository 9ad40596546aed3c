//! CoreML JSON store: a single `coreml_annotations.json` array with one
//! entry per image, updated read-modify-write.

use serde::{Deserialize, Serialize};

use crate::format::error::FormatError;
use crate::format::traits::{LabelStore, LoadedLabels, StoreContext};
use crate::model::{BBox, Label, YoloClass, register_class};
use crate::settings::DatasetType;

/// Aggregated CreateML/CoreML annotation file (center-point coordinates).
pub struct CoreMlStore;

impl CoreMlStore {
    /// Shared annotation file name inside the label directory.
    pub const FILE_NAME: &'static str = "coreml_annotations.json";
}

#[derive(Serialize, Deserialize)]
struct CoreMlAnnotation {
    image: String,
    annotations: Vec<CoreMlEntry>,
}

#[derive(Serialize, Deserialize)]
struct CoreMlEntry {
    label: String,
    coordinates: CoreMlCoordinates,
}

#[derive(Serialize, Deserialize)]
struct CoreMlCoordinates {
    /// Box center x in pixels.
    x: f32,
    /// Box center y in pixels.
    y: f32,
    width: f32,
    height: f32,
}

fn read_all(ctx: &StoreContext<'_>) -> Result<Vec<CoreMlAnnotation>, FormatError> {
    let path = ctx.label_dir.join(CoreMlStore::FILE_NAME);
    if !path.exists() {
        return Ok(Vec::new());
    }
    let json = std::fs::read_to_string(&path)?;
    Ok(serde_json::from_str(&json)?)
}

impl LabelStore for CoreMlStore {
    fn kind(&self) -> &'static str {
        "CoreML JSON"
    }

    fn description(&self) -> &'static str {
        "Format used for Apple CoreML models, supporting bounding box annotations."
    }

    fn dataset_types(&self) -> &[DatasetType] {
        &[DatasetType::BoundingBox]
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
        let all = read_all(ctx)?;
        let labels = all
            .iter()
            .find(|a| a.image == image_name)
            .map(|a| {
                a.annotations
                    .iter()
                    .enumerate()
                    .map(|(idx, e)| {
                        let color = register_class(classes, &e.label);
                        let c = &e.coordinates;
                        let bbox = BBox::new(
                            c.x - c.width / 2.0,
                            c.y - c.height / 2.0,
                            c.width,
                            c.height,
                        );
                        Label::new(idx as u32, image_name, e.label.clone(), bbox, color)
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
        let mut all = read_all(ctx)?;

        let annotations: Vec<CoreMlEntry> = labels
            .iter()
            .map(|l| CoreMlEntry {
                label: l.class_name.clone(),
                coordinates: CoreMlCoordinates {
                    x: l.bbox.center_x(),
                    y: l.bbox.center_y(),
                    width: l.bbox.width,
                    height: l.bbox.height,
                },
            })
            .collect();

        match all.iter_mut().find(|a| a.image == image_name) {
            Some(existing) => existing.annotations = annotations,
            None => all.push(CoreMlAnnotation {
                image: image_name.to_string(),
                annotations,
            }),
        }

        let path = ctx.label_dir.join(label_file_name);
        let json = serde_json::to_string(&all)?;
        std::fs::write(&path, json)?;
        log::debug!("Saved CoreML annotations for {:?} to {:?}", image_name, path);
        Ok(())
    }
}
