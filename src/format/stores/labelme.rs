//! LabelMe JSON store: one `<stem>.json` per image with rectangle shapes.

use serde::{Deserialize, Serialize};

use crate::format::error::FormatError;
use crate::format::traits::{LabelStore, LoadedLabels, StoreContext, image_stem};
use crate::model::{BBox, Label, YoloClass, register_class};
use crate::settings::DatasetType;

/// Per-image LabelMe JSON. Only rectangle shapes are handled; other shape
/// types are skipped with a warning on load and never produced on save.
pub struct LabelMeStore;

#[derive(Serialize, Deserialize)]
struct LabelMeFile {
    version: String,
    shapes: Vec<LabelMeShape>,
    #[serde(rename = "imagePath")]
    image_path: String,
    #[serde(rename = "imageWidth", default, skip_serializing_if = "Option::is_none")]
    image_width: Option<u32>,
    #[serde(
        rename = "imageHeight",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    image_height: Option<u32>,
}

#[derive(Serialize, Deserialize)]
struct LabelMeShape {
    label: String,
    /// Two corner points for rectangles.
    points: Vec<[f32; 2]>,
    #[serde(rename = "shape_type")]
    shape_type: String,
}

impl LabelStore for LabelMeStore {
    fn kind(&self) -> &'static str {
        "LabelMe JSON"
    }

    fn description(&self) -> &'static str {
        "Polygonal annotation format for LabelMe."
    }

    fn dataset_types(&self) -> &[DatasetType] {
        &[DatasetType::BoundingBox, DatasetType::InstanceSegmentation]
    }

    fn label_file_name(&self, image_name: &str) -> String {
        format!("{}.json", image_stem(image_name))
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
        let file: LabelMeFile = serde_json::from_str(&json)?;

        let mut labels = Vec::new();
        for shape in file.shapes {
            if shape.shape_type != "rectangle" || shape.points.len() < 2 {
                log::warn!(
                    "Skipping {:?} shape in {:?} (only rectangles are supported)",
                    shape.shape_type,
                    path
                );
                continue;
            }
            let color = register_class(classes, &shape.label);
            let bbox = BBox::from_corners(
                shape.points[0][0],
                shape.points[0][1],
                shape.points[1][0],
                shape.points[1][1],
            );
            labels.push(Label::new(
                labels.len() as u32,
                image_name,
                shape.label,
                bbox,
                color,
            ));
        }

        Ok(LoadedLabels { labels, file_name })
    }

    fn save(
        &self,
        ctx: &StoreContext<'_>,
        label_file_name: &str,
        image_name: &str,
        labels: &[Label],
        _classes: &mut Vec<YoloClass>,
    ) -> Result<(), FormatError> {
        let dims = image::image_dimensions(ctx.image_dir.join(image_name)).ok();

        let file = LabelMeFile {
            version: "5.2.1".to_string(),
            shapes: labels
                .iter()
                .map(|l| LabelMeShape {
                    label: l.class_name.clone(),
                    points: vec![
                        [l.bbox.x, l.bbox.y],
                        [l.bbox.x + l.bbox.width, l.bbox.y + l.bbox.height],
                    ],
                    shape_type: "rectangle".to_string(),
                })
                .collect(),
            image_path: image_name.to_string(),
            image_width: dims.map(|(w, _)| w),
            image_height: dims.map(|(_, h)| h),
        };

        let path = ctx.label_dir.join(label_file_name);
        let json = serde_json::to_string_pretty(&file)?;
        std::fs::write(&path, json)?;
        log::debug!("Saved {} LabelMe shapes to {:?}", labels.len(), path);
        Ok(())
    }
}
