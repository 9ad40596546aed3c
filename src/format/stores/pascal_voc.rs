//! Pascal VOC store: one XML annotation file per image.
//!
//! Registered under the kind string "Pascal VOC JSON" because that is the
//! name existing project settings carry; the on-disk content is standard
//! Pascal VOC XML.

use serde::{Deserialize, Serialize};

use crate::format::error::FormatError;
use crate::format::traits::{LabelStore, LoadedLabels, StoreContext, image_stem};
use crate::model::{BBox, Label, YoloClass, register_class};
use crate::settings::DatasetType;

/// Per-image Pascal VOC XML.
pub struct PascalVocStore;

#[derive(Serialize, Deserialize)]
#[serde(rename = "annotation")]
struct VocAnnotation {
    folder: String,
    filename: String,
    size: VocSize,
    #[serde(rename = "object", default)]
    objects: Vec<VocObject>,
}

#[derive(Serialize, Deserialize)]
struct VocSize {
    width: u32,
    height: u32,
    depth: u32,
}

#[derive(Serialize, Deserialize)]
struct VocObject {
    name: String,
    bndbox: VocBox,
}

#[derive(Serialize, Deserialize)]
struct VocBox {
    xmin: f32,
    ymin: f32,
    xmax: f32,
    ymax: f32,
}

impl LabelStore for PascalVocStore {
    fn kind(&self) -> &'static str {
        "Pascal VOC JSON"
    }

    fn description(&self) -> &'static str {
        "Derived from Pascal VOC XML annotations, supports bounding boxes."
    }

    fn dataset_types(&self) -> &[DatasetType] {
        &[DatasetType::BoundingBox]
    }

    fn label_file_name(&self, image_name: &str) -> String {
        format!("{}.xml", image_stem(image_name))
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

        let xml = std::fs::read_to_string(&path)?;
        let annotation: VocAnnotation = quick_xml::de::from_str(&xml)?;

        let labels = annotation
            .objects
            .into_iter()
            .enumerate()
            .map(|(idx, obj)| {
                let color = register_class(classes, &obj.name);
                let bbox = BBox::from_corners(
                    obj.bndbox.xmin,
                    obj.bndbox.ymin,
                    obj.bndbox.xmax,
                    obj.bndbox.ymax,
                );
                Label::new(idx as u32, image_name, obj.name, bbox, color)
            })
            .collect();

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
        // Dimensions are best-effort: VOC files carry them, but a missing
        // image must not block the save (written as 0x0 with a warning).
        let (width, height) = match image::image_dimensions(ctx.image_dir.join(image_name)) {
            Ok(dims) => dims,
            Err(_) => {
                log::warn!("No dimensions for {:?}, writing 0x0", image_name);
                (0, 0)
            }
        };

        let annotation = VocAnnotation {
            folder: ctx
                .image_dir
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("")
                .to_string(),
            filename: image_name.to_string(),
            size: VocSize {
                width,
                height,
                depth: 3,
            },
            objects: labels
                .iter()
                .map(|l| VocObject {
                    name: l.class_name.clone(),
                    bndbox: VocBox {
                        xmin: l.bbox.x,
                        ymin: l.bbox.y,
                        xmax: l.bbox.x + l.bbox.width,
                        ymax: l.bbox.y + l.bbox.height,
                    },
                })
                .collect(),
        };

        let xml = quick_xml::se::to_string(&annotation)?;
        let path = ctx.label_dir.join(label_file_name);
        std::fs::write(&path, xml)?;
        log::debug!("Saved {} VOC objects to {:?}", labels.len(), path);
        Ok(())
    }
}
