//! YOLO CSV store: one `<stem>.txt` per image with normalized coordinates.
//!
//! Lines have the form `class_idx cx cy w h`, all but the index normalized
//! to the image dimensions. Class indices resolve through the name-sorted
//! registry, so the registry is sorted before indices are assigned.

use crate::format::error::FormatError;
use crate::format::traits::{LabelStore, LoadedLabels, StoreContext, image_stem};
use crate::model::{BBox, Label, YoloClass, register_class, sort_classes_by_name};
use crate::settings::DatasetType;

/// Per-image normalized text format ("YOLO CSV" in project settings).
pub struct YoloCsvStore;

impl YoloCsvStore {
    fn image_dimensions(
        ctx: &StoreContext<'_>,
        image_name: &str,
    ) -> Result<(f32, f32), FormatError> {
        let image_path = ctx.image_dir.join(image_name);
        let (w, h) = image::image_dimensions(&image_path)
            .map_err(|_| FormatError::ImageNotFound { path: image_path })?;
        Ok((w as f32, h as f32))
    }
}

impl LabelStore for YoloCsvStore {
    fn kind(&self) -> &'static str {
        "YOLO CSV"
    }

    fn description(&self) -> &'static str {
        "CSV format optimized for YOLO models."
    }

    fn dataset_types(&self) -> &[DatasetType] {
        &[DatasetType::BoundingBox]
    }

    fn label_file_name(&self, image_name: &str) -> String {
        format!("{}.txt", image_stem(image_name))
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

        let (img_w, img_h) = Self::image_dimensions(ctx, image_name)?;
        sort_classes_by_name(classes);

        let content = std::fs::read_to_string(&path)?;
        let mut labels = Vec::new();
        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let Some((class_idx, cx, cy, w, h)) = parse_line(line) else {
                return Err(FormatError::invalid_format(format!(
                    "malformed YOLO CSV line: {line:?}"
                )));
            };

            let class_name = match classes.get(class_idx) {
                Some(c) => c.name.clone(),
                None => format!("class_{class_idx}"),
            };
            let color = register_class(classes, &class_name);

            let bbox = BBox::new(
                (cx - w / 2.0) * img_w,
                (cy - h / 2.0) * img_h,
                w * img_w,
                h * img_h,
            );
            labels.push(Label::new(
                labels.len() as u32,
                image_name,
                class_name,
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
        classes: &mut Vec<YoloClass>,
    ) -> Result<(), FormatError> {
        sort_classes_by_name(classes);
        let (img_w, img_h) = Self::image_dimensions(ctx, image_name)?;

        let mut lines = Vec::new();
        for label in labels {
            let cx = label.bbox.center_x() / img_w;
            let cy = label.bbox.center_y() / img_h;
            let w = label.bbox.width / img_w;
            let h = label.bbox.height / img_h;

            let in_range =
                |v: f32| (0.0..=1.0).contains(&v);
            if !(in_range(cx) && in_range(cy) && in_range(w) && in_range(h)) {
                log::warn!(
                    "Skipping out-of-range box {:?} for {:?}",
                    label.bbox,
                    image_name
                );
                continue;
            }

            let class_idx = classes
                .iter()
                .position(|c| c.name == label.class_name)
                .unwrap_or(classes.len());
            lines.push(format!(
                "{} {:.6} {:.6} {:.6} {:.6}",
                class_idx, cx, cy, w, h
            ));
        }

        let path = ctx.label_dir.join(label_file_name);
        std::fs::write(&path, lines.join("\n"))?;
        log::debug!("Saved {} YOLO CSV lines to {:?}", lines.len(), path);
        Ok(())
    }
}

/// Parse one `class_idx cx cy w h` line.
fn parse_line(line: &str) -> Option<(usize, f32, f32, f32, f32)> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.len() < 5 {
        return None;
    }
    Some((
        parts[0].parse().ok()?,
        parts[1].parse().ok()?,
        parts[2].parse().ok()?,
        parts[3].parse().ok()?,
        parts[4].parse().ok()?,
    ))
}
