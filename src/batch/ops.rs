//! Named dataset-wide operations built on the batch driver.

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::batch::driver::{
    self, BatchContext, BatchError, BatchReport, FileCtx, ProgressFn, apply_to_dataset_with_progress,
};
use crate::batch::shared::SharedClasses;
use crate::filter::{FilterMethod, filter_labels};
use crate::model::{BBox, Label, YoloClass, dedup_classes_by_name, sort_classes_by_name};
use crate::pixels::{PixelBuffer, Rgb};

/// How resize and shift amounts are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScaleMode {
    /// Amounts are multiples of the box's own size.
    RelativeToBox,
    /// Amounts are multiples of the image's size.
    RelativeToImage,
    /// Amounts are absolute pixels.
    Pixels,
}

impl ScaleMode {
    /// Menu labels offered to the user, in display order.
    pub fn menu_names() -> &'static [&'static str] {
        &["Relative to box size", "Relative to image size", "Pixels"]
    }

    /// Resolve a menu label; unrecognized labels fall back to pixels.
    pub fn from_name(name: &str) -> Self {
        match name {
            "Relative to box size" => ScaleMode::RelativeToBox,
            "Relative to image size" => ScaleMode::RelativeToImage,
            _ => ScaleMode::Pixels,
        }
    }
}

/// Rename every label of class `old_name` to `new_name` across the dataset,
/// recoloring it and updating the shared registry.
///
/// Index-based stores resolve stored class indices through the name-sorted
/// registry, so each file's load must see the registry as it was before the
/// rename. The before-hook restores the old name per file; the action then
/// re-applies the rename and rewrites the file's labels.
pub fn rename_class_with_progress(
    ctx: &BatchContext<'_>,
    old_name: &str,
    new_name: &str,
    new_color: [u8; 3],
    progress: ProgressFn<'_>,
) -> Result<BatchReport, BatchError> {
    let apply_rename = |classes: &mut Vec<YoloClass>| {
        for class in classes.iter_mut() {
            if class.name == old_name {
                class.name = new_name.to_string();
                class.color = new_color;
            }
        }
        dedup_classes_by_name(classes);
        sort_classes_by_name(classes);
    };

    ctx.shared.with_classes_mut(&apply_rename);

    let before = |_fctx: &FileCtx<'_>, shared: &SharedClasses| {
        shared.with_classes_mut(|classes: &mut Vec<YoloClass>| {
            for class in classes.iter_mut() {
                if class.name == new_name {
                    class.name = old_name.to_string();
                }
            }
            dedup_classes_by_name(classes);
            sort_classes_by_name(classes);
        });
    };

    let action = |_fctx: &FileCtx<'_>, labels: &mut Vec<Label>, shared: &SharedClasses| {
        shared.with_classes_mut(&apply_rename);
        for label in labels.iter_mut() {
            if label.class_name == old_name {
                label.class_name = new_name.to_string();
                label.color = new_color;
            }
        }
    };
    apply_to_dataset_with_progress(ctx, Some(&before), &action, progress)
}

/// Resize every box in the dataset to `(width, height)` interpreted per
/// `mode`, keeping each box's center fixed.
pub fn resize_boxes_with_progress(
    ctx: &BatchContext<'_>,
    width: f32,
    height: f32,
    mode: ScaleMode,
    progress: ProgressFn<'_>,
) -> Result<BatchReport, BatchError> {
    let action = move |fctx: &FileCtx<'_>, labels: &mut Vec<Label>, _: &SharedClasses| {
        let dims = image_dims(fctx, mode);
        for label in labels.iter_mut() {
            let Some((w, h)) = scaled_amount(mode, &label.bbox, dims, width, height) else {
                continue;
            };
            label.bbox = label.bbox.resized_centered(w, h);
        }
    };
    apply_to_dataset_with_progress(ctx, None, &action, progress)
}

/// Shift every box in the dataset by `(dx, dy)` interpreted per `mode`.
pub fn shift_boxes_with_progress(
    ctx: &BatchContext<'_>,
    dx: f32,
    dy: f32,
    mode: ScaleMode,
    progress: ProgressFn<'_>,
) -> Result<BatchReport, BatchError> {
    let action = move |fctx: &FileCtx<'_>, labels: &mut Vec<Label>, _: &SharedClasses| {
        let dims = image_dims(fctx, mode);
        for label in labels.iter_mut() {
            let Some((sx, sy)) = scaled_amount(mode, &label.bbox, dims, dx, dy) else {
                continue;
            };
            let bbox = &label.bbox;
            label.bbox = bbox.with_center(bbox.center_x() + sx, bbox.center_y() + sy);
        }
    };
    apply_to_dataset_with_progress(ctx, None, &action, progress)
}

/// Re-save every file's labels with the `target_kind` storage.
///
/// Files are loaded with the storage kind in the project settings; the
/// settings themselves are not modified.
pub fn convert_dataset_with_progress(
    ctx: &BatchContext<'_>,
    target_kind: &str,
    progress: ProgressFn<'_>,
) -> Result<BatchReport, BatchError> {
    let action = |_: &FileCtx<'_>, _: &mut Vec<Label>, _: &SharedClasses| {};
    driver::run(
        ctx,
        &ctx.settings.label_storage,
        target_kind,
        None,
        &action,
        progress,
        driver::PARALLEL_THRESHOLD,
    )
}

/// Parameters for [`filter_boxes_by_color_with_progress`].
pub struct ColorFilterParams {
    /// Exemplar colors the object should look like.
    pub object_colors: Vec<Rgb>,
    /// Exemplar colors the background looks like.
    pub background_colors: Vec<Rgb>,
    pub method: FilterMethod,
    pub speed_accuracy_factor: u32,
    /// Raw acceptance multiplier (boxes kept when object distance is below
    /// background distance times this).
    pub scale: f32,
    /// Fixed RNG seed for reproducible runs; `None` draws from the OS.
    pub seed: Option<u64>,
}

impl Default for ColorFilterParams {
    fn default() -> Self {
        Self {
            object_colors: Vec::new(),
            background_colors: Vec::new(),
            method: FilterMethod::ExemplarSum,
            speed_accuracy_factor: 50,
            scale: 1.5,
            seed: None,
        }
    }
}

/// Drop boxes across the dataset whose sampled content looks more like the
/// background palette than the object palette.
///
/// The image is read from the image subdirectory and the mask from the
/// label subdirectory, both under the image's own file name. Files whose
/// images fail to decode keep their labels unchanged.
pub fn filter_boxes_by_color_with_progress(
    ctx: &BatchContext<'_>,
    params: &ColorFilterParams,
    progress: ProgressFn<'_>,
) -> Result<BatchReport, BatchError> {
    let action = move |fctx: &FileCtx<'_>, labels: &mut Vec<Label>, _: &SharedClasses| {
        let image_path = fctx.settings.image_dir(fctx.root).join(fctx.image_name);
        let mask_path = fctx.settings.label_dir(fctx.root).join(fctx.image_name);

        let image = match PixelBuffer::open(&image_path) {
            Ok(image) => image,
            Err(err) => {
                log::warn!("Skipping color filter for {:?}: {}", fctx.image_name, err);
                return;
            }
        };
        let mask = match PixelBuffer::open(&mask_path) {
            Ok(mask) => mask,
            Err(err) => {
                log::warn!("Skipping color filter for {:?}: {}", fctx.image_name, err);
                return;
            }
        };

        let mut rng = match params.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        filter_labels(
            &image,
            &mask,
            labels,
            &params.object_colors,
            &params.background_colors,
            params.speed_accuracy_factor,
            params.scale,
            params.method,
            &mut rng,
        );
    };
    apply_to_dataset_with_progress(ctx, None, &action, progress)
}

/// Image dimensions, looked up only for the mode that needs them.
fn image_dims(fctx: &FileCtx<'_>, mode: ScaleMode) -> Option<(f32, f32)> {
    if mode != ScaleMode::RelativeToImage {
        return None;
    }
    let path = fctx.settings.image_dir(fctx.root).join(fctx.image_name);
    match image::image_dimensions(&path) {
        Ok((w, h)) => Some((w as f32, h as f32)),
        Err(err) => {
            log::warn!("Failed to read dimensions of {:?}: {}", path, err);
            None
        }
    }
}

/// Interpret `(x, y)` amounts per mode. `None` when image dimensions were
/// required but unavailable; the caller leaves the box untouched.
fn scaled_amount(
    mode: ScaleMode,
    bbox: &BBox,
    dims: Option<(f32, f32)>,
    x: f32,
    y: f32,
) -> Option<(f32, f32)> {
    match mode {
        ScaleMode::RelativeToBox => Some((bbox.width * x, bbox.height * y)),
        ScaleMode::RelativeToImage => dims.map(|(w, h)| (w * x, h * y)),
        ScaleMode::Pixels => Some((x, y)),
    }
}
