//! Color-based bounding-box classification.
//!
//! Each box is sampled inside the mask's foreground, the sampled colors are
//! compared against two exemplar palettes ("object" and "background"), and
//! the box is kept iff it looks more like the object palette:
//! `object_distance < background_distance * scale`.
//!
//! Three distance variants exist and their aggregation differs on purpose;
//! callers that persist filter results depend on each variant's exact
//! arithmetic, so the variants must not be unified.

use std::path::Path;

use rand::Rng;

use crate::filter::color::{avg_three_closest, color_distance, mean, min_color_distance};
use crate::filter::sampler::sample_box_pixels;
use crate::model::Label;
use crate::pixels::{FilterError, PixelBuffer, PixelSource, Rgb};

/// Distance variant used by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterMethod {
    /// Per pixel: distance to the nearest exemplar; averaged over pixels.
    Closest,
    /// Per pixel: mean of the three smallest exemplar distances; averaged
    /// over pixels.
    ClosestThree,
    /// Per exemplar: mean distance over pixels; summed (not averaged) over
    /// exemplars.
    ExemplarSum,
}

impl FilterMethod {
    /// Menu labels offered to the user, in display order.
    pub fn menu_names() -> &'static [&'static str] {
        &["Closest 3 colors", "Average colors", "Closest color"]
    }

    /// Resolve a menu label to its algorithm.
    ///
    /// The label/algorithm pairing is historical and datasets have been
    /// filtered with it; it is kept as-is rather than made literal.
    pub fn from_name(name: &str) -> Self {
        match name {
            "Closest 3 colors" => FilterMethod::ExemplarSum,
            "Average colors" => FilterMethod::ClosestThree,
            _ => FilterMethod::Closest,
        }
    }
}

/// Number of pixels sampled per box.
///
/// Integer division: larger factors mean fewer samples, with a floor of
/// five. The parameter reads as "higher = more accurate" but the formula
/// inverts that; kept verbatim because stored tuning values depend on it.
fn sample_count(speed_accuracy_factor: u32) -> usize {
    (10 / speed_accuracy_factor.max(1)).max(5) as usize
}

/// Distance of one box's samples to an exemplar set, per variant.
fn set_distance(method: FilterMethod, samples: &[Rgb], exemplars: &[Rgb]) -> f32 {
    match method {
        FilterMethod::Closest => {
            let distances: Vec<f32> = samples
                .iter()
                .map(|&s| min_color_distance(s, exemplars))
                .collect();
            mean(&distances)
        }
        FilterMethod::ClosestThree => {
            let distances: Vec<f32> = samples
                .iter()
                .map(|&s| avg_three_closest(s, exemplars))
                .collect();
            mean(&distances)
        }
        FilterMethod::ExemplarSum => exemplars
            .iter()
            .map(|&e| {
                let distances: Vec<f32> =
                    samples.iter().map(|&s| color_distance(s, e)).collect();
                mean(&distances)
            })
            .sum(),
    }
}

/// Filter `labels` in place, keeping boxes whose sampled content is closer
/// to the object palette than to the background palette.
///
/// `scale` is the raw acceptance multiplier (see [`filter_labels_at`] for
/// the strength/100 convention). When both exemplar sets are empty the
/// filter is skipped and every label is kept. Box geometry is never
/// mutated.
pub fn filter_labels<P, R>(
    image: &P,
    mask: &P,
    labels: &mut Vec<Label>,
    object_colors: &[Rgb],
    background_colors: &[Rgb],
    speed_accuracy_factor: u32,
    scale: f32,
    method: FilterMethod,
    rng: &mut R,
) where
    P: PixelSource,
    R: Rng + ?Sized,
{
    if object_colors.is_empty() && background_colors.is_empty() {
        log::debug!("No exemplar colors selected, keeping all {} labels", labels.len());
        return;
    }

    let count = sample_count(speed_accuracy_factor);
    let before = labels.len();

    labels.retain(|label| {
        let samples = sample_box_pixels(image, mask, &label.bbox, count, true, rng);
        let object_distance = set_distance(method, &samples, object_colors);
        let background_distance = set_distance(method, &samples, background_colors);
        object_distance < background_distance * scale
    });

    log::debug!("Filtered labels count: {} / {}", labels.len(), before);
}

/// Load the main and mask images from disk and run [`filter_labels`].
///
/// `strength` is the user-facing value and is divided by 100 before use,
/// so the effective scale is typically in (0, 2.5]. If either image fails
/// to decode the labels are left untouched and the error is returned.
pub fn filter_labels_at<R>(
    image_path: &Path,
    mask_path: &Path,
    labels: &mut Vec<Label>,
    object_colors: &[Rgb],
    background_colors: &[Rgb],
    speed_accuracy_factor: u32,
    strength: f32,
    method: FilterMethod,
    rng: &mut R,
) -> Result<(), FilterError>
where
    R: Rng + ?Sized,
{
    let image = PixelBuffer::open(image_path)?;
    let mask = PixelBuffer::open(mask_path)?;

    filter_labels(
        &image,
        &mask,
        labels,
        object_colors,
        background_colors,
        speed_accuracy_factor,
        strength / 100.0,
        method,
        rng,
    );
    Ok(())
}
