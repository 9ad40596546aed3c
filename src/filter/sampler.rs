//! Random pixel sampling within a bounding box, gated by a mask image.

use rand::Rng;

use crate::filter::color::is_black;
use crate::model::BBox;
use crate::pixels::{PixelSource, Rgb};

/// Sample up to `count` pixel colors uniformly inside `bbox`.
///
/// A sample is kept only when the mask pixel at the same coordinate matches
/// the requested orientation: with `foreground` set, the mask pixel must be
/// non-black; otherwise it must be black. When the first pass comes up
/// short, exactly one top-up pass is attempted; fewer than `count` samples
/// may be returned.
///
/// Degenerate boxes (zero or negative extent) yield no samples.
pub fn sample_box_pixels<P, R>(
    image: &P,
    mask: &P,
    bbox: &BBox,
    count: usize,
    foreground: bool,
    rng: &mut R,
) -> Vec<Rgb>
where
    P: PixelSource,
    R: Rng + ?Sized,
{
    let mut samples = Vec::with_capacity(count);
    if bbox.width <= 0.0 || bbox.height <= 0.0 {
        return samples;
    }

    sample_pass(image, mask, bbox, count, foreground, rng, &mut samples);
    let missing = count.saturating_sub(samples.len());
    if missing > 0 {
        sample_pass(image, mask, bbox, missing, foreground, rng, &mut samples);
    }
    samples
}

fn sample_pass<P, R>(
    image: &P,
    mask: &P,
    bbox: &BBox,
    count: usize,
    foreground: bool,
    rng: &mut R,
    samples: &mut Vec<Rgb>,
) where
    P: PixelSource,
    R: Rng + ?Sized,
{
    for _ in 0..count {
        let x = (bbox.x + rng.random_range(0.0..bbox.width)) as i64;
        let y = (bbox.y + rng.random_range(0.0..bbox.height)) as i64;
        let (Some(color), Some(mask_color)) = (image.pixel(x, y), mask.pixel(x, y)) else {
            continue;
        };
        if is_black(mask_color) != foreground {
            samples.push(color);
        }
    }
}
