//! Color-based bounding-box filtering.
//!
//! Boxes are classified by randomly sampling their pixels (restricted to a
//! mask's foreground) and comparing the samples against user-picked object
//! and background exemplar colors.

mod classify;
mod color;
mod sampler;

pub use classify::{FilterMethod, filter_labels, filter_labels_at};
pub use color::{avg_three_closest, color_distance, is_black, min_color_distance};
pub use sampler::sample_box_pixels;
