//! Dataset-wide batch processing.
//!
//! The driver walks every image in the dataset and applies one action to
//! its labels; the ops module names the concrete operations (rename,
//! resize, shift, convert, color filter) built on it.

mod driver;
mod ops;
mod shared;

pub use driver::{
    BatchContext, BatchError, BatchReport, FileAction, FileCtx, FileHook, ProgressFn,
    apply_to_dataset_with_progress,
};
pub use ops::{
    ColorFilterParams, ScaleMode, convert_dataset_with_progress,
    filter_boxes_by_color_with_progress, rename_class_with_progress, resize_boxes_with_progress,
    shift_boxes_with_progress,
};
pub use shared::{CancelToken, SharedClasses};
