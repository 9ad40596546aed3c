//! labelkit - bounding-box dataset toolkit
//!
//! Core engine for an image-annotation application: a color-based
//! bounding-box classifier and a dataset-wide batch driver that applies
//! per-file label transforms (class rename, geometry correction, format
//! conversion, color filtering) with progress reporting.
//!
//! The UI, gesture handling and file pickers live elsewhere; this crate is
//! invoked programmatically and only touches the local filesystem.

pub mod batch;
pub mod filter;
pub mod format;
pub mod model;
pub mod pixels;
pub mod settings;

pub use batch::{
    BatchContext, BatchReport, CancelToken, SharedClasses, apply_to_dataset_with_progress,
};
pub use filter::{FilterMethod, filter_labels, filter_labels_at};
pub use format::{FormatError, LabelStore, StoreRegistry};
pub use model::{BBox, Label, YoloClass};
pub use settings::{DatasetType, ProjectSettings, SettingsManager};
