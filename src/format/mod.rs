//! Label storage abstraction.
//!
//! A [`LabelStore`] loads and saves one image's labels in a concrete
//! on-disk format; the [`StoreRegistry`] resolves the storage kind strings
//! carried in project settings. The batch driver treats unknown kinds as
//! empty loads and no-op saves (logged, never fatal).

mod error;
mod registry;
pub mod stores;
mod traits;

pub use error::FormatError;
pub use registry::StoreRegistry;
pub use traits::{LabelStore, LoadedLabels, StoreContext};
