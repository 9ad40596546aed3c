//! Unit tests for the label store implementations.
//!
//! Every test runs against a real temporary dataset directory with the
//! usual `images/` and `labels/` layout.

mod labelme_tests;
mod pascal_voc_tests;

use std::path::PathBuf;

use tempfile::TempDir;

use crate::format::traits::StoreContext;

/// Temporary dataset directories, kept alive for the test's duration.
pub(super) struct TestDirs {
    _dir: TempDir,
    image_dir: PathBuf,
    label_dir: PathBuf,
}

impl TestDirs {
    pub(super) fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let image_dir = dir.path().join("images");
        let label_dir = dir.path().join("labels");
        std::fs::create_dir_all(&image_dir).unwrap();
        std::fs::create_dir_all(&label_dir).unwrap();
        Self {
            _dir: dir,
            image_dir,
            label_dir,
        }
    }

    pub(super) fn ctx(&self) -> StoreContext<'_> {
        StoreContext {
            image_dir: &self.image_dir,
            label_dir: &self.label_dir,
        }
    }

    /// Write a real PNG so stores can read its dimensions.
    pub(super) fn write_png(&self, name: &str, width: u32, height: u32) {
        let img = image::RgbImage::new(width, height);
        img.save(self.image_dir.join(name)).unwrap();
    }

    pub(super) fn write_label_file(&self, name: &str, content: &str) {
        std::fs::write(self.label_dir.join(name), content).unwrap();
    }

    pub(super) fn read_label_file(&self, name: &str) -> String {
        std::fs::read_to_string(self.label_dir.join(name)).unwrap()
    }
}
