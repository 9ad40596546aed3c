//! Dataset-wide batch driver.
//!
//! Applies one action to every image's labels: enumerate the image
//! directory, load each file's labels through the configured store, run the
//! action, save the result. Large datasets are split into contiguous chunks
//! processed by scoped worker threads.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::batch::shared::{CancelToken, SharedClasses};
use crate::format::{LabelStore, StoreContext, StoreRegistry};
use crate::model::Label;
use crate::settings::ProjectSettings;

/// At or above this many files the driver goes parallel.
pub(crate) const PARALLEL_THRESHOLD: usize = 50_000;

/// Extensions treated as dataset images during enumeration.
const IMAGE_EXTENSIONS: [&str; 6] = ["png", "jpg", "jpeg", "bmp", "tiff", "webp"];

/// Everything a batch run needs besides the action itself.
pub struct BatchContext<'a> {
    /// Dataset root directory.
    pub root: &'a Path,
    /// Project settings, including storage kind and subdirectory names.
    pub settings: &'a ProjectSettings,
    /// Store registry used to resolve storage kinds.
    pub registry: &'a StoreRegistry,
    /// Shared class registry and progress counter.
    pub shared: &'a SharedClasses,
    /// Cooperative cancellation flag, checked once per file.
    pub cancel: &'a CancelToken,
}

/// Per-file context handed to batch actions.
pub struct FileCtx<'a> {
    /// Dataset root directory.
    pub root: &'a Path,
    /// File name of the image being processed.
    pub image_name: &'a str,
    /// Project settings the run was started with.
    pub settings: &'a ProjectSettings,
}

/// Action applied to one file's labels. May take the registry lock through
/// the shared handle, so it must not be called while the lock is held.
pub type FileAction<'a> = &'a (dyn Fn(&FileCtx<'_>, &mut Vec<Label>, &SharedClasses) + Sync);

/// Hook run per file before its labels are loaded. Used by operations that
/// must restore prior registry state so loading resolves against the
/// naming the files were written with (class rename).
pub type FileHook<'a> = &'a (dyn Fn(&FileCtx<'_>, &SharedClasses) + Sync);

/// Progress callback; receives processed / total in `[0, 1]`.
pub type ProgressFn<'a> = &'a (dyn Fn(f64) + Sync);

/// Outcome counts of one batch run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchReport {
    /// Files enumerated.
    pub total: usize,
    /// Files whose labels were loaded, transformed and saved.
    pub processed: usize,
    /// Files with no labels; nothing was written for them.
    pub skipped: usize,
    /// Files whose load or save failed; logged and left as they were.
    pub failed: usize,
    /// Files not attempted because the run was cancelled.
    pub cancelled: usize,
}

impl BatchReport {
    fn merge(&mut self, other: &BatchReport) {
        self.processed += other.processed;
        self.skipped += other.skipped;
        self.failed += other.failed;
        self.cancelled += other.cancelled;
    }
}

/// Errors that abort a batch run before any file is touched.
#[derive(Debug, Error)]
pub enum BatchError {
    #[error("failed to enumerate images in {path:?}: {source}")]
    Enumerate {
        path: PathBuf,
        source: std::io::Error,
    },
}

enum FileOutcome {
    Processed,
    Skipped,
    Failed,
}

/// Apply `action` to every image's labels in the dataset at `root`.
///
/// Labels are loaded and saved with the storage kind named in `settings`.
/// When `before` is given it runs per file ahead of the load. Per-file
/// load or save errors are logged and counted, never fatal. `progress` is
/// invoked once per attempted file with processed/total, monotonically
/// non-decreasing; it is never invoked for an empty dataset.
pub fn apply_to_dataset_with_progress(
    ctx: &BatchContext<'_>,
    before: Option<FileHook<'_>>,
    action: FileAction<'_>,
    progress: ProgressFn<'_>,
) -> Result<BatchReport, BatchError> {
    run(
        ctx,
        &ctx.settings.label_storage,
        &ctx.settings.label_storage,
        before,
        action,
        progress,
        PARALLEL_THRESHOLD,
    )
}

/// Full-control entry point used by the named operations in
/// [`crate::batch::ops`]. `load_kind` and `save_kind` differ only for
/// dataset conversion; `parallel_threshold` is a parameter so tests can
/// drive the parallel path on small datasets.
#[allow(clippy::too_many_arguments)]
pub(crate) fn run(
    ctx: &BatchContext<'_>,
    load_kind: &str,
    save_kind: &str,
    before: Option<FileHook<'_>>,
    action: FileAction<'_>,
    progress: ProgressFn<'_>,
    parallel_threshold: usize,
) -> Result<BatchReport, BatchError> {
    let image_dir = ctx.settings.image_dir(ctx.root);
    let files = enumerate_images(&image_dir)?;

    let mut report = BatchReport {
        total: files.len(),
        ..BatchReport::default()
    };
    if files.is_empty() {
        log::info!("No images found in {:?}, nothing to do", image_dir);
        return Ok(report);
    }

    let (Some(load_store), Some(save_store)) =
        (ctx.registry.get(load_kind), ctx.registry.get(save_kind))
    else {
        log::warn!(
            "Unknown label storage kind ({:?} -> {:?}), skipping all {} files",
            load_kind,
            save_kind,
            files.len()
        );
        report.skipped = files.len();
        return Ok(report);
    };

    let worker = Worker {
        root: ctx.root,
        settings: ctx.settings,
        shared: ctx.shared,
        cancel: ctx.cancel,
        load_store,
        save_store,
        same_kind: load_kind == save_kind,
        before,
        action,
        progress,
        total: files.len(),
    };

    if files.len() >= parallel_threshold {
        report.merge(&worker.run_parallel(&files));
    } else {
        report.merge(&worker.run_chunk(&files));
    }

    log::info!(
        "Batch finished: {} processed, {} skipped, {} failed, {} cancelled of {}",
        report.processed,
        report.skipped,
        report.failed,
        report.cancelled,
        report.total
    );
    Ok(report)
}

/// Image file names under `dir`, sorted ascending for deterministic order.
fn enumerate_images(dir: &Path) -> Result<Vec<String>, BatchError> {
    let entries = std::fs::read_dir(dir).map_err(|source| BatchError::Enumerate {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| BatchError::Enumerate {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let is_image = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| IMAGE_EXTENSIONS.iter().any(|x| e.eq_ignore_ascii_case(x)));
        if !is_image {
            continue;
        }
        if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            names.push(name.to_string());
        }
    }
    names.sort();
    Ok(names)
}

struct Worker<'a> {
    root: &'a Path,
    settings: &'a ProjectSettings,
    shared: &'a SharedClasses,
    cancel: &'a CancelToken,
    load_store: &'a dyn LabelStore,
    save_store: &'a dyn LabelStore,
    same_kind: bool,
    before: Option<FileHook<'a>>,
    action: FileAction<'a>,
    progress: ProgressFn<'a>,
    total: usize,
}

impl Worker<'_> {
    /// Split `files` into contiguous chunks, one scoped thread each.
    fn run_parallel(&self, files: &[String]) -> BatchReport {
        let chunks = num_cpus::get().min(self.total / 10).max(1);
        let chunk_size = self.total / chunks;
        log::info!(
            "Processing {} files in {} chunks of ~{}",
            self.total,
            chunks,
            chunk_size
        );

        let mut report = BatchReport::default();
        std::thread::scope(|scope| {
            let mut handles = Vec::with_capacity(chunks);
            for i in 0..chunks {
                let start = i * chunk_size;
                let end = if i == chunks - 1 {
                    self.total
                } else {
                    (i + 1) * chunk_size
                };
                let chunk = &files[start..end];
                handles.push(scope.spawn(move || self.run_chunk(chunk)));
            }
            for handle in handles {
                match handle.join() {
                    Ok(part) => report.merge(&part),
                    Err(_) => log::error!("Batch worker panicked, its chunk is lost"),
                }
            }
        });
        report
    }

    fn run_chunk(&self, files: &[String]) -> BatchReport {
        let mut report = BatchReport::default();
        for (idx, name) in files.iter().enumerate() {
            if self.cancel.is_cancelled() {
                report.cancelled += files.len() - idx;
                log::info!("Batch cancelled, {} files not attempted", report.cancelled);
                break;
            }
            match self.process_file(name) {
                FileOutcome::Processed => report.processed += 1,
                FileOutcome::Skipped => report.skipped += 1,
                FileOutcome::Failed => report.failed += 1,
            }
            // The callback runs under the counter's lock so concurrent
            // workers cannot report out of order.
            self.shared.advance(self.total, self.progress);
        }
        report
    }

    fn process_file(&self, image_name: &str) -> FileOutcome {
        let ctx = FileCtx {
            root: self.root,
            image_name,
            settings: self.settings,
        };
        if let Some(before) = self.before {
            before(&ctx, self.shared);
        }

        let image_dir = self.settings.image_dir(self.root);
        let label_dir = self.settings.label_dir(self.root);
        let store_ctx = StoreContext {
            image_dir: &image_dir,
            label_dir: &label_dir,
        };

        // Loading discovers classes, so it runs under the registry lock.
        let loaded = self.shared.with_classes_mut(|classes| {
            self.load_store.load(&store_ctx, image_name, classes)
        });
        let loaded = match loaded {
            Ok(loaded) => loaded,
            Err(err) => {
                log::warn!("Failed to load labels for {:?}: {}", image_name, err);
                return FileOutcome::Failed;
            }
        };
        if loaded.labels.is_empty() {
            return FileOutcome::Skipped;
        }

        let mut labels = loaded.labels;
        (self.action)(&ctx, &mut labels, self.shared);

        let file_name = if self.same_kind {
            loaded.file_name
        } else {
            self.save_store.label_file_name(image_name)
        };

        // Saving works against a registry snapshot; stores may reorder it
        // locally (YOLO CSV index assignment) without affecting the shared
        // registry.
        let mut classes = self.shared.snapshot();
        if let Err(err) =
            self.save_store
                .save(&store_ctx, &file_name, image_name, &labels, &mut classes)
        {
            log::warn!("Failed to save labels for {:?}: {}", image_name, err);
            return FileOutcome::Failed;
        }
        FileOutcome::Processed
    }
}
