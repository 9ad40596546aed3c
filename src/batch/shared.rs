//! Shared state for batch runs: the class registry and progress counter
//! behind one mutex, plus cooperative cancellation.

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::model::{YoloClass, dedup_classes_by_name, sort_classes_by_name};

struct SharedState {
    classes: Vec<YoloClass>,
    processed: usize,
}

/// Class registry and progress counter shared across batch workers.
///
/// A single mutex guards both so that class discovery and the processed
/// count always advance together. Workers take the lock per file; the lock
/// is held across the load call (loading discovers classes) but saving
/// runs against a snapshot taken under the lock.
pub struct SharedClasses {
    state: Mutex<SharedState>,
}

impl SharedClasses {
    /// Empty registry, zero progress.
    pub fn new() -> Self {
        Self::with_classes(Vec::new())
    }

    /// Start from an existing registry (usually the project settings').
    pub fn with_classes(classes: Vec<YoloClass>) -> Self {
        Self {
            state: Mutex::new(SharedState {
                classes,
                processed: 0,
            }),
        }
    }

    /// Copy of the current registry.
    pub fn snapshot(&self) -> Vec<YoloClass> {
        self.lock().classes.clone()
    }

    /// Run `f` with exclusive access to the registry.
    pub fn with_classes_mut<T>(&self, f: impl FnOnce(&mut Vec<YoloClass>) -> T) -> T {
        f(&mut self.lock().classes)
    }

    /// Count one attempted file and report processed/total.
    ///
    /// The callback runs while the counter's lock is held, so reported
    /// fractions are monotonically non-decreasing even across workers.
    pub fn advance(&self, total: usize, progress: impl FnOnce(f64)) {
        let mut state = self.lock();
        state.processed += 1;
        progress(state.processed as f64 / total as f64);
    }

    /// Consume the shared state, returning the registry sorted and
    /// de-duplicated.
    pub fn into_classes(self) -> Vec<YoloClass> {
        let mut classes = self.state.into_inner().unwrap_or_else(|e| e.into_inner()).classes;
        dedup_classes_by_name(&mut classes);
        sort_classes_by_name(&mut classes);
        classes
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, SharedState> {
        // A worker can only poison the lock by panicking mid-update; the
        // registry is still structurally valid, so recover and continue.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for SharedClasses {
    fn default() -> Self {
        Self::new()
    }
}

/// Cooperative cancellation flag, checked once per file by the driver.
#[derive(Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Files already in flight still finish.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_reports_increasing_fractions() {
        let shared = SharedClasses::new();
        let mut seen = Vec::new();
        shared.advance(4, |p| seen.push(p));
        shared.advance(4, |p| seen.push(p));
        shared.advance(4, |p| seen.push(p));
        assert_eq!(seen, vec![0.25, 0.5, 0.75]);
    }

    #[test]
    fn test_into_classes_sorts_and_dedups() {
        let shared = SharedClasses::with_classes(vec![
            YoloClass::new("dog", [1, 1, 1]),
            YoloClass::new("cat", [2, 2, 2]),
            YoloClass::new("dog", [3, 3, 3]),
        ]);
        let classes = shared.into_classes();
        let names: Vec<_> = classes.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["cat", "dog"]);
    }

    #[test]
    fn test_cancel_token_propagates_to_clones() {
        let token = CancelToken::new();
        let clone = token.clone();
        assert!(!clone.is_cancelled());
        token.cancel();
        assert!(clone.is_cancelled());
    }
}
