//! Registry of label storage implementations, keyed by kind string.

use std::collections::HashMap;

use crate::format::stores::{
    CocoStore, CoreMlStore, LabelMeStore, PascalVocStore, YoloCsvStore, YoloJsonStore,
};
use crate::format::traits::LabelStore;
use crate::settings::DatasetType;

/// Registry of available label stores.
///
/// Lookups use the storage kind strings carried in project settings.
/// Unknown kinds (including "SQLite Database", which has no store) are
/// handled by callers as empty loads / no-op saves rather than hard
/// failures.
pub struct StoreRegistry {
    stores: HashMap<&'static str, Box<dyn LabelStore>>,
}

impl StoreRegistry {
    /// Create a registry with all built-in stores registered.
    pub fn new() -> Self {
        let mut registry = Self {
            stores: HashMap::new(),
        };

        registry.register(Box::new(YoloJsonStore));
        registry.register(Box::new(YoloCsvStore));
        registry.register(Box::new(CocoStore));
        registry.register(Box::new(PascalVocStore));
        registry.register(Box::new(LabelMeStore));
        registry.register(Box::new(CoreMlStore));

        registry
    }

    /// Register a store implementation.
    pub fn register(&mut self, store: Box<dyn LabelStore>) {
        self.stores.insert(store.kind(), store);
    }

    /// Get a store by its kind string.
    pub fn get(&self, kind: &str) -> Option<&dyn LabelStore> {
        self.stores.get(kind).map(|s| s.as_ref())
    }

    /// All registered kind strings.
    pub fn kinds(&self) -> Vec<&'static str> {
        self.stores.keys().copied().collect()
    }

    /// Stores that can represent the given dataset type.
    pub fn for_dataset_type(&self, dataset_type: DatasetType) -> Vec<&dyn LabelStore> {
        self.stores
            .values()
            .filter(|s| s.dataset_types().contains(&dataset_type))
            .map(|s| s.as_ref())
            .collect()
    }
}

impl Default for StoreRegistry {
    fn default() -> Self {
        Self::new()
    }
}
