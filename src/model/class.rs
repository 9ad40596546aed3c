//! Class registry entries and the invariants batch operations rely on.
//!
//! The registry is an ordered list of [`YoloClass`] entries. Names are
//! unique and the list is sorted by name ascending; every operation that
//! may discover or rename classes re-asserts both afterwards.

use serde::{Deserialize, Serialize};

/// One known class: display name, color, and occurrence count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YoloClass {
    /// Class name, unique within the registry.
    pub name: String,
    /// RGB display color.
    pub color: [u8; 3],
    /// Number of labels observed with this class.
    #[serde(default)]
    pub count: usize,
}

impl YoloClass {
    /// Create a new class entry with a zero occurrence count.
    pub fn new(name: impl Into<String>, color: [u8; 3]) -> Self {
        Self {
            name: name.into(),
            color,
            count: 0,
        }
    }
}

/// Sort the registry by name ascending.
pub fn sort_classes_by_name(classes: &mut [YoloClass]) {
    classes.sort_by(|a, b| a.name.cmp(&b.name));
}

/// Drop duplicate names, keeping the first occurrence of each.
pub fn dedup_classes_by_name(classes: &mut Vec<YoloClass>) {
    let mut seen = std::collections::HashSet::new();
    classes.retain(|c| seen.insert(c.name.clone()));
}

/// Fixed palette for newly discovered classes.
pub fn palette_color(index: usize) -> [u8; 3] {
    const PALETTE: [[u8; 3]; 8] = [
        [66, 133, 244],
        [219, 68, 55],
        [244, 180, 0],
        [15, 157, 88],
        [171, 71, 188],
        [0, 172, 193],
        [255, 112, 67],
        [158, 157, 36],
    ];
    PALETTE[index % PALETTE.len()]
}

/// Record one occurrence of `name`, appending a new entry when unseen.
///
/// Returns the display color for labels of this class. The caller is
/// expected to re-sort and de-duplicate once its load pass finishes.
pub fn register_class(classes: &mut Vec<YoloClass>, name: &str) -> [u8; 3] {
    if let Some(entry) = classes.iter_mut().find(|c| c.name == name) {
        entry.count += 1;
        return entry.color;
    }
    let color = palette_color(classes.len());
    let mut entry = YoloClass::new(name, color);
    entry.count = 1;
    classes.push(entry);
    color
}
