//! The per-item classification record.

use serde::{Deserialize, Serialize};

/// One classification outcome, keyed by the item's position in the source.
///
/// This is the line format of the progress store: records are appended once
/// per item and never updated. `is_obgyn` is the decision; `category`
/// carries either a topic label, the null category, or a failure marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification<C> {
    /// Zero-based position of the item in the loaded sequence.
    pub idx: usize,

    /// Whether the item belongs to the target domain.
    pub is_obgyn: bool,

    /// Topic category, null category, or failure marker.
    pub category: C,
}

impl<C> Classification<C> {
    /// Create a new classification record.
    pub fn new(idx: usize, is_obgyn: bool, category: C) -> Self {
        Self {
            idx,
            is_obgyn,
            category,
        }
    }
}
