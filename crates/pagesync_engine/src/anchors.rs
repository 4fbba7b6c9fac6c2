//! The section anchor table.

use pagesync_model::{PageId, SectionKey};
use std::collections::HashMap;

/// Maps each processed section to the remote page that anchors its
/// children.
///
/// Seeded with `root -> home` before traversal begins. Entries are
/// insert-once: a recorded anchor is immutable for the rest of the run, and
/// root's binding can never be replaced.
#[derive(Debug)]
pub struct SectionAnchors {
    map: HashMap<SectionKey, PageId>,
}

impl SectionAnchors {
    /// Creates the table, seeding root with the home page id.
    pub fn new(home: PageId) -> Self {
        let mut map = HashMap::new();
        map.insert(SectionKey::root(), home);
        Self { map }
    }

    /// The anchor recorded for a section, if any.
    pub fn get(&self, key: &SectionKey) -> Option<PageId> {
        self.map.get(key).copied()
    }

    /// Records a section's anchor.
    ///
    /// Returns false without writing when the key is root or already bound.
    pub fn record(&mut self, key: &SectionKey, id: PageId) -> bool {
        if key.is_root() || self.map.contains_key(key) {
            return false;
        }
        self.map.insert(key.clone(), id);
        true
    }
}
