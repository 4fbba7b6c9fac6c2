//! The local input for one publishing run.

use crate::page::LocalPage;
use crate::section::SectionKey;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// The full local document tree, read-only for the duration of one run.
///
/// Page order is significant: within a section, pages are reconciled in the
/// order they appear here, and the first processed entry of a section
/// becomes the section's anchor.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SiteTree {
    /// The authored home document, if any. A placeholder is generated when
    /// absent.
    #[serde(default)]
    pub home: Option<LocalPage>,
    /// All non-home pages, in authoring order.
    #[serde(default)]
    pub pages: Vec<LocalPage>,
    /// Section hierarchy: section name to parent section key.
    #[serde(default)]
    pub sections: HashMap<String, SectionKey>,
}

impl SiteTree {
    /// Pages belonging to one section, preserving input order.
    pub fn pages_in(&self, key: &SectionKey) -> Vec<&LocalPage> {
        self.pages.iter().filter(|p| &p.section == key).collect()
    }

    /// Finds the first duplicated identity key within a single section.
    ///
    /// The level diff assumes deduplicated input; callers reject trees where
    /// this returns `Some` before any remote call.
    pub fn find_duplicate(&self) -> Option<(&str, &SectionKey)> {
        let mut seen: HashSet<(&str, &SectionKey)> = HashSet::new();
        self.pages
            .iter()
            .map(|p| (p.path(), &p.section))
            .find(|entry| !seen.insert(*entry))
    }
}
