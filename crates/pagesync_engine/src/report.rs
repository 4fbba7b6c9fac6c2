//! Run reports.

use pagesync_model::{PageId, SectionKey};
use std::time::Duration;

/// Result of one publishing run.
#[derive(Debug, Clone)]
pub struct PublishReport {
    /// Id of the home page.
    pub home: PageId,
    /// URL the home page is reachable at, if a base URL is configured.
    pub home_url: Option<String>,
    /// Pages created.
    pub created: u64,
    /// Pages updated (content changed).
    pub updated: u64,
    /// Pages left untouched (content unchanged).
    pub unchanged: u64,
    /// Pages deleted.
    pub deleted: u64,
    /// Duration of the run.
    pub duration: Duration,
}

impl PublishReport {
    /// Returns true if the run performed no remote mutations.
    pub fn is_converged(&self) -> bool {
        self.created == 0 && self.updated == 0 && self.deleted == 0
    }
}

/// Result of one teardown run.
#[derive(Debug, Clone)]
pub struct CleanupReport {
    /// Whether a home page existed to tear down.
    pub home_found: bool,
    /// Pages deleted, home included.
    pub deleted: u64,
    /// Duration of the run.
    pub duration: Duration,
}

/// The kind of a planned action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    /// The page would be created.
    Create,
    /// The page would be updated.
    Update,
    /// The page would be deleted.
    Delete,
}

/// One entry of a section's planned union list.
#[derive(Debug, Clone)]
pub struct PlannedAction {
    /// What would happen.
    pub kind: ActionKind,
    /// Title of the page concerned.
    pub title: String,
    /// Identity key, when the page carries one.
    pub path: Option<String>,
}

/// The planned union list for one section.
#[derive(Debug, Clone)]
pub struct SectionPlan {
    /// The section concerned.
    pub section: SectionKey,
    /// Planned actions in union-list order.
    pub actions: Vec<PlannedAction>,
}
