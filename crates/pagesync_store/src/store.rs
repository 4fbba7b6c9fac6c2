//! Page store trait definition.

use crate::error::StoreResult;
use pagesync_model::{PageDraft, PageId, PageMeta, RemotePage, SectionKey};
use serde::{Deserialize, Serialize};

/// The adapter boundary between the reconciliation engine and a remote
/// hierarchical page store.
///
/// Implementations are **blocking**: each call completes (or fails) before
/// the engine proceeds, which the engine's ordering guarantees rely on.
///
/// # Invariants
///
/// - `save_page` is idempotent at the interface level: a draft without an id
///   creates a page, a draft with an id updates that page in place
/// - `get_child_pages` returns immediate children only, in a stable order
/// - `get_child_pages(None)` returns no children; a `None` parent arises
///   when a section's parent recorded no anchor
/// - Whether `delete_page` cascades to descendants is implementation
///   defined; the engine tolerates both (orphaned descendants are simply
///   never found again and a later run converges without them)
///
/// # Implementors
///
/// - [`crate::MemoryStore`] for tests and previews
/// - [`crate::JsonFileStore`], file-persisted, for CI dry runs
pub trait PageStore: Send + Sync {
    /// Finds a page by its exact title.
    fn find_page(&self, title: &str) -> StoreResult<Option<RemotePage>>;

    /// Lists the immediate children of a page.
    fn get_child_pages(&self, parent: Option<PageId>) -> StoreResult<Vec<RemotePage>>;

    /// Creates the page described by `draft` (no id) or updates it (id set).
    fn save_page(&self, draft: &PageDraft) -> StoreResult<RemotePage>;

    /// Deletes a page by id.
    fn delete_page(&self, id: PageId) -> StoreResult<()>;
}

/// A page as held by the built-in backends.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct StoredPage {
    pub id: PageId,
    pub title: String,
    pub meta: Option<PageMeta>,
    pub parent: Option<PageId>,
    pub digest: Option<String>,
    #[serde(default)]
    pub section: Option<SectionKey>,
    pub body: String,
}

impl StoredPage {
    pub fn from_draft(id: PageId, draft: &PageDraft) -> Self {
        Self {
            id,
            title: draft.title.clone(),
            meta: Some(draft.meta.clone()),
            parent: draft.parent,
            digest: Some(draft.digest.clone()),
            section: Some(draft.section.clone()),
            body: draft.body.clone(),
        }
    }

    pub fn apply_draft(&mut self, draft: &PageDraft) {
        self.title = draft.title.clone();
        self.meta = Some(draft.meta.clone());
        self.parent = draft.parent;
        self.digest = Some(draft.digest.clone());
        self.section = Some(draft.section.clone());
        self.body = draft.body.clone();
    }

    pub fn to_remote(&self) -> RemotePage {
        RemotePage {
            id: self.id,
            title: self.title.clone(),
            meta: self.meta.clone(),
            parent: self.parent,
            digest: self.digest.clone(),
            section: self.section.clone(),
        }
    }
}
