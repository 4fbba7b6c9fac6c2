//! In-memory page store for tests and previews.

use crate::error::{StoreError, StoreResult};
use crate::store::{PageStore, StoredPage};
use pagesync_model::{PageDraft, PageId, RemotePage};
use parking_lot::RwLock;

/// Counts of store calls, observable from tests.
///
/// Convergence is asserted through these: a second identical publishing run
/// must leave `creates`, `updates`, and `deletes` at zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreCounters {
    /// Pages created via `save_page` with no id.
    pub creates: u64,
    /// Pages updated via `save_page` with an id.
    pub updates: u64,
    /// Pages deleted.
    pub deletes: u64,
    /// `get_child_pages` calls with a concrete parent.
    pub child_queries: u64,
    /// `get_child_pages(None)` calls (anchorless-parent contract point).
    pub none_parent_queries: u64,
}

impl StoreCounters {
    /// Total number of mutating calls.
    pub fn mutations(&self) -> u64 {
        self.creates + self.updates + self.deletes
    }
}

#[derive(Debug, Default)]
struct Inner {
    pages: Vec<StoredPage>,
    next_id: PageId,
    counters: StoreCounters,
}

/// An in-memory page store.
///
/// Suitable for unit tests, integration tests, and plan previews. Pages
/// keep their insertion order, which is the order `get_child_pages`
/// returns them in.
///
/// # Thread Safety
///
/// The store is thread-safe and can be shared across threads.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    /// Creates a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a page that was never synced by PageSync (no metadata).
    ///
    /// Useful for testing behavior around manually created wiki pages.
    pub fn insert_unmanaged(
        &self,
        title: impl Into<String>,
        parent: Option<PageId>,
    ) -> PageId {
        let mut inner = self.inner.write();
        inner.next_id += 1;
        let id = inner.next_id;
        inner.pages.push(StoredPage {
            id,
            title: title.into(),
            meta: None,
            parent,
            digest: None,
            section: None,
            body: String::new(),
        });
        id
    }

    /// Returns the current call counters.
    pub fn counters(&self) -> StoreCounters {
        self.inner.read().counters
    }

    /// Resets the call counters, keeping all pages.
    pub fn reset_counters(&self) {
        self.inner.write().counters = StoreCounters::default();
    }

    /// Fetches a page by id.
    pub fn page(&self, id: PageId) -> Option<RemotePage> {
        self.inner
            .read()
            .pages
            .iter()
            .find(|p| p.id == id)
            .map(StoredPage::to_remote)
    }

    /// Returns the stored body of a page.
    pub fn body(&self, id: PageId) -> Option<String> {
        self.inner
            .read()
            .pages
            .iter()
            .find(|p| p.id == id)
            .map(|p| p.body.clone())
    }

    /// Number of pages currently held.
    pub fn len(&self) -> usize {
        self.inner.read().pages.len()
    }

    /// Returns true if the store holds no pages.
    pub fn is_empty(&self) -> bool {
        self.inner.read().pages.is_empty()
    }
}

impl PageStore for MemoryStore {
    fn find_page(&self, title: &str) -> StoreResult<Option<RemotePage>> {
        Ok(self
            .inner
            .read()
            .pages
            .iter()
            .find(|p| p.title == title)
            .map(StoredPage::to_remote))
    }

    fn get_child_pages(&self, parent: Option<PageId>) -> StoreResult<Vec<RemotePage>> {
        let mut inner = self.inner.write();
        match parent {
            None => {
                inner.counters.none_parent_queries += 1;
                Ok(Vec::new())
            }
            Some(pid) => {
                inner.counters.child_queries += 1;
                Ok(inner
                    .pages
                    .iter()
                    .filter(|p| p.parent == Some(pid))
                    .map(StoredPage::to_remote)
                    .collect())
            }
        }
    }

    fn save_page(&self, draft: &PageDraft) -> StoreResult<RemotePage> {
        let mut inner = self.inner.write();
        match draft.id {
            None => {
                inner.next_id += 1;
                let id = inner.next_id;
                let page = StoredPage::from_draft(id, draft);
                let remote = page.to_remote();
                inner.pages.push(page);
                inner.counters.creates += 1;
                Ok(remote)
            }
            Some(id) => {
                inner.counters.updates += 1;
                let page = inner
                    .pages
                    .iter_mut()
                    .find(|p| p.id == id)
                    .ok_or(StoreError::NotFound(id))?;
                page.apply_draft(draft);
                Ok(page.to_remote())
            }
        }
    }

    fn delete_page(&self, id: PageId) -> StoreResult<()> {
        let mut inner = self.inner.write();
        let before = inner.pages.len();
        inner.pages.retain(|p| p.id != id);
        if inner.pages.len() == before {
            return Err(StoreError::NotFound(id));
        }
        inner.counters.deletes += 1;
        Ok(())
    }
}
