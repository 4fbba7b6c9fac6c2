//! File-persisted page store.

use crate::error::StoreResult;
use crate::store::{PageStore, StoredPage};
use crate::StoreError;
use pagesync_model::{PageDraft, PageId, RemotePage};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Default, Serialize, Deserialize)]
struct State {
    next_id: PageId,
    pages: Vec<StoredPage>,
}

/// A page store persisted to a single JSON file.
///
/// Every mutation rewrites the file, so the store survives process
/// restarts. This backend exists for CI dry runs and local previews; a real
/// deployment implements [`PageStore`] against the remote system's client.
///
/// # Thread Safety
///
/// The store is thread-safe; internal locking serializes file rewrites.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    state: RwLock<State>,
}

impl JsonFileStore {
    /// Opens a store at the given path, loading existing state if present.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let path = path.into();
        let state = if path.exists() {
            serde_json::from_slice(&fs::read(&path)?)?
        } else {
            State::default()
        };
        Ok(Self {
            path: path.clone(),
            state: RwLock::new(state),
        })
    }

    /// The file backing this store.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of pages currently held.
    pub fn len(&self) -> usize {
        self.state.read().pages.len()
    }

    /// Returns true if the store holds no pages.
    pub fn is_empty(&self) -> bool {
        self.state.read().pages.is_empty()
    }

    fn persist(&self, state: &State) -> StoreResult<()> {
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() && !dir.exists() {
                fs::create_dir_all(dir)?;
            }
        }
        fs::write(&self.path, serde_json::to_vec_pretty(state)?)?;
        Ok(())
    }
}

impl PageStore for JsonFileStore {
    fn find_page(&self, title: &str) -> StoreResult<Option<RemotePage>> {
        Ok(self
            .state
            .read()
            .pages
            .iter()
            .find(|p| p.title == title)
            .map(StoredPage::to_remote))
    }

    fn get_child_pages(&self, parent: Option<PageId>) -> StoreResult<Vec<RemotePage>> {
        let Some(pid) = parent else {
            return Ok(Vec::new());
        };
        Ok(self
            .state
            .read()
            .pages
            .iter()
            .filter(|p| p.parent == Some(pid))
            .map(StoredPage::to_remote)
            .collect())
    }

    fn save_page(&self, draft: &PageDraft) -> StoreResult<RemotePage> {
        let mut state = self.state.write();
        let remote = match draft.id {
            None => {
                state.next_id += 1;
                let page = StoredPage::from_draft(state.next_id, draft);
                let remote = page.to_remote();
                state.pages.push(page);
                remote
            }
            Some(id) => {
                let page = state
                    .pages
                    .iter_mut()
                    .find(|p| p.id == id)
                    .ok_or(StoreError::NotFound(id))?;
                page.apply_draft(draft);
                page.to_remote()
            }
        };
        self.persist(&state)?;
        Ok(remote)
    }

    fn delete_page(&self, id: PageId) -> StoreResult<()> {
        let mut state = self.state.write();
        let before = state.pages.len();
        state.pages.retain(|p| p.id != id);
        if state.pages.len() == before {
            return Err(StoreError::NotFound(id));
        }
        self.persist(&state)?;
        Ok(())
    }
}
