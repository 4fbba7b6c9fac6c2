//! Page identity and payload types.

use crate::section::SectionKey;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Identifier of a remote page.
///
/// Assigned by the store when a page is first created and stable for the
/// lifetime of the page.
pub type PageId = u64;

/// Owner-assigned metadata attached to every page synced by PageSync.
///
/// The `path` field is the **identity key**: a local page and a remote page
/// are considered the same logical page iff their paths are equal. The
/// `repo` field identifies the publishing project and guards the home page
/// against being overwritten by an unrelated project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    /// Repository identifier of the publishing project.
    pub repo: String,
    /// Document path, unique and stable across runs.
    pub path: String,
}

impl PageMeta {
    /// Creates new page metadata.
    pub fn new(repo: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            repo: repo.into(),
            path: path.into(),
        }
    }
}

/// A locally authored document ready for publishing.
///
/// The body is an opaque, pre-rendered payload; PageSync does not interpret
/// it. Parsing and rendering happen upstream of the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalPage {
    /// Page title as it should appear in the remote store.
    pub title: String,
    /// Owner-assigned metadata. `meta.path` is the identity key.
    pub meta: PageMeta,
    /// Section this page belongs to. Root when absent.
    #[serde(default)]
    pub section: SectionKey,
    /// Pre-rendered page body.
    pub body: String,
}

impl LocalPage {
    /// Creates a new local page at root level.
    pub fn new(title: impl Into<String>, meta: PageMeta, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            meta,
            section: SectionKey::root(),
            body: body.into(),
        }
    }

    /// Sets the section this page belongs to.
    #[must_use]
    pub fn in_section(mut self, section: SectionKey) -> Self {
        self.section = section;
        self
    }

    /// Returns the identity key (document path).
    pub fn path(&self) -> &str {
        &self.meta.path
    }

    /// Returns the hex-encoded SHA-256 digest of the body.
    ///
    /// Stored alongside the page remotely so an unchanged page can be
    /// recognized on the next run without re-uploading it.
    pub fn digest(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.body.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    /// Creates a minimal generated home page for a site with no authored
    /// home document.
    pub fn home_placeholder(site_name: &str, repo: &str) -> Self {
        Self::new(
            site_name,
            PageMeta::new(repo, ""),
            format!("<h1>{site_name}</h1>"),
        )
    }
}

/// A page fetched from the remote store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemotePage {
    /// Store-assigned page id.
    pub id: PageId,
    /// Page title.
    pub title: String,
    /// Metadata mirroring a previously-synced local page. Pages that were
    /// never synced by PageSync carry no metadata.
    pub meta: Option<PageMeta>,
    /// Parent page id, if any.
    pub parent: Option<PageId>,
    /// Body digest recorded at the last sync, if any.
    pub digest: Option<String>,
    /// Section the page was synced under, if it was synced by PageSync.
    ///
    /// Sibling sections share a physical parent page, so the fetched
    /// children of one anchor span several sections; this field is what
    /// scopes matching to a single section.
    pub section: Option<SectionKey>,
}

impl RemotePage {
    /// Returns the identity key, if this page was synced by PageSync.
    pub fn path(&self) -> Option<&str> {
        self.meta.as_ref().map(|m| m.path.as_str())
    }

    /// Returns true if this page's recorded digest matches the local body.
    pub fn matches_body(&self, local: &LocalPage) -> bool {
        self.digest.as_deref() == Some(local.digest().as_str())
    }
}

/// Payload for a create-or-update call against the store.
///
/// A draft with no id creates a new page; a draft with an id updates the
/// existing page in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageDraft {
    /// Existing page id for updates, `None` for creates.
    pub id: Option<PageId>,
    /// Page title.
    pub title: String,
    /// Owner-assigned metadata.
    pub meta: PageMeta,
    /// Parent page id, if any.
    pub parent: Option<PageId>,
    /// Section the page belongs to.
    pub section: SectionKey,
    /// Pre-rendered page body.
    pub body: String,
    /// Hex-encoded SHA-256 digest of the body.
    pub digest: String,
}

impl PageDraft {
    /// Builds a create draft from a local page.
    pub fn create(local: &LocalPage, parent: Option<PageId>) -> Self {
        Self {
            id: None,
            title: local.title.clone(),
            meta: local.meta.clone(),
            parent,
            section: local.section.clone(),
            body: local.body.clone(),
            digest: local.digest(),
        }
    }

    /// Builds an update draft from a local page bound to a remote page.
    pub fn update(local: &LocalPage, remote: &RemotePage, parent: Option<PageId>) -> Self {
        Self {
            id: Some(remote.id),
            title: local.title.clone(),
            meta: local.meta.clone(),
            parent,
            section: local.section.clone(),
            body: local.body.clone(),
            digest: local.digest(),
        }
    }
}
