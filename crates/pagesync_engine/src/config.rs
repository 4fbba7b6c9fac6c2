//! Configuration for a publishing run.

use pagesync_model::PageId;

/// Configuration for publish and teardown runs.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Title of the site's home page; also the remote lookup key.
    pub site_name: String,
    /// Repository identifier of the publishing project.
    pub repo: String,
    /// Title of an existing remote page to nest the whole tree under.
    pub parent_page: Option<String>,
    /// Base URL for the published-location summary, if known.
    pub base_url: Option<String>,
}

impl SyncConfig {
    /// Creates a new configuration.
    pub fn new(site_name: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            site_name: site_name.into(),
            repo: repo.into(),
            parent_page: None,
            base_url: None,
        }
    }

    /// Nests the published tree under an existing remote page.
    ///
    /// Publishing fails if no remote page carries this title.
    #[must_use]
    pub fn with_parent_page(mut self, title: impl Into<String>) -> Self {
        self.parent_page = Some(title.into());
        self
    }

    /// Sets the base URL used for the published-location summary.
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// The URL the published home page is reachable at, if a base URL is
    /// configured.
    pub fn home_url(&self, home: PageId) -> Option<String> {
        self.base_url
            .as_ref()
            .map(|base| format!("{}/pages/{home}", base.trim_end_matches('/')))
    }
}
