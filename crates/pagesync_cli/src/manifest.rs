//! The site manifest: the JSON input describing one site.

use pagesync_engine::SyncConfig;
use pagesync_model::{LocalPage, PageMeta, SectionKey, SiteTree};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// One page entry of the manifest.
///
/// The repository identifier lives at the manifest root and is stamped onto
/// every page, so entries carry only their own path, title, and body.
#[derive(Debug, Deserialize)]
pub struct ManifestPage {
    /// Page title.
    pub title: String,
    /// Identity key, unique within the page's section.
    pub path: String,
    /// Section the page belongs to. Root when absent.
    #[serde(default)]
    pub section: SectionKey,
    /// Pre-rendered page body.
    pub body: String,
}

impl ManifestPage {
    fn into_local(self, repo: &str) -> LocalPage {
        LocalPage::new(self.title, PageMeta::new(repo, self.path), self.body)
            .in_section(self.section)
    }
}

/// A site manifest, as deserialized from JSON.
///
/// Produces the [`SyncConfig`] and [`SiteTree`] for one run. Page order in
/// the manifest is reconciliation order.
#[derive(Debug, Deserialize)]
pub struct SiteManifest {
    /// Title of the site's home page.
    pub site_name: String,
    /// Repository identifier of the publishing project.
    pub repo: String,
    /// Title of an existing remote page to nest the tree under.
    #[serde(default)]
    pub parent_page: Option<String>,
    /// Base URL for the published-location summary.
    #[serde(default)]
    pub base_url: Option<String>,
    /// The authored home document, if any.
    #[serde(default)]
    pub home: Option<ManifestPage>,
    /// All non-home pages, in authoring order.
    #[serde(default)]
    pub pages: Vec<ManifestPage>,
    /// Section hierarchy: section name to parent section key.
    #[serde(default)]
    pub sections: HashMap<String, SectionKey>,
}

impl SiteManifest {
    /// Loads a manifest from a JSON file.
    pub fn load(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let raw = fs::read_to_string(path)?;
        let manifest: Self = serde_json::from_str(&raw)?;
        Ok(manifest)
    }

    /// Splits the manifest into run configuration and the local tree.
    pub fn into_parts(self) -> (SyncConfig, SiteTree) {
        let mut config = SyncConfig::new(self.site_name, &self.repo);
        if let Some(title) = self.parent_page {
            config = config.with_parent_page(title);
        }
        if let Some(url) = self.base_url {
            config = config.with_base_url(url);
        }

        let site = SiteTree {
            home: self.home.map(|p| p.into_local(&self.repo)),
            pages: self
                .pages
                .into_iter()
                .map(|p| p.into_local(&self.repo))
                .collect(),
            sections: self.sections,
        };
        (config, site)
    }
}
