//! The publishing engine: home resolution, section traversal, teardown.

use crate::anchors::SectionAnchors;
use crate::config::SyncConfig;
use crate::diff::diff_level;
use crate::error::{SyncError, SyncResult};
use crate::report::{ActionKind, CleanupReport, PlannedAction, PublishReport, SectionPlan};
use pagesync_model::{
    LocalPage, PageDraft, PageId, RemotePage, SectionIndex, SectionKey, SiteTree, SyncAction,
};
use pagesync_store::PageStore;
use std::collections::{HashMap, HashSet};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Publishes a local document tree into a remote page store and keeps the
/// two convergent across runs.
///
/// The publisher owns a [`SyncConfig`] and a store; one instance serves any
/// number of runs. All store calls are blocking and strictly ordered: within
/// a section, actions apply in union-list order, and a child section never
/// starts before its parent section has fully completed.
pub struct Publisher<S: PageStore> {
    config: SyncConfig,
    store: S,
}

impl<S: PageStore> Publisher<S> {
    /// Creates a new publisher.
    pub fn new(config: SyncConfig, store: S) -> Self {
        Self { config, store }
    }

    /// The configuration this publisher runs with.
    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Consumes the publisher, returning the store.
    pub fn into_store(self) -> S {
        self.store
    }

    /// Publishes the site, making the remote tree convergent with `site`.
    ///
    /// # Errors
    ///
    /// Fails fast, before any remote mutation, on duplicate page paths, a
    /// cyclic section hierarchy, a home page owned by another repository, or
    /// a configured parent page that does not exist. Store failures abort
    /// the run; a re-run reconciles from scratch and converges.
    pub fn publish(&self, site: &SiteTree) -> SyncResult<PublishReport> {
        let start = Instant::now();

        let index = self.prepare(site)?;
        for name in index.unreachable() {
            warn!(
                section = name.as_str(),
                "section is not reachable from root and will not be published"
            );
        }

        let outcome = self.resolve_home(site)?;
        let home = outcome.id();
        let mut anchors = SectionAnchors::new(home);
        let mut report = PublishReport {
            home,
            home_url: self.config.home_url(home),
            created: 0,
            updated: 0,
            unchanged: 0,
            deleted: 0,
            duration: start.elapsed(),
        };
        match outcome {
            HomeOutcome::Created(_) => report.created += 1,
            HomeOutcome::Updated(_) => report.updated += 1,
            HomeOutcome::Unchanged(_) => report.unchanged += 1,
        }

        let mut swept = HashSet::new();
        self.sync_section(
            &SectionKey::root(),
            site,
            &index,
            &mut anchors,
            &mut swept,
            &mut report,
        )?;
        report.duration = start.elapsed();

        match &report.home_url {
            Some(url) => info!(
                site = self.config.site_name.as_str(),
                url = url.as_str(),
                created = report.created,
                updated = report.updated,
                deleted = report.deleted,
                "documentation published"
            ),
            None => info!(
                site = self.config.site_name.as_str(),
                created = report.created,
                updated = report.updated,
                deleted = report.deleted,
                "documentation published"
            ),
        }
        Ok(report)
    }

    /// Computes every section's union list without applying it.
    ///
    /// Anchors of sections whose representative does not exist yet resolve
    /// to `None`, so their children are planned against an empty remote
    /// side, exactly what a first real run would see. Unchanged pages are
    /// omitted from the planned actions.
    pub fn plan(&self, site: &SiteTree) -> SyncResult<Vec<SectionPlan>> {
        let index = self.prepare(site)?;

        let mut anchors: HashMap<SectionKey, PageId> = HashMap::new();
        if let Some(remote) = self.store.find_page(&self.config.site_name)? {
            self.check_conflict(&remote)?;
            anchors.insert(SectionKey::root(), remote.id);
        }

        let mut plans = Vec::new();
        let mut swept = HashSet::new();
        self.plan_section(
            &SectionKey::root(),
            site,
            &index,
            &mut anchors,
            &mut swept,
            &mut plans,
        )?;
        Ok(plans)
    }

    /// Deletes the published tree: every child of home, then home itself.
    ///
    /// A missing home page is a no-op outcome, not an error. Any single
    /// deletion failure aborts the remainder.
    pub fn unpublish(&self) -> SyncResult<CleanupReport> {
        let start = Instant::now();
        let site = self.config.site_name.as_str();

        let Some(home) = self.store.find_page(site)? else {
            warn!(site, "no page with this title found, nothing to clean");
            return Ok(CleanupReport {
                home_found: false,
                deleted: 0,
                duration: start.elapsed(),
            });
        };

        let mut deleted = 0u64;
        for child in self.store.get_child_pages(Some(home.id))? {
            self.store.delete_page(child.id)?;
            debug!(id = child.id, title = child.title.as_str(), "deleted page");
            deleted += 1;
        }
        self.store.delete_page(home.id)?;
        debug!(id = home.id, title = home.title.as_str(), "deleted page");
        deleted += 1;

        info!(site, deleted, "cleanup finished");
        Ok(CleanupReport {
            home_found: true,
            deleted,
            duration: start.elapsed(),
        })
    }

    /// Validates the site and builds the section index.
    fn prepare(&self, site: &SiteTree) -> SyncResult<SectionIndex> {
        if let Some((path, section)) = site.find_duplicate() {
            return Err(SyncError::DuplicatePath {
                path: path.to_string(),
                section: section.clone(),
            });
        }
        Ok(SectionIndex::build(&site.sections)?)
    }

    /// Establishes the home page.
    fn resolve_home(&self, site: &SiteTree) -> SyncResult<HomeOutcome> {
        let found = self.store.find_page(&self.config.site_name)?;
        if let Some(remote) = &found {
            self.check_conflict(remote)?;
        }

        let parent = self.find_parent_page()?;
        let mut local = site.home.clone().unwrap_or_else(|| {
            LocalPage::home_placeholder(&self.config.site_name, &self.config.repo)
        });
        // The home page keeps the site name as its title; it is the lookup
        // key for every later run.
        local.title = self.config.site_name.clone();

        let draft = match &found {
            Some(remote) => {
                if is_unchanged(&local, remote, parent) {
                    debug!(id = remote.id, "home page unchanged");
                    return Ok(HomeOutcome::Unchanged(remote.id));
                }
                PageDraft::update(&local, remote, parent)
            }
            None => PageDraft::create(&local, parent),
        };

        let updating = draft.id.is_some();
        let saved = self.store.save_page(&draft)?;
        debug!(id = saved.id, site = self.config.site_name.as_str(), "resolved home page");
        if updating {
            Ok(HomeOutcome::Updated(saved.id))
        } else {
            Ok(HomeOutcome::Created(saved.id))
        }
    }

    /// Fails if the remote page belongs to a different repository.
    fn check_conflict(&self, remote: &RemotePage) -> SyncResult<()> {
        let theirs = remote
            .meta
            .as_ref()
            .map(|m| m.repo.as_str())
            .unwrap_or("unknown");
        if theirs != self.config.repo {
            return Err(SyncError::RepoConflict {
                title: self.config.site_name.clone(),
                theirs: theirs.to_string(),
                ours: self.config.repo.clone(),
            });
        }
        Ok(())
    }

    /// Resolves the configured parent page, if one is set.
    fn find_parent_page(&self) -> SyncResult<Option<PageId>> {
        let Some(title) = &self.config.parent_page else {
            return Ok(None);
        };
        match self.store.find_page(title)? {
            Some(page) => Ok(Some(page.id)),
            None => Err(SyncError::ParentNotFound(title.clone())),
        }
    }

    /// Reconciles one section, then recurses into its child sections.
    ///
    /// Sibling sections share a physical parent, so the fetched children of
    /// one anchor span several sections. Matching is scoped to `key`; the
    /// first section reconciled against an anchor additionally sweeps out
    /// children no section visited this run will claim. A section with no
    /// child sections sweeps under its own anchor too, since nothing else
    /// queries it.
    fn sync_section(
        &self,
        key: &SectionKey,
        site: &SiteTree,
        index: &SectionIndex,
        anchors: &mut SectionAnchors,
        swept: &mut HashSet<Option<PageId>>,
        report: &mut PublishReport,
    ) -> SyncResult<()> {
        let parent_key = if key.is_root() {
            SectionKey::root()
        } else {
            index.parent_of(key)
        };
        let parent = anchors.get(&parent_key);

        let mut remotes = self.store.get_child_pages(parent)?;
        if swept.insert(parent) {
            let mut kept = Vec::with_capacity(remotes.len());
            for remote in remotes {
                if is_claimed(&remote, &parent_key, index) {
                    kept.push(remote);
                } else {
                    self.store.delete_page(remote.id)?;
                    debug!(
                        id = remote.id,
                        title = remote.title.as_str(),
                        "deleted stale page"
                    );
                    report.deleted += 1;
                }
            }
            remotes = kept;
        }
        remotes.retain(|r| r.section.as_ref() == Some(key));

        let locals = site.pages_in(key);
        if !(locals.is_empty() && remotes.is_empty()) {
            let union = diff_level(&locals, remotes);
            let mut first_id = None;
            for (i, action) in union.into_iter().enumerate() {
                let id = self.apply(action, parent, report)?;
                if i == 0 {
                    first_id = id;
                }
            }
            // The first processed entry represents the section for its
            // children; root's anchor is fixed to home and never replaced.
            if let Some(id) = first_id {
                if anchors.record(key, id) {
                    debug!(section = %key, anchor = id, "recorded section anchor");
                }
            }
        }

        let children = index.children_of(key);
        if children.is_empty() {
            // No child section fetches this anchor, so pages left behind by
            // a section that moved elsewhere would otherwise never be seen.
            let anchor = anchors.get(key);
            if anchor.is_some() && swept.insert(anchor) {
                for remote in self.store.get_child_pages(anchor)? {
                    if !is_claimed(&remote, key, index) {
                        self.store.delete_page(remote.id)?;
                        debug!(
                            id = remote.id,
                            title = remote.title.as_str(),
                            "deleted stale page"
                        );
                        report.deleted += 1;
                    }
                }
            }
        }
        for child in children {
            self.sync_section(child, site, index, anchors, swept, report)?;
        }
        Ok(())
    }

    /// Applies one union-list entry, returning the id it produced.
    fn apply(
        &self,
        action: SyncAction<'_>,
        parent: Option<PageId>,
        report: &mut PublishReport,
    ) -> SyncResult<Option<PageId>> {
        match action {
            SyncAction::Create(local) => {
                let saved = self.store.save_page(&PageDraft::create(local, parent))?;
                debug!(id = saved.id, path = local.path(), "created page");
                report.created += 1;
                Ok(Some(saved.id))
            }
            SyncAction::Update { local, remote } => {
                if is_unchanged(local, &remote, parent) {
                    debug!(id = remote.id, path = local.path(), "page unchanged");
                    report.unchanged += 1;
                    return Ok(Some(remote.id));
                }
                let saved = self
                    .store
                    .save_page(&PageDraft::update(local, &remote, parent))?;
                debug!(id = saved.id, path = local.path(), "updated page");
                report.updated += 1;
                Ok(Some(saved.id))
            }
            SyncAction::Delete(remote) => {
                self.store.delete_page(remote.id)?;
                debug!(id = remote.id, title = remote.title.as_str(), "deleted page");
                report.deleted += 1;
                Ok(None)
            }
        }
    }

    /// Plans one section, then recurses into its child sections.
    ///
    /// Mirrors [`Self::sync_section`], including the stale-child sweep,
    /// without mutating the store.
    fn plan_section(
        &self,
        key: &SectionKey,
        site: &SiteTree,
        index: &SectionIndex,
        anchors: &mut HashMap<SectionKey, PageId>,
        swept: &mut HashSet<Option<PageId>>,
        plans: &mut Vec<SectionPlan>,
    ) -> SyncResult<()> {
        let parent_key = if key.is_root() {
            SectionKey::root()
        } else {
            index.parent_of(key)
        };
        let parent = anchors.get(&parent_key).copied();

        let mut remotes = self.store.get_child_pages(parent)?;
        let mut stale = Vec::new();
        if swept.insert(parent) {
            let mut kept = Vec::with_capacity(remotes.len());
            for remote in remotes {
                if is_claimed(&remote, &parent_key, index) {
                    kept.push(remote);
                } else {
                    stale.push(PlannedAction {
                        kind: ActionKind::Delete,
                        title: remote.title.clone(),
                        path: remote.path().map(str::to_string),
                    });
                }
            }
            remotes = kept;
        }
        remotes.retain(|r| r.section.as_ref() == Some(key));

        let locals = site.pages_in(key);
        let union = diff_level(&locals, remotes);

        if let Some(SyncAction::Update { remote, .. }) = union.first() {
            if !key.is_root() {
                anchors.entry(key.clone()).or_insert(remote.id);
            }
        }

        let mut actions = stale;
        actions.extend(union.iter()
            .filter_map(|action| {
                let kind = match action {
                    SyncAction::Create(_) => ActionKind::Create,
                    SyncAction::Update { local, remote } => {
                        if is_unchanged(local, remote, parent) {
                            return None;
                        }
                        ActionKind::Update
                    }
                    SyncAction::Delete(_) => ActionKind::Delete,
                };
                Some(PlannedAction {
                    kind,
                    title: action.title().to_string(),
                    path: action.path().map(str::to_string),
                })
            }));

        let children = index.children_of(key);
        if children.is_empty() {
            let anchor = anchors.get(key).copied();
            if anchor.is_some() && swept.insert(anchor) {
                for remote in self.store.get_child_pages(anchor)? {
                    if !is_claimed(&remote, key, index) {
                        actions.push(PlannedAction {
                            kind: ActionKind::Delete,
                            title: remote.title.clone(),
                            path: remote.path().map(str::to_string),
                        });
                    }
                }
            }
        }

        if !actions.is_empty() {
            plans.push(SectionPlan {
                section: key.clone(),
                actions,
            });
        }

        for child in children {
            self.plan_section(child, site, index, anchors, swept, plans)?;
        }
        Ok(())
    }
}

/// How the home page was resolved.
enum HomeOutcome {
    Created(PageId),
    Updated(PageId),
    Unchanged(PageId),
}

impl HomeOutcome {
    fn id(&self) -> PageId {
        match self {
            Self::Created(id) | Self::Updated(id) | Self::Unchanged(id) => *id,
        }
    }
}

/// True when re-saving the page would change nothing remotely.
fn is_unchanged(local: &LocalPage, remote: &RemotePage, parent: Option<PageId>) -> bool {
    remote.matches_body(local) && remote.parent == parent && remote.title == local.title
}

/// True when some section visited this run will reconcile this child.
///
/// A child is claimed when the section it was published under is still
/// reachable and still parents to the section whose anchor it sits beneath.
/// Unmanaged pages (no recorded section) are never claimed.
fn is_claimed(remote: &RemotePage, parent_key: &SectionKey, index: &SectionIndex) -> bool {
    match &remote.section {
        None => false,
        Some(section) => index.is_reachable(section) && index.parent_of(section) == *parent_key,
    }
}
