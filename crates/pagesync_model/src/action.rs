//! Sync actions produced by the level diff.

use crate::page::{LocalPage, RemotePage};

/// One entry of a section's union list.
///
/// The diff pairs local and remote pages explicitly instead of mutating
/// fetched remote objects, so the diff step stays purely functional and the
/// apply step consumes an unambiguous instruction.
#[derive(Debug, Clone, PartialEq)]
pub enum SyncAction<'a> {
    /// A local page with no remote counterpart; create it.
    Create(&'a LocalPage),
    /// A local page bound to its path-equal remote counterpart; update it.
    Update {
        /// The local page driving the update.
        local: &'a LocalPage,
        /// The matched remote page.
        remote: RemotePage,
    },
    /// A remote page with no local counterpart; delete it.
    Delete(RemotePage),
}

impl SyncAction<'_> {
    /// Returns true for local-driven actions (create or update).
    pub fn is_local_driven(&self) -> bool {
        !matches!(self, SyncAction::Delete(_))
    }

    /// The identity key this action concerns, when one is known.
    ///
    /// Deletions of pages never synced by PageSync carry no path.
    pub fn path(&self) -> Option<&str> {
        match self {
            SyncAction::Create(local) => Some(local.path()),
            SyncAction::Update { local, .. } => Some(local.path()),
            SyncAction::Delete(remote) => remote.path(),
        }
    }

    /// The title this action concerns.
    pub fn title(&self) -> &str {
        match self {
            SyncAction::Create(local) => &local.title,
            SyncAction::Update { local, .. } => &local.title,
            SyncAction::Delete(remote) => &remote.title,
        }
    }
}
