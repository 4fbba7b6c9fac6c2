//! The per-section level diff.

use pagesync_model::{LocalPage, RemotePage, SyncAction};

/// Diffs one section's local pages against the remote children fetched for
/// it, producing the section's **union list**.
///
/// The union list is ordered: local-driven actions first, in local input
/// order, then deletions of leftover remote pages in fetched order. The
/// order is load-bearing: the first entry of the list becomes the
/// section's anchor when applied.
///
/// Matching is by identity key (path) only, and each remote page is
/// consumed by at most one match, so it can never also be staged for
/// deletion. Remote pages without metadata can never match and are always
/// staged for deletion.
///
/// Input is assumed deduplicated; callers validate paths upstream.
pub fn diff_level<'a>(locals: &[&'a LocalPage], remotes: Vec<RemotePage>) -> Vec<SyncAction<'a>> {
    let mut slots: Vec<Option<RemotePage>> = remotes.into_iter().map(Some).collect();
    let mut union = Vec::with_capacity(slots.len() + locals.len());

    for local in locals {
        let matched = slots.iter_mut().find_map(|slot| {
            if slot.as_ref().and_then(RemotePage::path) == Some(local.path()) {
                slot.take()
            } else {
                None
            }
        });
        union.push(match matched {
            Some(remote) => SyncAction::Update { local, remote },
            None => SyncAction::Create(local),
        });
    }

    union.extend(slots.into_iter().flatten().map(SyncAction::Delete));
    union
}
