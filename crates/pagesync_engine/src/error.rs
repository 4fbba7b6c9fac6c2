//! Error types for the reconciliation engine.

use pagesync_model::{CycleError, SectionKey};
use pagesync_store::StoreError;
use thiserror::Error;

/// Result type for engine operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Errors that can occur while publishing or tearing down a site.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The remote home page belongs to a different repository.
    ///
    /// Guards against an unrelated project silently overwriting someone
    /// else's page tree. Surfaced verbatim with both repository ids.
    #[error("page \"{title}\" already exists for another repo \"{theirs}\" (this run publishes \"{ours}\")")]
    RepoConflict {
        /// Title of the contested page.
        title: String,
        /// Repository recorded on the remote page, or `unknown` if it
        /// carries no metadata.
        theirs: String,
        /// Repository of the current run.
        ours: String,
    },

    /// The configured parent page does not exist remotely.
    #[error("the page configured as parent (\"{0}\") does not exist in the remote store")]
    ParentNotFound(String),

    /// The section hierarchy contains a cycle.
    #[error(transparent)]
    CyclicHierarchy(#[from] CycleError),

    /// Two local pages in one section share an identity key.
    #[error("duplicate page path \"{path}\" in section {section}")]
    DuplicatePath {
        /// The duplicated identity key.
        path: String,
        /// The section holding both pages.
        section: SectionKey,
    },

    /// A store call failed. Retry policy, if any, belongs to the store.
    #[error(transparent)]
    Store(#[from] StoreError),
}
