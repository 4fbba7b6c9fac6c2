//! # PageSync Engine
//!
//! Tree reconciliation engine for PageSync.
//!
//! This crate provides:
//! - Home page resolution with an identity-conflict guard
//! - The per-section level diff (union lists of create/update/delete)
//! - The section anchor table (one representative page per section)
//! - Depth-first section traversal, parent before child
//! - Teardown (children before home) and plan previews
//!
//! ## Architecture
//!
//! A run walks the section hierarchy top-down. For each section it fetches
//! the remote children of the section's resolved parent, diffs them against
//! the section's local pages by identity key (path), and applies the
//! resulting union list strictly in order. The first processed entry of a
//! section becomes the section's **anchor**: the page its child sections
//! resolve their parent id against.
//!
//! ## Key Invariants
//!
//! - Matching is per section; a remote page is consumed by at most one match
//! - A section's parent is fully processed before the section starts
//! - Anchors are insert-once; root's anchor is the home page, immutably
//! - A second identical run performs no remote mutations

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod anchors;
mod config;
mod diff;
mod error;
mod publisher;
mod report;

pub use anchors::SectionAnchors;
pub use config::SyncConfig;
pub use diff::diff_level;
pub use error::{SyncError, SyncResult};
pub use publisher::Publisher;
pub use report::{ActionKind, CleanupReport, PlannedAction, PublishReport, SectionPlan};
