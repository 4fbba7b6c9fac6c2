//! # PageSync Model
//!
//! Page, section, and sync-action types for PageSync.
//!
//! This crate provides:
//! - Page identity and payload types (`LocalPage`, `RemotePage`, `PageDraft`)
//! - Section keys and the precomputed section hierarchy index
//! - The explicit `SyncAction` pairing produced by the level diff
//! - `SiteTree`, the full local input for one publishing run
//!
//! This is a pure data crate with no I/O.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod action;
mod page;
mod section;
mod site;

pub use action::SyncAction;
pub use page::{LocalPage, PageDraft, PageId, PageMeta, RemotePage};
pub use section::{CycleError, SectionIndex, SectionKey};
pub use site::SiteTree;
