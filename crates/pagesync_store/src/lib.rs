//! # PageSync Store
//!
//! Page store adapter trait and built-in backends for PageSync.
//!
//! This crate provides:
//! - [`PageStore`], the blocking adapter boundary the reconciliation engine
//!   drives (find by title, list children, create-or-update, delete)
//! - [`MemoryStore`], an in-memory backend with call counters
//! - [`JsonFileStore`], a file-persisted backend for CI dry runs
//!
//! Real remote transports implement [`PageStore`] outside this workspace;
//! the engine is agnostic to how calls reach the remote system.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod json;
mod memory;
mod store;

pub use error::{StoreError, StoreResult};
pub use json::JsonFileStore;
pub use memory::{MemoryStore, StoreCounters};
pub use store::PageStore;
