//! CLI command implementations.

pub mod plan;
pub mod publish;
pub mod unpublish;
