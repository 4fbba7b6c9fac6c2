//! Unpublish command implementation.

use crate::manifest::SiteManifest;
use pagesync_engine::Publisher;
use pagesync_store::JsonFileStore;
use std::path::Path;

/// Runs the unpublish command.
pub fn run(manifest: &Path, store: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let (config, _site) = SiteManifest::load(manifest)?.into_parts();
    let store = JsonFileStore::open(store)?;

    let publisher = Publisher::new(config, store);
    let report = publisher.unpublish()?;

    if report.home_found {
        println!(
            "Removed \"{}\" ({} page(s) deleted, took {:?})",
            publisher.config().site_name,
            report.deleted,
            report.duration
        );
    } else {
        println!(
            "No page titled \"{}\" found, nothing to remove",
            publisher.config().site_name
        );
    }
    Ok(())
}
