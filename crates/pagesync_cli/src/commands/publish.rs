//! Publish command implementation.

use crate::manifest::SiteManifest;
use pagesync_engine::Publisher;
use pagesync_store::JsonFileStore;
use std::path::Path;

/// Runs the publish command.
pub fn run(manifest: &Path, store: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let (config, site) = SiteManifest::load(manifest)?.into_parts();
    let store = JsonFileStore::open(store)?;

    let publisher = Publisher::new(config, store);
    let report = publisher.publish(&site)?;

    println!("Published \"{}\"", publisher.config().site_name);
    println!(
        "  created: {}, updated: {}, unchanged: {}, deleted: {}",
        report.created, report.updated, report.unchanged, report.deleted
    );
    println!("  took {:?}", report.duration);
    if let Some(url) = &report.home_url {
        println!("  available at {url}");
    }
    Ok(())
}
