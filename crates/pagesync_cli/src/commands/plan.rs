//! Plan command implementation.

use crate::manifest::SiteManifest;
use pagesync_engine::{ActionKind, Publisher};
use pagesync_store::JsonFileStore;
use std::path::Path;

/// Runs the plan command.
pub fn run(manifest: &Path, store: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let (config, site) = SiteManifest::load(manifest)?.into_parts();
    let store = JsonFileStore::open(store)?;

    let publisher = Publisher::new(config, store);
    let plans = publisher.plan(&site)?;

    if plans.is_empty() {
        println!("Nothing to do");
        return Ok(());
    }

    for plan in &plans {
        println!("section {}", plan.section);
        for action in &plan.actions {
            let marker = match action.kind {
                ActionKind::Create => '+',
                ActionKind::Update => '~',
                ActionKind::Delete => '-',
            };
            match &action.path {
                Some(path) => println!("  {marker} {} ({path})", action.title),
                None => println!("  {marker} {}", action.title),
            }
        }
    }

    let total: usize = plans.iter().map(|p| p.actions.len()).sum();
    println!();
    println!("{total} pending action(s)");
    Ok(())
}
