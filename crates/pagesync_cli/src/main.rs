//! PageSync CLI
//!
//! Command-line interface for publishing a local document tree into a
//! hierarchical page store.
//!
//! # Commands
//!
//! - `plan` - Preview the actions a publish run would perform
//! - `publish` - Publish the site described by a manifest
//! - `unpublish` - Remove the published tree, home page included
//!
//! The site is described by a JSON manifest; the remote store is a JSON
//! file backend, useful for CI dry runs and local testing.

mod commands;
mod manifest;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// PageSync command-line publishing tools.
#[derive(Parser)]
#[command(name = "pagesync")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the site manifest (JSON)
    #[arg(global = true, short, long)]
    manifest: Option<PathBuf>,

    /// Path to the page store file (JSON)
    #[arg(global = true, short, long)]
    store: Option<PathBuf>,

    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Preview the actions a publish run would perform
    Plan,

    /// Publish the site described by the manifest
    Publish,

    /// Remove the published tree, home page included
    Unpublish,

    /// Show version information
    Version,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Commands::Plan => {
            let (manifest, store) = require_paths(cli.manifest, cli.store)?;
            commands::plan::run(&manifest, &store)?;
        }
        Commands::Publish => {
            let (manifest, store) = require_paths(cli.manifest, cli.store)?;
            commands::publish::run(&manifest, &store)?;
        }
        Commands::Unpublish => {
            let (manifest, store) = require_paths(cli.manifest, cli.store)?;
            commands::unpublish::run(&manifest, &store)?;
        }
        Commands::Version => {
            println!("PageSync CLI v{}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}

fn require_paths(
    manifest: Option<PathBuf>,
    store: Option<PathBuf>,
) -> Result<(PathBuf, PathBuf), Box<dyn std::error::Error>> {
    let manifest = manifest.ok_or("Site manifest path required (--manifest)")?;
    let store = store.ok_or("Page store path required (--store)")?;
    Ok((manifest, store))
}
