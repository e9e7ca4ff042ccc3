//! CLI entry-point for inspecting the taxonomy catalog.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args as ClapArgs;
use tracing::instrument;

use crate::{config::Settings, data::taxonomy::Taxonomy};

/// Args for the `taxonomy` command.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    /// Catalog to inspect instead of TAXONOMY_PATH.
    #[arg(long)]
    pub taxonomy: Option<PathBuf>,
}

#[instrument(skip(settings))]
pub fn run(args: Args, settings: Settings) -> Result<()> {
    let path = args.taxonomy.unwrap_or(settings.taxonomy_path);
    let taxonomy = Taxonomy::load(&path)?;
    for (position, (name, entry)) in taxonomy.iter().enumerate() {
        println!(
            "{position}. {name} ({} keywords) - {}",
            entry.keywords.len(),
            entry.description
        );
    }
    Ok(())
}
