//! Command-line interface wiring for review-themes.

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::config::Settings;

pub mod run;
pub mod stats;
pub mod taxonomy;

/// Top-level CLI definition.
#[derive(Debug, Parser)]
#[command(author, version, about = "App review theme discovery", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    /// Parse CLI arguments from the environment.
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    /// Dispatch the selected sub-command.
    pub fn dispatch(self, settings: Settings) -> Result<()> {
        match self.command {
            Commands::Run(args) => run::run(args, settings),
            Commands::Taxonomy(args) => taxonomy::run(args, settings),
            Commands::Stats(args) => stats::run(args, settings),
        }
    }
}

/// Supported sub-commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Cluster cleaned reviews, label themes and persist the mapping table.
    Run(run::Args),
    /// Validate and list the taxonomy catalog.
    Taxonomy(taxonomy::Args),
    /// Summarise ratings from a persisted mapping table.
    Stats(stats::Args),
}
