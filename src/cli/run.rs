//! CLI entry-point for a full theme discovery run.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args as ClapArgs;
use tracing::{info, instrument};

use crate::{
    config::Settings,
    context::RunContext,
    data::taxonomy::Taxonomy,
    nlp::embeddings,
    pipeline::{self, RunPaths},
};

/// Args for the `run` command.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    /// Cleaned review CSV (defaults to DATA_DIR/processed/reviews_clean.csv).
    #[arg(long)]
    pub input: Option<PathBuf>,
    /// Taxonomy catalog override.
    #[arg(long)]
    pub taxonomy: Option<PathBuf>,
    /// Override the target cluster count.
    #[arg(long)]
    pub clusters: Option<usize>,
    /// Override the number of k-means restarts.
    #[arg(long)]
    pub restarts: Option<usize>,
    /// Override the seed used by clustering and quote sampling.
    #[arg(long)]
    pub seed: Option<u64>,
}

#[instrument(skip(settings))]
pub fn run(args: Args, settings: Settings) -> Result<()> {
    let mut config = settings.run_config();
    if let Some(clusters) = args.clusters {
        config.num_clusters = clusters;
    }
    if let Some(restarts) = args.restarts {
        config.restarts = restarts;
    }
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    config.validate()?;

    let taxonomy_path = args.taxonomy.unwrap_or_else(|| settings.taxonomy_path.clone());
    let taxonomy = Taxonomy::load(&taxonomy_path)?;
    let ctx = RunContext::new(config, taxonomy, embeddings::default_embedder()?);

    let paths = RunPaths {
        input: args.input.unwrap_or_else(|| settings.clean_reviews_path()),
        mapping: settings.mapping_path(),
        report: settings.report_path(),
    };
    let report = pipeline::run_batch(&ctx, &settings.app_name, &paths)?;

    for theme in &report.themes {
        println!(
            "{:>2}  {:<32} {:>6}",
            theme.theme_id, theme.theme_name, theme.count
        );
    }
    info!(mapping = %paths.mapping.display(), report = %paths.report.display(), "outputs ready");
    Ok(())
}
