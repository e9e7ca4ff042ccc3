//! One complete batch: load cleaned reviews, discover themes, persist outputs.

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::info;

use crate::{
    context::RunContext,
    data::{mapping, report, reviews},
    themes::{self, ThemeReport},
};

/// Input and output locations of a batch run.
#[derive(Debug, Clone)]
pub struct RunPaths {
    pub input: PathBuf,
    pub mapping: PathBuf,
    pub report: PathBuf,
}

/// Execute a run end to end.
///
/// Both outputs are staged before either is renamed into place, so a failed
/// run leaves the previous mapping table and report bundle untouched.
pub fn run_batch(ctx: &RunContext, app_name: &str, paths: &RunPaths) -> Result<ThemeReport> {
    let reviews = reviews::load_reviews(&paths.input)?;
    let run = themes::discover_themes(ctx, &reviews).context("theme discovery failed")?;
    let bundle = themes::build_report(ctx, app_name, &reviews, &run);
    let rows = mapping::build_mapping(&reviews, &run);

    let staged_mapping = mapping::stage_mapping_table(&rows, &paths.mapping)?;
    let staged_report = report::stage_report(&bundle, &paths.report)?;
    staged_mapping.commit()?;
    staged_report.commit()?;
    info!(
        reviews = reviews.len(),
        themes = bundle.themes.len(),
        mapping = %paths.mapping.display(),
        report = %paths.report.display(),
        "theme run complete"
    );
    Ok(bundle)
}
