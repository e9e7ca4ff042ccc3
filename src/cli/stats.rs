//! CLI entry-point for rating statistics over a persisted mapping table.

use std::{collections::BTreeMap, path::PathBuf};

use anyhow::Result;
use clap::Args as ClapArgs;
use tracing::{info, instrument};

use crate::{
    config::Settings,
    data::mapping,
    themes::stats::{rating_distribution, share_of_total},
};

/// Args for the `stats` command.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    /// Mapping table to read (defaults to DATA_DIR/processed/reviews_with_themes.csv).
    #[arg(long)]
    pub mapping: Option<PathBuf>,
}

#[instrument(skip(settings))]
pub fn run(args: Args, settings: Settings) -> Result<()> {
    let path = args.mapping.unwrap_or_else(|| settings.mapping_path());
    let rows = mapping::read_mapping_table(&path)?;
    let ratings = || rows.iter().map(|r| r.rating.clamp(0, 5) as u8);
    let global = rating_distribution(ratings());
    info!(rows = rows.len(), "loaded mapping table");

    println!("reviews: {}", rows.len());
    println!("1-2 stars: {}%", global.low);
    println!("3 stars:   {}%", global.mid);
    println!("4-5 stars: {}%", global.high);

    let mut per_theme: BTreeMap<i64, (&str, Vec<u8>)> = BTreeMap::new();
    for row in &rows {
        per_theme
            .entry(row.theme_id)
            .or_insert_with(|| (row.theme_name.as_str(), Vec::new()))
            .1
            .push(row.rating.clamp(0, 5) as u8);
    }
    for (theme_id, (name, ratings)) in per_theme {
        let dist = rating_distribution(ratings.iter().copied());
        println!(
            "{theme_id:>2}  {name:<32} {:>6} ({:.1}%)  low {}% / mid {}% / high {}%",
            ratings.len(),
            share_of_total(ratings.len(), rows.len()),
            dist.low,
            dist.mid,
            dist.high
        );
    }
    Ok(())
}
