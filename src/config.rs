//! Runtime configuration utilities for review-themes.

use std::{
    env,
    path::{Path, PathBuf},
};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::error::ThemeError;

/// Application configuration resolved from `.env` and defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Product name copied into the report bundle.
    pub app_name: String,
    /// Root folder for cleaned inputs and the mapping table.
    pub data_dir: PathBuf,
    /// Root folder for the report bundle.
    pub outputs_dir: PathBuf,
    /// Location of the taxonomy catalog.
    pub taxonomy_path: PathBuf,
    /// Target number of semantic clusters.
    pub num_clusters: usize,
    /// Number of k-means restarts; the best run is kept.
    pub cluster_restarts: usize,
    /// Seed shared by clustering and quote sampling.
    pub seed: u64,
}

impl Settings {
    /// Load configuration from environment with reasonable defaults.
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let app_name = env::var("APP_NAME").unwrap_or_else(|_| "App".to_string());
        let data_dir = env::var("DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./data"));
        let outputs_dir = env::var("OUTPUTS_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./outputs"));
        let taxonomy_path = env::var("TAXONOMY_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./config/product_taxonomy.json"));
        let defaults = RunConfig::default();
        let num_clusters = parsed_var("THEME_CLUSTERS").unwrap_or(defaults.num_clusters);
        let cluster_restarts = parsed_var("CLUSTER_RESTARTS").unwrap_or(defaults.restarts);
        let seed = parsed_var("THEME_SEED").unwrap_or(defaults.seed);

        std::fs::create_dir_all(&data_dir).context("creating data dir")?;
        std::fs::create_dir_all(&outputs_dir).context("creating outputs dir")?;

        let settings = Self {
            app_name,
            data_dir,
            outputs_dir,
            taxonomy_path,
            num_clusters,
            cluster_restarts,
            seed,
        };
        settings.run_config().validate()?;
        Ok(settings)
    }

    /// Convenience helper for derived path segments.
    pub fn join_data<P: AsRef<Path>>(&self, path: P) -> PathBuf {
        self.data_dir.join(path)
    }

    /// Convenience helper for derived output path segments.
    pub fn join_output<P: AsRef<Path>>(&self, path: P) -> PathBuf {
        self.outputs_dir.join(path)
    }

    /// Cleaned reviews handed over by the cleaning step.
    pub fn clean_reviews_path(&self) -> PathBuf {
        self.join_data("processed/reviews_clean.csv")
    }

    /// Durable review-to-theme mapping table.
    pub fn mapping_path(&self) -> PathBuf {
        self.join_data("processed/reviews_with_themes.csv")
    }

    /// JSON bundle consumed by the report renderer.
    pub fn report_path(&self) -> PathBuf {
        self.join_output("themes.json")
    }

    /// Per-run knobs derived from the loaded settings.
    pub fn run_config(&self) -> RunConfig {
        RunConfig {
            num_clusters: self.num_clusters,
            restarts: self.cluster_restarts,
            seed: self.seed,
            ..RunConfig::default()
        }
    }
}

fn parsed_var<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

/// Knobs that shape a single theme discovery run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Requested cluster count K.
    pub num_clusters: usize,
    /// k-means restarts, keep-best.
    pub restarts: usize,
    /// Seed for every randomised stage.
    pub seed: u64,
    /// Terms extracted per cluster for taxonomy scoring.
    pub max_terms: usize,
    /// Themes that receive quotes and per-theme statistics.
    pub top_themes: usize,
    /// Quotes sampled per top theme.
    pub quotes_per_theme: usize,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            num_clusters: 10,
            restarts: 10,
            seed: 42,
            max_terms: 10,
            top_themes: 5,
            quotes_per_theme: 3,
        }
    }
}

impl RunConfig {
    pub fn validate(&self) -> Result<(), ThemeError> {
        if self.num_clusters == 0 {
            return Err(ThemeError::InvalidConfig(
                "cluster count must be at least 1".into(),
            ));
        }
        if self.restarts == 0 {
            return Err(ThemeError::InvalidConfig(
                "cluster restarts must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
