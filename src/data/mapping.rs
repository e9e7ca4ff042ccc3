//! Review-to-theme mapping table, the only durable artefact of a run.

use std::path::Path;

use anyhow::{Context, Result};
use polars::prelude::{CsvWriter, DataFrame, NamedFrom, SerWriter, Series};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::StagedFile;
use crate::{data::reviews::Review, themes::ThemeRun};

/// One persisted row per review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingRow {
    pub review_id: String,
    pub date: String,
    pub rating: i64,
    pub review_text: String,
    pub theme_id: i64,
    pub theme_name: String,
}

/// Flatten a run into mapping rows, in input order.
pub fn build_mapping(reviews: &[Review], run: &ThemeRun) -> Vec<MappingRow> {
    reviews
        .iter()
        .enumerate()
        .filter_map(|(idx, review)| {
            let theme = run.theme_of(idx)?;
            Some(MappingRow {
                review_id: review.review_id.clone(),
                date: review.date_text.clone(),
                rating: i64::from(review.rating),
                review_text: review.review_text.clone(),
                theme_id: theme.theme_id as i64,
                theme_name: theme.name.clone(),
            })
        })
        .collect()
}

/// Persist the mapping table as CSV, replacing any previous table atomically.
pub fn write_mapping_table(rows: &[MappingRow], path: &Path) -> Result<()> {
    stage_mapping_table(rows, path)?.commit()?;
    info!(path = %path.display(), rows = rows.len(), "wrote review-to-theme mapping");
    Ok(())
}

/// Write the CSV next to `path`; the previous table stays in place until
/// the returned file is committed.
pub fn stage_mapping_table(rows: &[MappingRow], path: &Path) -> Result<StagedFile> {
    let mut df = DataFrame::new(vec![
        Series::new(
            "review_id".into(),
            rows.iter().map(|r| r.review_id.clone()).collect::<Vec<_>>(),
        ),
        Series::new(
            "date".into(),
            rows.iter().map(|r| r.date.clone()).collect::<Vec<_>>(),
        ),
        Series::new(
            "rating".into(),
            rows.iter().map(|r| r.rating).collect::<Vec<_>>(),
        ),
        Series::new(
            "review_text".into(),
            rows.iter().map(|r| r.review_text.clone()).collect::<Vec<_>>(),
        ),
        Series::new(
            "theme_id".into(),
            rows.iter().map(|r| r.theme_id).collect::<Vec<_>>(),
        ),
        Series::new(
            "theme_name".into(),
            rows.iter().map(|r| r.theme_name.clone()).collect::<Vec<_>>(),
        ),
    ])?;
    super::stage(path, |file| {
        CsvWriter::new(file).finish(&mut df)?;
        Ok(())
    })
}

/// Load a previously persisted mapping table.
pub fn read_mapping_table(path: &Path) -> Result<Vec<MappingRow>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("open mapping table {}", path.display()))?;
    let rows = reader
        .deserialize()
        .collect::<Result<Vec<MappingRow>, _>>()
        .with_context(|| format!("decode mapping table {}", path.display()))?;
    Ok(rows)
}
