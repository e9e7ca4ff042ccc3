//! Cleaned review loading.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::ThemeError;

/// Timestamp format for dates this crate renders itself.
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One cleaned review; immutable for the duration of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub review_id: String,
    pub date: NaiveDateTime,
    /// The date exactly as the cleaning step wrote it.
    pub date_text: String,
    pub rating: u8,
    pub review_text: String,
    pub app_id: Option<String>,
}

impl Review {
    pub fn new(
        review_id: impl Into<String>,
        date: NaiveDateTime,
        rating: u8,
        review_text: impl Into<String>,
    ) -> Self {
        Self {
            review_id: review_id.into(),
            date,
            date_text: date.format(DATE_FORMAT).to_string(),
            rating,
            review_text: review_text.into(),
            app_id: None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct CleanRow {
    #[serde(default)]
    review_id: Option<String>,
    date: String,
    rating: f64,
    review_text: String,
    #[serde(default)]
    app_id: Option<String>,
}

/// Load the cleaned review table produced by the cleaning step.
pub fn load_reviews(path: &Path) -> Result<Vec<Review>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("open cleaned reviews {}", path.display()))?;
    let mut reviews = Vec::new();
    for (idx, result) in reader.deserialize().enumerate() {
        let row: CleanRow = result.with_context(|| format!("decode review row {idx}"))?;
        reviews.push(into_review(idx, row)?);
    }
    info!(path = %path.display(), rows = reviews.len(), "loaded cleaned reviews");
    Ok(reviews)
}

fn into_review(idx: usize, row: CleanRow) -> Result<Review, ThemeError> {
    let date = parse_timestamp(&row.date).ok_or_else(|| ThemeError::Input {
        row: idx,
        reason: format!("unparseable date {:?}", row.date),
    })?;
    let review_id = row
        .review_id
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty())
        .unwrap_or_else(|| format!("rev_{idx}"));
    Ok(Review {
        review_id,
        date,
        date_text: row.date.trim().to_string(),
        rating: row.rating.round().clamp(0.0, u8::MAX as f64) as u8,
        review_text: row.review_text,
        app_id: row.app_id.filter(|id| !id.trim().is_empty()),
    })
}

/// Parse the timestamp shapes the cleaning step is known to emit.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_utc());
    }
    for format in [DATE_FORMAT, "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_supported_timestamp_shapes() {
        assert!(parse_timestamp("2024-05-01").is_some());
        assert!(parse_timestamp("2024-05-01 10:20:30").is_some());
        assert!(parse_timestamp("2024-05-01T10:20:30").is_some());
        assert!(parse_timestamp("2024-05-01T10:20:30+05:30").is_some());
        assert!(parse_timestamp("yesterday").is_none());
    }

    #[test]
    fn missing_review_id_is_synthesised_from_row_index() {
        let row = CleanRow {
            review_id: None,
            date: "2024-05-01".into(),
            rating: 4.0,
            review_text: "fine".into(),
            app_id: None,
        };
        let review = into_review(7, row).unwrap();
        assert_eq!(review.review_id, "rev_7");
        assert_eq!(review.rating, 4);
        assert_eq!(review.date_text, "2024-05-01");
    }

    #[test]
    fn offset_timestamps_keep_their_original_text() {
        let row = CleanRow {
            review_id: Some("gp_1".into()),
            date: " 2024-05-01T10:20:30.250+05:30 ".into(),
            rating: 2.0,
            review_text: "late".into(),
            app_id: None,
        };
        let review = into_review(0, row).unwrap();
        assert_eq!(review.date_text, "2024-05-01T10:20:30.250+05:30");
        assert_eq!(review.date.format(DATE_FORMAT).to_string(), "2024-05-01 04:50:30");
    }
}
