//! Merge labeled clusters into ranked themes.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::{
    data::taxonomy::Taxonomy,
    themes::mapper::{ClusterLabel, CATCH_ALL_DESCRIPTION},
};

/// A taxonomy label populated with this run's reviews.
///
/// `theme_id` is the 0-based rank by count within the run. It is recomputed
/// every run, so the same label can carry different ids week to week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Theme {
    pub theme_id: usize,
    pub name: String,
    pub description: String,
    pub count: usize,
    #[serde(skip)]
    pub members: Vec<usize>,
}

/// Group reviews by their cluster's label and rank the groups by size.
///
/// `cluster_of[i]` is the cluster id of review `i`; `labels` is indexed by
/// cluster id. Equal counts keep name order.
pub fn aggregate_themes(
    cluster_of: &[usize],
    labels: &[ClusterLabel],
    taxonomy: &Taxonomy,
) -> Vec<Theme> {
    let mut grouped: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
    for (review_idx, &cluster_id) in cluster_of.iter().enumerate() {
        if let Some(label) = labels.get(cluster_id) {
            grouped
                .entry(label.label.as_str())
                .or_default()
                .push(review_idx);
        }
    }

    let mut themes: Vec<Theme> = grouped
        .into_iter()
        .map(|(name, members)| Theme {
            theme_id: 0,
            name: name.to_string(),
            description: taxonomy
                .get(name)
                .map(|entry| entry.description.clone())
                .unwrap_or_else(|| CATCH_ALL_DESCRIPTION.to_string()),
            count: members.len(),
            members,
        })
        .collect();
    themes.sort_by(|a, b| b.count.cmp(&a.count));
    for (rank, theme) in themes.iter_mut().enumerate() {
        theme.theme_id = rank;
    }
    themes
}

/// Theme index per review, the inverse of `Theme::members`.
pub fn theme_index(themes: &[Theme], review_count: usize) -> Vec<Option<usize>> {
    let mut index = vec![None; review_count];
    for (pos, theme) in themes.iter().enumerate() {
        for &member in &theme.members {
            if let Some(slot) = index.get_mut(member) {
                *slot = Some(pos);
            }
        }
    }
    index
}
