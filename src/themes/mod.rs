//! Theme discovery: embed, cluster, label, aggregate, then report.

pub mod aggregate;
pub mod mapper;
pub mod quotes;
pub mod stats;

use serde::Serialize;
use tracing::{info, warn};

use crate::{
    context::RunContext,
    data::reviews::Review,
    error::Result,
    nlp::{
        cluster::{self, ClusterParams},
        embeddings,
        terms::TermExtractor,
    },
};

use self::{
    aggregate::Theme,
    mapper::ClusterLabel,
    quotes::ThemeQuotes,
    stats::RatingDistribution,
};

/// Recoverable conditions surfaced to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RunWarning {
    ClusterCountReduced { requested: usize, effective: usize },
    EmptyTermSet { cluster_id: usize },
}

/// Outcome of theme discovery over one batch.
#[derive(Debug, Clone, Serialize)]
pub struct ThemeRun {
    pub themes: Vec<Theme>,
    pub clusters: Vec<ClusterLabel>,
    pub warnings: Vec<RunWarning>,
    #[serde(skip)]
    review_themes: Vec<Option<usize>>,
}

impl ThemeRun {
    /// Theme holding review `idx`.
    pub fn theme_of(&self, idx: usize) -> Option<&Theme> {
        self.review_themes
            .get(idx)
            .copied()
            .flatten()
            .and_then(|pos| self.themes.get(pos))
    }
}

/// Run embedding, clustering, labeling and aggregation over `reviews`.
pub fn discover_themes(ctx: &RunContext, reviews: &[Review]) -> Result<ThemeRun> {
    let config = ctx.config();
    info!(reviews = reviews.len(), clusters = config.num_clusters, "discovering themes");

    let texts: Vec<String> = reviews.iter().map(|r| r.review_text.clone()).collect();
    let vectors = embeddings::embed_reviews(ctx.embedder(), &texts)?;

    let assignment = cluster::cluster_embeddings(
        &vectors,
        &ClusterParams {
            num_clusters: config.num_clusters,
            restarts: config.restarts,
            seed: config.seed,
        },
    )?;

    let mut warnings = Vec::new();
    if assignment.was_reduced() {
        warnings.push(RunWarning::ClusterCountReduced {
            requested: assignment.requested,
            effective: assignment.effective,
        });
    }

    let extractor = TermExtractor::new(config.max_terms);
    let clusters: Vec<ClusterLabel> = assignment
        .members()
        .iter()
        .enumerate()
        .map(|(cluster_id, members)| {
            let member_texts: Vec<&str> = members.iter().map(|&i| texts[i].as_str()).collect();
            mapper::label_cluster(
                cluster_id,
                &member_texts,
                &extractor,
                ctx.taxonomy(),
                ctx.matcher(),
            )
        })
        .collect();
    warnings.extend(
        clusters
            .iter()
            .filter(|c| c.size > 0 && c.terms.is_empty())
            .map(|c| RunWarning::EmptyTermSet {
                cluster_id: c.cluster_id,
            }),
    );

    let themes = aggregate::aggregate_themes(&assignment.labels, &clusters, ctx.taxonomy());
    let review_themes = aggregate::theme_index(&themes, reviews.len());
    info!(
        themes = themes.len(),
        clusters = clusters.len(),
        warnings = warnings.len(),
        "aggregated themes"
    );
    if !warnings.is_empty() {
        warn!(?warnings, "theme discovery finished with warnings");
    }

    Ok(ThemeRun {
        themes,
        clusters,
        warnings,
        review_themes,
    })
}

/// Ranked theme entry handed to the renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThemeSummary {
    pub theme_id: usize,
    pub theme_name: String,
    pub description: String,
    pub count: usize,
}

/// Volume and rating mix for one top theme.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThemeBreakdown {
    pub theme_id: usize,
    pub theme_name: String,
    pub count: usize,
    pub share_pct: f64,
    pub rating_distribution: RatingDistribution,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Period {
    pub start: String,
    pub end: String,
}

/// Everything the report renderer consumes from a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThemeReport {
    pub app_name: String,
    pub review_count: usize,
    pub period: Option<Period>,
    pub themes: Vec<ThemeSummary>,
    pub quotes: Vec<ThemeQuotes>,
    pub rating_distribution: RatingDistribution,
    pub theme_breakdown: Vec<ThemeBreakdown>,
    pub clusters: Vec<ClusterLabel>,
    pub warnings: Vec<RunWarning>,
}

/// Derive quotes and rating statistics from a finished run.
pub fn build_report(
    ctx: &RunContext,
    app_name: &str,
    reviews: &[Review],
    run: &ThemeRun,
) -> ThemeReport {
    let config = ctx.config();
    let total = reviews.len();

    let period = reviews
        .iter()
        .map(|r| r.date)
        .min()
        .zip(reviews.iter().map(|r| r.date).max())
        .map(|(start, end)| Period {
            start: start.format(crate::data::reviews::DATE_FORMAT).to_string(),
            end: end.format(crate::data::reviews::DATE_FORMAT).to_string(),
        });

    let theme_breakdown = run
        .themes
        .iter()
        .take(config.top_themes)
        .map(|theme| ThemeBreakdown {
            theme_id: theme.theme_id,
            theme_name: theme.name.clone(),
            count: theme.count,
            share_pct: stats::share_of_total(theme.count, total),
            rating_distribution: stats::rating_distribution(
                theme
                    .members
                    .iter()
                    .filter_map(|&idx| reviews.get(idx))
                    .map(|r| r.rating),
            ),
        })
        .collect();

    ThemeReport {
        app_name: app_name.to_string(),
        review_count: total,
        period,
        themes: run
            .themes
            .iter()
            .map(|t| ThemeSummary {
                theme_id: t.theme_id,
                theme_name: t.name.clone(),
                description: t.description.clone(),
                count: t.count,
            })
            .collect(),
        quotes: quotes::select_quotes(
            &run.themes,
            reviews,
            config.top_themes,
            config.quotes_per_theme,
            config.seed,
        ),
        rating_distribution: stats::rating_distribution(reviews.iter().map(|r| r.rating)),
        theme_breakdown,
        clusters: run.clusters.clone(),
        warnings: run.warnings.clone(),
    }
}
