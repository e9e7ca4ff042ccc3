use std::path::Path;

use review_themes::{
    config::RunConfig,
    context::RunContext,
    data::{reviews::Review, taxonomy::Taxonomy},
    nlp::embeddings::HashingEmbedder,
    themes::{
        aggregate::{aggregate_themes, theme_index},
        discover_themes,
        mapper::{ClusterLabel, CATCH_ALL_THEME},
        RunWarning,
    },
};

fn taxonomy() -> Taxonomy {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("config/product_taxonomy.json");
    Taxonomy::load(&path).unwrap()
}

fn label(cluster_id: usize, size: usize, name: &str) -> ClusterLabel {
    ClusterLabel {
        cluster_id,
        size,
        terms: Vec::new(),
        label: name.to_string(),
        score: if name == CATCH_ALL_THEME { 0 } else { 1 },
    }
}

#[test]
fn clusters_sharing_a_label_merge_into_one_theme() {
    let labels = vec![
        label(0, 2, "Delivery & Logistics"),
        label(1, 1, "Payments & Refunds"),
        label(2, 1, "Delivery & Logistics"),
    ];
    let themes = aggregate_themes(&[0, 1, 0, 2], &labels, &taxonomy());

    assert_eq!(themes.len(), 2);
    assert_eq!(themes[0].name, "Delivery & Logistics");
    assert_eq!(themes[0].count, 3);
    assert_eq!(themes[0].members, vec![0, 2, 3]);
    assert_eq!(
        themes[0].description,
        "Late or stuck shipments, tracking gaps, and courier behaviour."
    );
    assert_eq!(themes[1].name, "Payments & Refunds");
    assert_eq!(themes[1].count, 1);
}

#[test]
fn equal_counts_rank_by_name_and_catch_all_gets_default_description() {
    let labels = vec![
        label(0, 2, "Payments & Refunds"),
        label(1, 2, "Delivery & Logistics"),
        label(2, 1, CATCH_ALL_THEME),
    ];
    let themes = aggregate_themes(&[0, 1, 0, 1, 2], &labels, &taxonomy());

    let names: Vec<&str> = themes.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["Delivery & Logistics", "Payments & Refunds", CATCH_ALL_THEME]
    );
    let ids: Vec<usize> = themes.iter().map(|t| t.theme_id).collect();
    assert_eq!(ids, vec![0, 1, 2]);
    assert_eq!(themes[2].description, "Emerging issues or uncategorized feedback.");

    let index = theme_index(&themes, 5);
    assert_eq!(index, vec![Some(1), Some(0), Some(1), Some(0), Some(2)]);
}

#[test]
fn no_reviews_means_no_themes() {
    assert!(aggregate_themes(&[], &[], &taxonomy()).is_empty());
}

#[test]
fn stopword_only_cluster_is_reported_and_lands_in_catch_all() {
    let date = chrono::NaiveDate::from_ymd_opt(2024, 5, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    let texts = [
        "the and of",
        "the and of",
        "the and of",
        "the and of",
        "courier delivery delay",
        "courier delivery delay",
        "courier delivery delay",
        "courier delivery delay",
    ];
    let reviews: Vec<Review> = texts
        .iter()
        .enumerate()
        .map(|(i, text)| Review::new(format!("r{i}"), date, 3, *text))
        .collect();
    let config = RunConfig {
        num_clusters: 2,
        ..RunConfig::default()
    };
    let ctx = RunContext::new(config, taxonomy(), Box::new(HashingEmbedder::default()));

    let run = discover_themes(&ctx, &reviews).unwrap();

    let empty: Vec<&ClusterLabel> = run.clusters.iter().filter(|c| c.terms.is_empty()).collect();
    assert_eq!(empty.len(), 1);
    assert_eq!(empty[0].size, 4);
    assert_eq!(empty[0].label, CATCH_ALL_THEME);
    assert_eq!(
        run.warnings,
        vec![RunWarning::EmptyTermSet {
            cluster_id: empty[0].cluster_id
        }]
    );
    assert_eq!(run.theme_of(0).map(|t| t.name.as_str()), Some(CATCH_ALL_THEME));
    assert_eq!(
        run.theme_of(4).map(|t| t.name.as_str()),
        Some("Delivery & Logistics")
    );
}
