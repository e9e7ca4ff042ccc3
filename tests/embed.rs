use review_themes::nlp::{
    cluster::{cluster_embeddings, ClusterParams},
    embeddings::{embed_reviews, Embedder, HashingEmbedder},
};

fn params(k: usize, seed: u64) -> ClusterParams {
    ClusterParams {
        num_clusters: k,
        restarts: 10,
        seed,
    }
}

fn texts() -> Vec<String> {
    let groups = [
        "courier delivery delay shipment tracking",
        "refund payment deducted wallet coupon",
        "app crash login freeze checkout",
    ];
    (0..30)
        .map(|i| format!("{} variant{}", groups[i % 3], i))
        .collect()
}

#[test]
fn identical_inputs_give_identical_labels() {
    let embedder = HashingEmbedder::default();
    let vectors = embed_reviews(&embedder, &texts()).unwrap();
    let first = cluster_embeddings(&vectors, &params(3, 42)).unwrap();
    for _ in 0..3 {
        let again = cluster_embeddings(&vectors, &params(3, 42)).unwrap();
        assert_eq!(first, again);
    }
}

#[test]
fn near_duplicates_cluster_together() {
    let embedder = HashingEmbedder::default();
    let vectors = embed_reviews(&embedder, &texts()).unwrap();
    let assignment = cluster_embeddings(&vectors, &params(3, 42)).unwrap();
    for i in 0..27 {
        assert_eq!(assignment.labels[i], assignment.labels[i + 3]);
    }
    assert_ne!(assignment.labels[0], assignment.labels[1]);
    assert_ne!(assignment.labels[1], assignment.labels[2]);
}

#[test]
fn embedding_preserves_order_and_count() {
    let embedder = HashingEmbedder::default();
    let input = texts();
    let vectors = embed_reviews(&embedder, &input).unwrap();
    assert_eq!(vectors.len(), input.len());
    assert!(vectors.iter().all(|v| v.len() == embedder.dimension()));
    assert!(embed_reviews(&embedder, &[]).unwrap().is_empty());
}
