//! Seeded k-means partitioning of review embeddings.

use linfa::{
    traits::{Fit, Predict},
    DatasetBase,
};
use linfa_clustering::KMeans;
use ndarray::{Array1, Array2};
use rand::{rngs::StdRng, SeedableRng};
use serde::Serialize;
use tracing::{info, warn};

use crate::error::{Result, ThemeError};

const MAX_ITERATIONS: u64 = 300;
const TOLERANCE: f64 = 1e-4;

/// Parameters of one clustering pass.
#[derive(Debug, Clone, Copy)]
pub struct ClusterParams {
    pub num_clusters: usize,
    pub restarts: usize,
    pub seed: u64,
}

/// Cluster label per review plus the K that was actually used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClusterAssignment {
    pub labels: Vec<usize>,
    pub requested: usize,
    pub effective: usize,
}

impl ClusterAssignment {
    /// True when fewer vectors than requested clusters forced a smaller K.
    pub fn was_reduced(&self) -> bool {
        self.effective > 0 && self.effective < self.requested
    }

    /// Review indices per cluster id, `0..effective`.
    pub fn members(&self) -> Vec<Vec<usize>> {
        let mut members = vec![Vec::new(); self.effective];
        for (idx, &label) in self.labels.iter().enumerate() {
            members[label].push(idx);
        }
        members
    }
}

/// Partition `embeddings` into `params.num_clusters` groups.
///
/// Identical vectors, K and seed always give identical labels. With fewer
/// vectors than clusters, K shrinks to the vector count.
pub fn cluster_embeddings(
    embeddings: &[Vec<f32>],
    params: &ClusterParams,
) -> Result<ClusterAssignment> {
    if params.num_clusters == 0 || params.restarts == 0 {
        return Err(ThemeError::InvalidConfig(
            "clustering needs at least one cluster and one restart".into(),
        ));
    }
    let n = embeddings.len();
    if n == 0 {
        return Ok(ClusterAssignment {
            labels: Vec::new(),
            requested: params.num_clusters,
            effective: 0,
        });
    }

    let effective = params.num_clusters.min(n);
    if effective < params.num_clusters {
        warn!(
            requested = params.num_clusters,
            effective,
            reviews = n,
            "fewer reviews than clusters; reducing cluster count"
        );
    }

    let records = to_matrix(embeddings)?;
    let labels = if effective == 1 {
        vec![0; n]
    } else {
        let dataset = DatasetBase::from(records.clone());
        let rng = StdRng::seed_from_u64(params.seed);
        let model = KMeans::params_with_rng(effective, rng)
            .n_runs(params.restarts)
            .max_n_iterations(MAX_ITERATIONS)
            .tolerance(TOLERANCE)
            .fit(&dataset)
            .map_err(|err| ThemeError::Clustering(err.to_string()))?;
        let predicted: Array1<usize> = model.predict(&records);
        predicted.to_vec()
    };

    info!(reviews = n, clusters = effective, "clustered review embeddings");
    Ok(ClusterAssignment {
        labels,
        requested: params.num_clusters,
        effective,
    })
}

fn to_matrix(embeddings: &[Vec<f32>]) -> Result<Array2<f64>> {
    let dim = embeddings[0].len();
    if let Some(bad) = embeddings.iter().find(|v| v.len() != dim) {
        return Err(ThemeError::EmbeddingShape {
            expected: dim,
            actual: bad.len(),
        });
    }
    let flat: Vec<f64> = embeddings
        .iter()
        .flat_map(|v| v.iter().map(|&x| f64::from(x)))
        .collect();
    Array2::from_shape_vec((embeddings.len(), dim), flat)
        .map_err(|err| ThemeError::Clustering(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(k: usize) -> ClusterParams {
        ClusterParams {
            num_clusters: k,
            restarts: 3,
            seed: 42,
        }
    }

    #[test]
    fn empty_input_gives_empty_assignment() {
        let assignment = cluster_embeddings(&[], &params(10)).unwrap();
        assert!(assignment.labels.is_empty());
        assert_eq!(assignment.effective, 0);
        assert!(!assignment.was_reduced());
    }

    #[test]
    fn undersized_input_shrinks_k() {
        let vectors = vec![vec![0.0, 1.0], vec![1.0, 0.0], vec![5.0, 5.0]];
        let assignment = cluster_embeddings(&vectors, &params(10)).unwrap();
        assert_eq!(assignment.effective, 3);
        assert!(assignment.was_reduced());
        assert!(assignment.labels.iter().all(|&l| l < 3));
    }

    #[test]
    fn ragged_vectors_are_rejected() {
        let vectors = vec![vec![0.0, 1.0], vec![1.0]];
        assert!(matches!(
            cluster_embeddings(&vectors, &params(2)),
            Err(ThemeError::EmbeddingShape { .. })
        ));
    }

    #[test]
    fn members_partition_every_review() {
        let assignment = ClusterAssignment {
            labels: vec![1, 0, 1, 2],
            requested: 3,
            effective: 3,
        };
        assert_eq!(assignment.members(), vec![vec![1], vec![0, 2], vec![3]]);
    }
}
