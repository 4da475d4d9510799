//! K-means clustering over dense document-term rows.
//!
//! This module provides a from-scratch implementation of Lloyd's algorithm
//! with K-means++ seeding. It works on the rows produced by the TF-IDF
//! vectorizer but only depends on the [`Matrix`] shape, not on how the rows
//! were built.
//!
//! # Algorithm Details
//! - Distance metric: Euclidean (squared distances for comparisons)
//! - Initialization: K-means++ driven by a seeded `StdRng`
//! - Convergence: maximum centroid displacement below the tolerance
//! - Empty clusters: reseeded to a uniformly random row of the full dataset
//!
//! # Determinism
//! All randomness comes from one `StdRng::seed_from_u64(seed)` stream, so two
//! fits with the same input and seed produce identical models for a given
//! `rand` release. The parallel assignment step only maps rows to labels and
//! never changes the result.
//!
//! # Performance Characteristics
//! - O(n * k * d * iterations) time complexity
//! - O(k * d) space for centroids, double-buffered per iteration

use crate::vector::matrix::{Matrix, euclidean, squared_euclidean};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that can occur during clustering operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClusteringError {
    #[error(
        "Empty matrix provided for clustering\nSuggestion: Ensure documents are vectorized before clustering"
    )]
    EmptyInput,

    #[error("Invalid parameter {name}: {reason}\nSuggestion: Check the [kmeans] settings")]
    InvalidParameter { name: &'static str, reason: String },

    #[error(
        "Dimension mismatch: expected {expected} columns, found {found}\nSuggestion: Transform documents with the vectorizer the model was trained on"
    )]
    DimensionMismatch { expected: usize, found: usize },
}

/// Result type alias for clustering operations
pub type ClusteringResult<T> = Result<T, ClusteringError>;

/// Inputs to a K-means fit. Every value is explicit; there are no defaults
/// inside the clusterer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KMeansParams {
    /// Number of clusters (k).
    pub n_clusters: usize,
    /// Upper bound on Lloyd iterations.
    pub max_iter: usize,
    /// Stop once no centroid moves farther than this (Euclidean).
    pub tolerance: f64,
    /// Seed for centroid initialization and empty-cluster recovery.
    pub seed: u64,
}

impl KMeansParams {
    fn validate(&self) -> ClusteringResult<()> {
        if self.n_clusters == 0 {
            return Err(ClusteringError::InvalidParameter {
                name: "n_clusters",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.max_iter == 0 {
            return Err(ClusteringError::InvalidParameter {
                name: "max_iter",
                reason: "must be at least 1".to_string(),
            });
        }
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(ClusteringError::InvalidParameter {
                name: "tolerance",
                reason: format!("must be a finite non-negative number, got {}", self.tolerance),
            });
        }
        Ok(())
    }
}

/// How the iteration loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FitStatus {
    /// Maximum centroid displacement fell below the tolerance.
    Converged,
    /// `max_iter` iterations ran without converging.
    MaxIterReached,
}

/// A fitted K-means model.
#[derive(Debug, Clone, PartialEq)]
pub struct KMeansModel {
    centroids: Matrix,
    labels: Vec<usize>,
    inertia: f64,
    iterations: usize,
    status: FitStatus,
}

impl KMeansModel {
    /// Cluster centroids, one row per cluster.
    #[must_use]
    pub fn centroids(&self) -> &Matrix {
        &self.centroids
    }

    /// Final cluster label of each training row, in `[0, n_clusters)`.
    #[must_use]
    pub fn labels(&self) -> &[usize] {
        &self.labels
    }

    /// Sum of squared distances from each training row to its centroid.
    #[must_use]
    pub fn inertia(&self) -> f64 {
        self.inertia
    }

    /// Number of iterations run before stopping.
    #[must_use]
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    #[must_use]
    pub fn status(&self) -> FitStatus {
        self.status
    }

    #[must_use]
    pub fn n_clusters(&self) -> usize {
        self.centroids.n_rows()
    }

    /// Number of training rows in each cluster.
    #[must_use]
    pub fn cluster_sizes(&self) -> Vec<usize> {
        cluster_sizes(&self.labels, self.n_clusters())
    }

    /// Assigns each row of `matrix` to its nearest fitted centroid.
    ///
    /// The row count may differ from the training matrix; the column count
    /// must match the centroid width.
    pub fn predict(&self, matrix: &Matrix) -> ClusteringResult<Vec<usize>> {
        if matrix.n_cols() != self.centroids.n_cols() {
            return Err(ClusteringError::DimensionMismatch {
                expected: self.centroids.n_cols(),
                found: matrix.n_cols(),
            });
        }
        Ok(assign_labels(matrix, &self.centroids))
    }
}

/// Performs K-means clustering on the rows of `matrix`.
///
/// # Algorithm
/// 1. Seed centroids with K-means++
/// 2. Iterate until convergence or `max_iter`:
///    - Assign each row to its nearest centroid (ties go to the lowest index)
///    - Recompute centroids as the mean of their rows, reseeding empty ones
///    - Stop when the largest centroid displacement is below `tolerance`
/// 3. Assign final labels against the last centroids and compute inertia
///
/// When the matrix has fewer rows than `n_clusters` the fit still succeeds,
/// but some clusters necessarily stay empty and the model reports fewer
/// distinct labels than requested.
#[must_use = "clustering results should be used or the computation is wasted"]
pub fn kmeans_clustering(matrix: &Matrix, params: &KMeansParams) -> ClusteringResult<KMeansModel> {
    params.validate()?;
    if matrix.is_empty() {
        return Err(ClusteringError::EmptyInput);
    }

    let k = params.n_clusters;
    if matrix.n_rows() < k {
        warn!(
            rows = matrix.n_rows(),
            n_clusters = k,
            "Fewer rows than clusters; some clusters will stay empty"
        );
    }

    let mut rng = StdRng::seed_from_u64(params.seed);
    let mut centroids = initialize_centroids_kmeans_plus_plus(matrix, k, &mut rng);
    let mut iterations = 0;
    let mut status = FitStatus::MaxIterReached;

    for iteration in 0..params.max_iter {
        // Assignment reads this snapshot only; the update writes a fresh buffer.
        let labels = assign_labels(matrix, &centroids);
        let (updated, reseeded) = update_centroids(matrix, &labels, k, &mut rng);
        if reseeded > 0 {
            debug!(iteration, reseeded, "Reseeded empty clusters");
        }

        let movement = max_centroid_movement(&centroids, &updated);
        centroids = updated;
        iterations = iteration + 1;

        if movement < params.tolerance {
            status = FitStatus::Converged;
            break;
        }
    }

    let mut labels = assign_labels(matrix, &centroids);
    repair_empty_clusters(matrix, &mut centroids, &mut labels);
    let inertia = compute_inertia(matrix, &centroids, &labels);

    match status {
        FitStatus::Converged => info!(iterations, inertia, "K-means converged"),
        FitStatus::MaxIterReached => {
            info!(iterations, inertia, "K-means stopped at max_iter without converging")
        }
    }

    Ok(KMeansModel {
        centroids,
        labels,
        inertia,
        iterations,
        status,
    })
}

/// Returns the index of the nearest centroid and the squared distance to it.
///
/// Ties resolve to the lowest centroid index.
pub fn nearest_centroid(point: &[f64], centroids: &Matrix) -> (usize, f64) {
    let mut best_cluster = 0;
    let mut best_distance = f64::INFINITY;

    for (i, centroid) in centroids.rows().enumerate() {
        let distance = squared_euclidean(point, centroid);
        if distance < best_distance {
            best_distance = distance;
            best_cluster = i;
        }
    }

    (best_cluster, best_distance)
}

/// Labels every row with its nearest centroid. Rows are independent, so
/// this runs on the rayon pool.
fn assign_labels(matrix: &Matrix, centroids: &Matrix) -> Vec<usize> {
    (0..matrix.n_rows())
        .into_par_iter()
        .map(|i| nearest_centroid(matrix.row(i), centroids).0)
        .collect()
}

/// Initializes centroids using the K-means++ algorithm.
///
/// The first centroid is a uniformly random row. Each further centroid is
/// drawn with probability proportional to the squared distance from a row
/// to its nearest chosen centroid, so rows sitting on a chosen centroid are
/// never picked. If every row already coincides with a centroid the draw
/// falls back to a uniform row.
fn initialize_centroids_kmeans_plus_plus(matrix: &Matrix, k: usize, rng: &mut StdRng) -> Matrix {
    let n_rows = matrix.n_rows();
    let mut centroids = Matrix::zeros(k, matrix.n_cols());

    let first_idx = rng.random_range(0..n_rows);
    centroids.row_mut(0).copy_from_slice(matrix.row(first_idx));

    let mut closest: Vec<f64> = (0..n_rows)
        .into_par_iter()
        .map(|i| squared_euclidean(matrix.row(i), centroids.row(0)))
        .collect();

    for c in 1..k {
        let total: f64 = closest.iter().sum();
        let chosen = if total > 0.0 {
            let target = rng.random::<f64>() * total;
            sample_weighted(&closest, target)
        } else {
            debug!(centroid = c, "All rows coincide with chosen centroids, seeding uniformly");
            rng.random_range(0..n_rows)
        };
        centroids.row_mut(c).copy_from_slice(matrix.row(chosen));

        let newest = centroids.row(c);
        closest.par_iter_mut().enumerate().for_each(|(i, best)| {
            let distance = squared_euclidean(matrix.row(i), newest);
            if distance < *best {
                *best = distance;
            }
        });
    }

    centroids
}

/// Walks the cumulative distribution of `weights` and returns the first
/// index whose running total exceeds `target`.
///
/// Zero-weight entries are never returned; if rounding leaves `target` past
/// the end, the last positive entry is used.
fn sample_weighted(weights: &[f64], target: f64) -> usize {
    let mut cumulative = 0.0;
    let mut last_positive = 0;

    for (i, &weight) in weights.iter().enumerate() {
        if weight <= 0.0 {
            continue;
        }
        cumulative += weight;
        last_positive = i;
        if target < cumulative {
            return i;
        }
    }

    last_positive
}

/// Recomputes centroids as the mean of their assigned rows.
///
/// Returns the new centroids and the number of empty clusters that were
/// reseeded to a random row.
fn update_centroids(
    matrix: &Matrix,
    labels: &[usize],
    k: usize,
    rng: &mut StdRng,
) -> (Matrix, usize) {
    let mut new_centroids = Matrix::zeros(k, matrix.n_cols());
    let mut counts = vec![0usize; k];

    for (row, &label) in matrix.rows().zip(labels.iter()) {
        for (sum, &value) in new_centroids.row_mut(label).iter_mut().zip(row.iter()) {
            *sum += value;
        }
        counts[label] += 1;
    }

    let mut reseeded = 0;
    for (cluster, &count) in counts.iter().enumerate() {
        let centroid = new_centroids.row_mut(cluster);
        if count == 0 {
            // Empty cluster: restart from a random row of the whole dataset
            let random_idx = rng.random_range(0..matrix.n_rows());
            centroid.copy_from_slice(matrix.row(random_idx));
            reseeded += 1;
        } else {
            let size = count as f64;
            for value in centroid.iter_mut() {
                *value /= size;
            }
        }
    }

    (new_centroids, reseeded)
}

/// Largest Euclidean displacement of any centroid between two snapshots.
fn max_centroid_movement(old: &Matrix, new: &Matrix) -> f64 {
    old.rows()
        .zip(new.rows())
        .map(|(old_c, new_c)| euclidean(old_c, new_c))
        .fold(0.0, f64::max)
}

/// Gives every empty cluster a member after the final assignment.
///
/// The empty centroid moves onto the row that is farthest from its own
/// centroid among clusters with at least two members, then all rows are
/// reassigned. Each move strictly lowers inertia. With at least
/// `n_clusters` distinct rows a donor always exists; otherwise the
/// remaining clusters stay empty.
fn repair_empty_clusters(matrix: &Matrix, centroids: &mut Matrix, labels: &mut Vec<usize>) {
    let k = centroids.n_rows();

    for _ in 0..=matrix.n_rows() * k {
        let sizes = cluster_sizes(labels, k);
        let Some(empty) = sizes.iter().position(|&size| size == 0) else {
            return;
        };

        let donor = labels
            .iter()
            .enumerate()
            .filter(|&(_, &label)| sizes[label] >= 2)
            .map(|(i, &label)| (i, squared_euclidean(matrix.row(i), centroids.row(label))))
            .filter(|&(_, distance)| distance > 0.0)
            .max_by(|a, b| a.1.total_cmp(&b.1));

        let Some((row, _)) = donor else {
            warn!(
                cluster = empty,
                "Cluster left empty: not enough distinct rows to fill every cluster"
            );
            return;
        };

        debug!(cluster = empty, row, "Moving empty centroid onto farthest row");
        centroids.row_mut(empty).copy_from_slice(matrix.row(row));
        *labels = assign_labels(matrix, centroids);
    }
}

/// Sum of squared distances from each row to its assigned centroid.
///
/// Summed sequentially so the result does not depend on thread scheduling.
fn compute_inertia(matrix: &Matrix, centroids: &Matrix, labels: &[usize]) -> f64 {
    matrix
        .rows()
        .zip(labels.iter())
        .map(|(row, &label)| squared_euclidean(row, centroids.row(label)))
        .sum()
}

fn cluster_sizes(labels: &[usize], k: usize) -> Vec<usize> {
    let mut sizes = vec![0usize; k];
    for &label in labels {
        sizes[label] += 1;
    }
    sizes
}
