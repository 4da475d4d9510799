//! Top-term projection of cluster centroids back onto the vocabulary.

use crate::vector::clustering::{ClusteringError, ClusteringResult};
use crate::vector::matrix::Matrix;
use std::collections::BTreeMap;

/// Returns, per cluster index, the `top_n` vocabulary terms with the highest
/// centroid weight.
///
/// Columns are ranked by weight descending; equal weights keep ascending
/// column order. `feature_names` must be in column order, as returned by
/// [`FittedVectorizer::feature_names`](crate::text::FittedVectorizer::feature_names).
pub fn top_terms(
    feature_names: &[String],
    centroids: &Matrix,
    top_n: usize,
) -> ClusteringResult<BTreeMap<usize, Vec<String>>> {
    if centroids.n_cols() != feature_names.len() {
        return Err(ClusteringError::DimensionMismatch {
            expected: feature_names.len(),
            found: centroids.n_cols(),
        });
    }

    Ok(centroids
        .rows()
        .enumerate()
        .map(|(cluster, weights)| {
            let mut columns: Vec<usize> = (0..weights.len()).collect();
            // sort_by is stable, so ties stay in column order
            columns.sort_by(|&a, &b| weights[b].total_cmp(&weights[a]));
            let terms = columns
                .into_iter()
                .take(top_n)
                .map(|col| feature_names[col].clone())
                .collect();
            (cluster, terms)
        })
        .collect())
}
