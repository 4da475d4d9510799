//! Numeric core for clustering document vectors.
//!
//! This module owns the dense [`Matrix`] shared with the TF-IDF vectorizer,
//! the K-means clusterer, and the centroid summarizer that maps cluster
//! centroids back to vocabulary terms.
//!
//! # Architecture
//! The clusterer only depends on the matrix shape, never on how rows were
//! produced. The summarizer is the single place where a centroid column is
//! translated back into a term, using the vectorizer's column ordering.

pub mod clustering;
pub mod matrix;
pub mod summary;

// Re-export core types for public API
pub use clustering::{
    ClusteringError, ClusteringResult, FitStatus, KMeansModel, KMeansParams, kmeans_clustering,
    nearest_centroid,
};
pub use matrix::{Matrix, ShapeError, euclidean, l2_norm, squared_euclidean};
pub use summary::top_terms;
