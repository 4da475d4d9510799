//! K-means behavior on TF-IDF matrices built from small review corpora.

use lexicluster::vector::{nearest_centroid, squared_euclidean};
use lexicluster::{
    ClusteringError, KMeansParams, Matrix, TfidfVectorizer, VectorizerParams, kmeans_clustering,
};
use std::collections::HashSet;

const FIVE_DOCUMENTS: [&str; 5] = [
    "pantai indah bersih",
    "pantai cantik sunset",
    "hutan hijau sejuk",
    "hutan pohon tinggi",
    "air terjun jernih dingin",
];

fn unigram_params() -> VectorizerParams {
    VectorizerParams {
        min_df: 1,
        max_df: 1.0,
        ngram_range: (1, 1),
        max_features: 20,
    }
}

fn kmeans_params(n_clusters: usize) -> KMeansParams {
    KMeansParams {
        n_clusters,
        max_iter: 300,
        tolerance: 1e-4,
        seed: 42,
    }
}

fn five_document_matrix() -> Matrix {
    let (fitted, matrix) = TfidfVectorizer::new(unigram_params())
        .fit_transform(&FIVE_DOCUMENTS)
        .unwrap();
    // 14 distinct tokens, all under the 20 feature cap
    assert_eq!(fitted.n_features(), 14);
    matrix
}

#[test]
fn five_documents_form_three_non_empty_clusters() {
    let matrix = five_document_matrix();
    let model = kmeans_clustering(&matrix, &kmeans_params(3)).unwrap();

    assert!(model.iterations() <= 300);
    assert_eq!(model.labels().len(), 5);

    let distinct: HashSet<usize> = model.labels().iter().copied().collect();
    assert_eq!(distinct.len(), 3);
    assert!(model.cluster_sizes().iter().all(|&size| size > 0));
}

#[test]
fn labels_are_nearest_centroids_and_inertia_matches() {
    let matrix = five_document_matrix();
    let model = kmeans_clustering(&matrix, &kmeans_params(3)).unwrap();

    let mut inertia = 0.0;
    for (row, &label) in matrix.rows().zip(model.labels()) {
        let (nearest, distance) = nearest_centroid(row, model.centroids());
        assert_eq!(nearest, label);
        inertia += squared_euclidean(row, model.centroids().row(label));
        assert!((distance - squared_euclidean(row, model.centroids().row(label))).abs() < 1e-12);
    }
    assert!((inertia - model.inertia()).abs() < 1e-9);
}

#[test]
fn fixed_seed_reproduces_the_fit() {
    let matrix = five_document_matrix();
    let first = kmeans_clustering(&matrix, &kmeans_params(3)).unwrap();
    let second = kmeans_clustering(&matrix, &kmeans_params(3)).unwrap();

    assert_eq!(first.centroids(), second.centroids());
    assert_eq!(first.labels(), second.labels());
    assert_eq!(first.iterations(), second.iterations());
    assert_eq!(first.inertia(), second.inertia());
}

#[test]
fn every_seed_fills_every_cluster() {
    let matrix = five_document_matrix();
    for seed in 0..25 {
        let params = KMeansParams {
            seed,
            ..kmeans_params(4)
        };
        let model = kmeans_clustering(&matrix, &params).unwrap();
        assert!(
            model.cluster_sizes().iter().all(|&size| size > 0),
            "seed {seed} left an empty cluster: {:?}",
            model.cluster_sizes()
        );
    }
}

#[test]
fn single_document_corpus() {
    let (fitted, matrix) = TfidfVectorizer::new(unigram_params())
        .fit_transform(&["pantai indah sekali"])
        .unwrap();
    assert_eq!(fitted.n_features(), 3);
    assert_eq!(matrix.n_rows(), 1);
    let norm: f64 = matrix.row(0).iter().map(|v| v * v).sum::<f64>().sqrt();
    assert!((norm - 1.0).abs() < 1e-9);

    let model = kmeans_clustering(&matrix, &kmeans_params(1)).unwrap();
    assert_eq!(model.labels(), &[0]);
    assert!(model.inertia().abs() < 1e-12);
}

#[test]
fn more_clusters_than_rows_degrades() {
    let (_, matrix) = TfidfVectorizer::new(unigram_params())
        .fit_transform(&["pantai indah", "hutan sejuk"])
        .unwrap();

    let model = kmeans_clustering(&matrix, &kmeans_params(5)).unwrap();
    assert_eq!(model.n_clusters(), 5);
    assert_eq!(model.labels().len(), 2);
    assert!(model.labels().iter().all(|&label| label < 5));

    let distinct: HashSet<usize> = model.labels().iter().copied().collect();
    assert_eq!(distinct.len(), 2);
    assert_eq!(model.cluster_sizes().iter().filter(|&&s| s == 0).count(), 3);
}

#[test]
fn invalid_parameters_are_rejected() {
    let matrix = five_document_matrix();
    let result = kmeans_clustering(&matrix, &kmeans_params(0));
    assert!(matches!(
        result,
        Err(ClusteringError::InvalidParameter {
            name: "n_clusters",
            ..
        })
    ));
}
