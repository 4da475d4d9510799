//! Properties every fitted TF-IDF vectorizer must hold, checked on a
//! realistic mixed corpus.

use lexicluster::vector::l2_norm;
use lexicluster::{TfidfVectorizer, VectorizeError, VectorizerParams};

fn corpus() -> Vec<&'static str> {
    vec![
        "pantai indah bersih sunset pantai",
        "pantai cantik sunset ombak",
        "hutan hijau sejuk pohon",
        "hutan pohon tinggi sejuk",
        "air terjun jernih dingin",
        "air terjun tinggi sejuk",
        "pantai bersih ramai",
    ]
}

fn params(min_df: usize, max_df: f64, max_features: usize) -> VectorizerParams {
    VectorizerParams {
        min_df,
        max_df,
        ngram_range: (1, 2),
        max_features,
    }
}

#[test]
fn rows_are_unit_norm_or_zero() {
    let (_, matrix) = TfidfVectorizer::new(params(1, 1.0, 100))
        .fit_transform(&corpus())
        .unwrap();

    for row in matrix.rows() {
        let norm = l2_norm(row);
        assert!(
            (norm - 1.0).abs() < 1e-9 || norm == 0.0,
            "row norm {norm} is neither 1 nor 0"
        );
    }
}

#[test]
fn unseen_text_transforms_to_zero_row() {
    let fitted = TfidfVectorizer::new(params(1, 1.0, 100))
        .fit(&corpus())
        .unwrap();

    let matrix = fitted.transform(&["museum sejarah", ""]);
    assert_eq!(matrix.shape(), (2, fitted.n_features()));
    assert!(matrix.as_slice().iter().all(|&v| v == 0.0));
}

#[test]
fn vocabulary_respects_document_frequency_bounds() {
    let docs = corpus();
    let max_df = 0.5;
    let fitted = TfidfVectorizer::new(params(2, max_df, 100))
        .fit(&docs)
        .unwrap();

    let max_count = (max_df * docs.len() as f64).floor() as usize;
    assert!(fitted.n_features() > 0);
    for term in fitted.feature_names() {
        let df = fitted.document_frequency(term).unwrap();
        assert!(
            (2..=max_count).contains(&df),
            "term {term:?} has df {df}, outside [2, {max_count}]"
        );
    }
}

#[test]
fn vocabulary_is_capped_and_sorted() {
    let fitted = TfidfVectorizer::new(params(1, 1.0, 5))
        .fit(&corpus())
        .unwrap();

    assert_eq!(fitted.n_features(), 5);
    let names = fitted.feature_names();
    assert!(names.windows(2).all(|w| w[0] < w[1]));
    for (column, term) in names.iter().enumerate() {
        assert_eq!(fitted.column_of(term), Some(column));
    }
    // The most widespread terms win the cut
    assert!(names.iter().any(|t| t == "pantai"));
    assert!(names.iter().any(|t| t == "sejuk"));
}

#[test]
fn fit_transform_equals_fit_then_transform() {
    let docs = corpus();
    let vectorizer = TfidfVectorizer::new(params(1, 0.9, 50));

    let (fitted_a, matrix_a) = vectorizer.fit_transform(&docs).unwrap();
    let fitted_b = vectorizer.fit(&docs).unwrap();
    let matrix_b = fitted_b.transform(&docs);

    assert_eq!(fitted_a, fitted_b);
    assert_eq!(matrix_a, matrix_b);
}

#[test]
fn over_strict_filtering_is_reported() {
    let result = TfidfVectorizer::new(params(5, 0.2, 50)).fit(&corpus());
    assert!(matches!(
        result,
        Err(VectorizeError::EmptyVocabulary { n_documents: 7, .. })
    ));
}
