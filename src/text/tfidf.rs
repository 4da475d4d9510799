//! TF-IDF vectorizer with n-gram terms and document-frequency filtering.
//!
//! Fitting builds an immutable [`FittedVectorizer`]: a vocabulary of terms
//! (tokens or space-joined token n-grams) mapped to dense column indices in
//! lexicographic order, plus one smoothed IDF weight per column. Transforming
//! turns documents into L2-normalized TF-IDF rows of a [`Matrix`].
//!
//! Documents are expected to be cleaned already; tokenization is plain
//! whitespace splitting.
//!
//! # Weighting
//! - `tf(t, d) = count(t, d) / terms(d)`
//! - `idf(t) = ln((N + 1) / (df(t) + 1)) + 1`
//! - rows are divided by their Euclidean norm unless it is zero

use crate::error::{VectorizeError, VectorizeResult};
use crate::vector::matrix::{Matrix, normalize_in_place};
use rayon::prelude::*;
use std::collections::{HashMap, HashSet};
use tracing::{debug, info};

/// Fitting parameters. All four values are explicit inputs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VectorizerParams {
    /// Minimum number of documents a term must appear in.
    pub min_df: usize,
    /// Maximum fraction of documents a term may appear in, in `(0, 1]`.
    pub max_df: f64,
    /// Inclusive `(min_n, max_n)` n-gram lengths.
    pub ngram_range: (usize, usize),
    /// Upper bound on vocabulary size.
    pub max_features: usize,
}

impl VectorizerParams {
    fn validate(&self) -> VectorizeResult<()> {
        if self.min_df == 0 {
            return Err(VectorizeError::InvalidParameter {
                name: "min_df",
                reason: "must be at least 1".to_string(),
            });
        }
        if !(self.max_df > 0.0 && self.max_df <= 1.0) {
            return Err(VectorizeError::InvalidParameter {
                name: "max_df",
                reason: format!("must be in (0, 1], got {}", self.max_df),
            });
        }
        let (min_n, max_n) = self.ngram_range;
        if min_n == 0 || min_n > max_n {
            return Err(VectorizeError::InvalidParameter {
                name: "ngram_range",
                reason: format!("need 1 <= min_n <= max_n, got ({min_n}, {max_n})"),
            });
        }
        if self.max_features == 0 {
            return Err(VectorizeError::InvalidParameter {
                name: "max_features",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// Extracts every contiguous n-gram for each length in the range.
    ///
    /// Terms of length `n` are the space-joined windows of `n` consecutive
    /// whitespace tokens, emitted shortest length first.
    pub fn extract_terms(&self, text: &str) -> Vec<String> {
        let tokens: Vec<&str> = text.split_whitespace().collect();
        let (min_n, max_n) = self.ngram_range;
        let mut terms = Vec::new();

        for n in min_n..=max_n {
            if n > tokens.len() {
                break;
            }
            terms.extend(tokens.windows(n).map(|window| window.join(" ")));
        }

        terms
    }

    /// Largest document frequency a term may have for `n_documents`.
    fn max_doc_count(&self, n_documents: usize) -> usize {
        (self.max_df * n_documents as f64).floor() as usize
    }
}

/// Unfitted TF-IDF vectorizer.
#[derive(Debug, Clone)]
pub struct TfidfVectorizer {
    params: VectorizerParams,
}

impl TfidfVectorizer {
    #[must_use]
    pub fn new(params: VectorizerParams) -> Self {
        Self { params }
    }

    #[must_use]
    pub fn params(&self) -> &VectorizerParams {
        &self.params
    }

    /// Learns the vocabulary and IDF weights from `documents`.
    ///
    /// Fails with [`VectorizeError::EmptyVocabulary`] when no term survives
    /// the `min_df` / `max_df` / `max_features` selection.
    pub fn fit<S: AsRef<str> + Sync>(&self, documents: &[S]) -> VectorizeResult<FittedVectorizer> {
        self.params.validate()?;
        if documents.is_empty() {
            return Err(VectorizeError::EmptyCorpus);
        }

        let n_documents = documents.len();
        let doc_freq = self.document_frequency(documents);

        let min_df = self.params.min_df;
        let max_doc_count = self.params.max_doc_count(n_documents);
        let mut selected: Vec<(String, usize)> = doc_freq
            .into_iter()
            .filter(|&(_, df)| df >= min_df && df <= max_doc_count)
            .collect();

        if selected.len() > self.params.max_features {
            // Most widespread terms first; ties broken by term so the cut is reproducible
            selected.sort_by(|(a_term, a_df), (b_term, b_df)| {
                b_df.cmp(a_df).then_with(|| a_term.cmp(b_term))
            });
            selected.truncate(self.params.max_features);
        }

        if selected.is_empty() {
            return Err(VectorizeError::EmptyVocabulary {
                n_documents,
                min_df,
                max_doc_count,
            });
        }

        selected.sort_by(|(a, _), (b, _)| a.cmp(b));

        let n_docs = n_documents as f64;
        let idf: Vec<f64> = selected
            .iter()
            .map(|&(_, df)| ((n_docs + 1.0) / (df as f64 + 1.0)).ln() + 1.0)
            .collect();
        let document_frequency: Vec<usize> = selected.iter().map(|&(_, df)| df).collect();
        let feature_names: Vec<String> = selected.into_iter().map(|(term, _)| term).collect();
        let vocabulary: HashMap<String, usize> = feature_names
            .iter()
            .enumerate()
            .map(|(idx, term)| (term.clone(), idx))
            .collect();

        info!(
            documents = n_documents,
            features = feature_names.len(),
            "Fitted TF-IDF vocabulary"
        );

        Ok(FittedVectorizer {
            params: self.params,
            vocabulary,
            feature_names,
            idf,
            document_frequency,
        })
    }

    /// Fits on `documents` and transforms the same documents.
    pub fn fit_transform<S: AsRef<str> + Sync>(
        &self,
        documents: &[S],
    ) -> VectorizeResult<(FittedVectorizer, Matrix)> {
        let fitted = self.fit(documents)?;
        let matrix = fitted.transform(documents);
        Ok((fitted, matrix))
    }

    /// Counts, for every term, how many documents contain it at least once.
    fn document_frequency<S: AsRef<str> + Sync>(&self, documents: &[S]) -> HashMap<String, usize> {
        let per_document: Vec<HashSet<String>> = documents
            .par_iter()
            .map(|doc| self.params.extract_terms(doc.as_ref()).into_iter().collect())
            .collect();

        let mut doc_freq: HashMap<String, usize> = HashMap::new();
        for terms in per_document {
            for term in terms {
                *doc_freq.entry(term).or_insert(0) += 1;
            }
        }
        doc_freq
    }
}

/// Vocabulary and IDF weights learned by [`TfidfVectorizer::fit`].
///
/// Immutable once built; it can transform any number of new documents.
#[derive(Debug, Clone, PartialEq)]
pub struct FittedVectorizer {
    params: VectorizerParams,
    vocabulary: HashMap<String, usize>,
    feature_names: Vec<String>,
    idf: Vec<f64>,
    document_frequency: Vec<usize>,
}

impl FittedVectorizer {
    /// Converts documents into L2-normalized TF-IDF rows.
    ///
    /// Terms outside the vocabulary are ignored. A document with no
    /// vocabulary terms yields an all-zero row.
    pub fn transform<S: AsRef<str> + Sync>(&self, documents: &[S]) -> Matrix {
        let n_features = self.n_features();
        let mut matrix = Matrix::zeros(documents.len(), n_features);

        // The vocabulary is never empty, so rows have non-zero width.
        let degenerate = matrix
            .as_mut_slice()
            .par_chunks_mut(n_features)
            .zip(documents.par_iter())
            .map(|(row, doc)| self.fill_row(doc.as_ref(), row))
            .filter(|filled| !filled)
            .count();

        if degenerate > 0 {
            debug!(
                degenerate,
                documents = documents.len(),
                "Documents without vocabulary terms left as zero rows"
            );
        }

        matrix
    }

    /// Writes the TF-IDF weights of `text` into `row` and normalizes it.
    ///
    /// Returns `false` when the row stays all zero.
    fn fill_row(&self, text: &str, row: &mut [f64]) -> bool {
        let terms = self.params.extract_terms(text);
        if terms.is_empty() {
            return false;
        }

        let total = terms.len() as f64;
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for term in &terms {
            *counts.entry(term.as_str()).or_insert(0) += 1;
        }

        for (term, count) in counts {
            if let Some(&col) = self.vocabulary.get(term) {
                row[col] = (count as f64 / total) * self.idf[col];
            }
        }

        normalize_in_place(row)
    }

    /// Term to column index.
    #[must_use]
    pub fn vocabulary(&self) -> &HashMap<String, usize> {
        &self.vocabulary
    }

    /// Terms in column order.
    #[must_use]
    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    /// IDF weight per column.
    #[must_use]
    pub fn idf(&self) -> &[f64] {
        &self.idf
    }

    /// Column index of `term`, if it is in the vocabulary.
    #[must_use]
    pub fn column_of(&self, term: &str) -> Option<usize> {
        self.vocabulary.get(term).copied()
    }

    /// Document frequency observed during fitting for a retained term.
    #[must_use]
    pub fn document_frequency(&self, term: &str) -> Option<usize> {
        self.column_of(term).map(|col| self.document_frequency[col])
    }

    #[must_use]
    pub fn n_features(&self) -> usize {
        self.feature_names.len()
    }

    #[must_use]
    pub fn params(&self) -> &VectorizerParams {
        &self.params
    }
}
