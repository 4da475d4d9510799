//! Error types for the review clustering system
//!
//! This module provides structured error types using thiserror for better
//! error handling and actionable error messages. Clustering errors live next
//! to the clusterer in [`crate::vector::ClusteringError`].

use crate::vector::ClusteringError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while fitting the TF-IDF vectorizer
#[derive(Error, Debug, Clone, PartialEq)]
pub enum VectorizeError {
    #[error("Cannot fit a vectorizer on an empty document collection")]
    EmptyCorpus,

    #[error(
        "No terms survived document-frequency filtering for {n_documents} documents (min_df={min_df}, max document count={max_doc_count})"
    )]
    EmptyVocabulary {
        n_documents: usize,
        min_df: usize,
        max_doc_count: usize,
    },

    #[error("Invalid vectorizer parameter {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

/// Main error type for the load → vectorize → cluster → persist pipeline
#[derive(Error, Debug)]
pub enum PipelineError {
    /// File system errors
    #[error("Failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write file '{path}': {source}")]
    FileWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Tabular input/output errors
    #[error("CSV error in '{path}': {source}")]
    Csv { path: PathBuf, source: csv::Error },

    #[error("Column '{column}' not found in '{path}'. Available columns: {available:?}")]
    MissingColumn {
        path: PathBuf,
        column: String,
        available: Vec<String>,
    },

    #[error("Failed to serialize report to '{path}': {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("No reviews to cluster")]
    NoReviews,

    /// Configuration errors
    #[error("Invalid configuration: {reason}")]
    ConfigError { reason: String },

    #[error(transparent)]
    Vectorize(#[from] VectorizeError),

    #[error(transparent)]
    Clustering(#[from] ClusteringError),
}

impl PipelineError {
    /// Get recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            Self::Vectorize(VectorizeError::EmptyVocabulary { .. }) => vec![
                "Lower vectorizer.min_df or raise vectorizer.max_df",
                "Small corpora often need min_df = 1 and max_df = 1.0",
            ],
            Self::MissingColumn { .. } => vec![
                "Set input.subject_column and input.review_column to match the CSV header",
            ],
            Self::NoReviews => vec!["Check that the input CSV has at least one data row"],
            Self::Clustering(ClusteringError::InvalidParameter { .. })
            | Self::Vectorize(VectorizeError::InvalidParameter { .. })
            | Self::ConfigError { .. } => vec![
                "Run 'lexicluster config' to inspect the active settings",
                "Run 'lexicluster init --force' to regenerate a default settings file",
            ],
            Self::FileRead { .. } | Self::Csv { .. } => vec![
                "Check that the file exists and you have read permissions",
                "Ensure the file is UTF-8 encoded CSV with a header row",
            ],
            Self::FileWrite { .. } | Self::Json { .. } => {
                vec!["Check that the output directory is writable"]
            }
            _ => vec![],
        }
    }
}

/// Result type alias for vectorizer operations
pub type VectorizeResult<T> = Result<T, VectorizeError>;

/// Result type alias for pipeline operations
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Helper trait for attaching a path to I/O errors
pub trait ErrorContext<T> {
    /// Wrap a read failure with the offending path
    fn read_context(self, path: &std::path::Path) -> Result<T, PipelineError>;

    /// Wrap a write failure with the offending path
    fn write_context(self, path: &std::path::Path) -> Result<T, PipelineError>;
}

impl<T> ErrorContext<T> for Result<T, std::io::Error> {
    fn read_context(self, path: &std::path::Path) -> Result<T, PipelineError> {
        self.map_err(|source| PipelineError::FileRead {
            path: path.to_path_buf(),
            source,
        })
    }

    fn write_context(self, path: &std::path::Path) -> Result<T, PipelineError> {
        self.map_err(|source| PipelineError::FileWrite {
            path: path.to_path_buf(),
            source,
        })
    }
}
