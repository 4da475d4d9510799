//! Lexical clustering of tourist location reviews.
//!
//! Reviews are cleaned and grouped per place, turned into TF-IDF vectors,
//! clustered with K-means (K-means++ seeding) and summarized by the dominant
//! terms of each centroid.

pub mod config;
pub mod display;
pub mod error;
pub mod io;
pub mod labeling;
pub mod pipeline;
pub mod text;
pub mod vector;

// Explicit exports for better API clarity
pub use config::Settings;
pub use error::{PipelineError, PipelineResult, VectorizeError, VectorizeResult};
pub use labeling::{SentimentCategory, Theme};
pub use pipeline::{ClusterReport, ClusterSummary, ReviewRecord, SubjectResult};
pub use text::{FittedVectorizer, Preprocessor, TfidfVectorizer, VectorizerParams};
pub use vector::{
    ClusteringError, ClusteringResult, FitStatus, KMeansModel, KMeansParams, Matrix,
    kmeans_clustering, top_terms,
};
