//! Text side of the pipeline: cleaning raw reviews and turning documents
//! into TF-IDF vectors.

pub mod preprocess;
pub mod tfidf;

pub use preprocess::{DEFAULT_STOP_WORDS, Preprocessor};
pub use tfidf::{FittedVectorizer, TfidfVectorizer, VectorizerParams};
