//! Exit codes for CLI operations following Unix conventions.
//!
//! # Exit Code Semantics
//!
//! - `0`: Success - clustering completed and outputs were written
//! - `1`: General error - unspecified failure
//! - `2`: Blocking error - the input cannot be clustered as configured
//! - `3-125`: Specific recoverable errors
//! - `126-255`: Reserved by shell

use crate::error::{PipelineError, VectorizeError};
use crate::vector::ClusteringError;

/// Standard exit codes for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    /// Operation succeeded (code 0)
    Success = 0,

    /// Unspecified error occurred (code 1)
    GeneralError = 1,

    /// The data cannot be clustered with the current settings (code 2)
    BlockingError = 2,

    /// Input had no usable reviews (code 3)
    NoData = 3,

    /// Malformed CSV input (code 4)
    ParseError = 4,

    /// File I/O error (code 5)
    IoError = 5,

    /// Configuration error (code 6)
    ConfigError = 6,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> Self {
        std::process::ExitCode::from(code as u8)
    }
}

impl ExitCode {
    /// Convert a `PipelineError` to the appropriate exit code.
    ///
    /// Maps specific error types to semantic exit codes that scripts
    /// can use to determine appropriate recovery actions.
    pub fn from_error(error: &PipelineError) -> Self {
        match error {
            PipelineError::NoReviews => ExitCode::NoData,

            // Nothing survived filtering: rerunning unchanged cannot help
            PipelineError::Vectorize(VectorizeError::EmptyVocabulary { .. })
            | PipelineError::Vectorize(VectorizeError::EmptyCorpus)
            | PipelineError::Clustering(ClusteringError::EmptyInput) => ExitCode::BlockingError,

            PipelineError::Csv { .. } | PipelineError::MissingColumn { .. } => {
                ExitCode::ParseError
            }
            PipelineError::FileRead { .. }
            | PipelineError::FileWrite { .. }
            | PipelineError::Json { .. } => ExitCode::IoError,

            PipelineError::ConfigError { .. }
            | PipelineError::Vectorize(VectorizeError::InvalidParameter { .. })
            | PipelineError::Clustering(ClusteringError::InvalidParameter { .. }) => {
                ExitCode::ConfigError
            }

            _ => ExitCode::GeneralError,
        }
    }
}
