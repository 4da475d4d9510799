//! Input/Output handling for the CLI.
//!
//! Tabular and JSON persistence lives in [`crate::pipeline`]; this module
//! maps pipeline failures to process exit codes.

pub mod exit_code;

pub use exit_code::ExitCode;
