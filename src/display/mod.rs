//! Terminal display utilities for CLI output.
//!
//! Provides styled tables and a shared color theme.

pub mod tables;
pub mod theme;

pub use tables::{TableBuilder, create_cluster_table, create_subject_table, create_summary_table};
pub use theme::{THEME, Theme};
