//! Configuration module for the review clustering pipeline.
//!
//! This module provides a layered configuration system that supports:
//! - Default values
//! - TOML configuration file
//! - Environment variable overrides
//! - CLI argument overrides
//!
//! # Environment Variables
//!
//! Environment variables must be prefixed with `LEXICLUSTER_` and use double underscores
//! to separate nested levels:
//! - `LEXICLUSTER_KMEANS__N_CLUSTERS=4` sets `kmeans.n_clusters`
//! - `LEXICLUSTER_VECTORIZER__MIN_DF=1` sets `vectorizer.min_df`
//! - `LEXICLUSTER_PARALLEL_THREADS=8` sets `parallel_threads`

use crate::text::VectorizerParams;
use crate::vector::KMeansParams;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const CONFIG_DIR: &str = ".lexicluster";
const CONFIG_FILE: &str = "settings.toml";

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Settings {
    /// Version of the configuration schema
    #[serde(default = "default_version")]
    pub version: u32,

    /// Workspace root directory (where .lexicluster is located)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workspace_root: Option<PathBuf>,

    /// Global debug mode
    #[serde(default = "default_false")]
    pub debug: bool,

    /// Number of worker threads for vectorizing and cluster assignment
    #[serde(default = "default_parallel_threads")]
    pub parallel_threads: usize,

    /// Input CSV layout
    #[serde(default)]
    pub input: InputConfig,

    /// Review cleaning
    #[serde(default)]
    pub preprocess: PreprocessConfig,

    /// TF-IDF settings
    #[serde(default)]
    pub vectorizer: VectorizerConfig,

    /// K-means settings
    #[serde(default)]
    pub kmeans: KMeansConfig,

    /// Cluster and subject summaries
    #[serde(default)]
    pub summary: SummaryConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct InputConfig {
    /// Column naming the reviewed place
    #[serde(default = "default_subject_column")]
    pub subject_column: String,

    /// Column holding the review text
    #[serde(default = "default_review_column")]
    pub review_column: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct PreprocessConfig {
    /// Clean reviews before vectorizing
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Tokens shorter than this are dropped
    #[serde(default = "default_min_token_len")]
    pub min_token_len: usize,

    /// Stop words added to the built-in Indonesian list
    #[serde(default)]
    pub extra_stop_words: Vec<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct VectorizerConfig {
    #[serde(default = "default_min_df")]
    pub min_df: usize,

    /// Fraction of documents above which a term is dropped
    #[serde(default = "default_max_df")]
    pub max_df: f64,

    #[serde(default = "default_ngram_range")]
    pub ngram_range: [usize; 2],

    #[serde(default = "default_max_features")]
    pub max_features: usize,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct KMeansConfig {
    #[serde(default = "default_n_clusters")]
    pub n_clusters: usize,

    #[serde(default = "default_max_iter")]
    pub max_iter: usize,

    /// Convergence threshold on centroid movement
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,

    #[serde(default = "default_seed")]
    pub seed: u64,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct SummaryConfig {
    /// Terms listed per cluster
    #[serde(default = "default_top_terms")]
    pub top_terms: usize,

    /// Keywords listed per subject
    #[serde(default = "default_keywords_per_subject")]
    pub keywords_per_subject: usize,
}

// Default value functions
fn default_version() -> u32 {
    1
}
fn default_parallel_threads() -> usize {
    num_cpus::get()
}
fn default_true() -> bool {
    true
}
fn default_false() -> bool {
    false
}
fn default_subject_column() -> String {
    "wisata".to_string()
}
fn default_review_column() -> String {
    "review".to_string()
}
fn default_min_token_len() -> usize {
    3
}
fn default_min_df() -> usize {
    2
}
fn default_max_df() -> f64 {
    0.85
}
fn default_ngram_range() -> [usize; 2] {
    [1, 2]
}
fn default_max_features() -> usize {
    500
}
fn default_n_clusters() -> usize {
    3
}
fn default_max_iter() -> usize {
    300
}
fn default_tolerance() -> f64 {
    1e-4
}
fn default_seed() -> u64 {
    42
}
fn default_top_terms() -> usize {
    10
}
fn default_keywords_per_subject() -> usize {
    5
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: default_version(),
            workspace_root: None,
            debug: false,
            parallel_threads: default_parallel_threads(),
            input: InputConfig::default(),
            preprocess: PreprocessConfig::default(),
            vectorizer: VectorizerConfig::default(),
            kmeans: KMeansConfig::default(),
            summary: SummaryConfig::default(),
        }
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            subject_column: default_subject_column(),
            review_column: default_review_column(),
        }
    }
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            min_token_len: default_min_token_len(),
            extra_stop_words: Vec::new(),
        }
    }
}

impl Default for VectorizerConfig {
    fn default() -> Self {
        Self {
            min_df: default_min_df(),
            max_df: default_max_df(),
            ngram_range: default_ngram_range(),
            max_features: default_max_features(),
        }
    }
}

impl Default for KMeansConfig {
    fn default() -> Self {
        Self {
            n_clusters: default_n_clusters(),
            max_iter: default_max_iter(),
            tolerance: default_tolerance(),
            seed: default_seed(),
        }
    }
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            top_terms: default_top_terms(),
            keywords_per_subject: default_keywords_per_subject(),
        }
    }
}

impl VectorizerConfig {
    /// Explicit fitting parameters for [`crate::text::TfidfVectorizer`].
    pub fn params(&self) -> VectorizerParams {
        VectorizerParams {
            min_df: self.min_df,
            max_df: self.max_df,
            ngram_range: (self.ngram_range[0], self.ngram_range[1]),
            max_features: self.max_features,
        }
    }
}

impl KMeansConfig {
    /// Explicit fitting parameters for [`crate::vector::kmeans_clustering`].
    pub fn params(&self) -> KMeansParams {
        KMeansParams {
            n_clusters: self.n_clusters,
            max_iter: self.max_iter,
            tolerance: self.tolerance,
            seed: self.seed,
        }
    }
}

/// `LEXICLUSTER_` prefixed variables, `__` separating nested keys
fn env_provider() -> Env {
    Env::prefixed("LEXICLUSTER_").map(|key| {
        key.as_str()
            .to_lowercase()
            .replace("__", ".") // Double underscore becomes dot
            .into()
    })
}

impl Settings {
    /// Load configuration from all sources
    pub fn load() -> Result<Self, Box<figment::Error>> {
        // Try to find the workspace root by looking for .lexicluster directory
        let config_path = Self::find_workspace_config()
            .unwrap_or_else(|| PathBuf::from(CONFIG_DIR).join(CONFIG_FILE));

        Figment::new()
            .merge(Serialized::defaults(Settings::default()))
            .merge(Toml::file(config_path))
            .merge(env_provider())
            .extract()
            .map_err(Box::new)
            .map(|mut settings: Settings| {
                if settings.workspace_root.is_none() {
                    settings.workspace_root = Self::workspace_root();
                }
                settings
            })
    }

    /// Find the settings file by looking for a .lexicluster directory
    /// from the current directory up to the filesystem root
    fn find_workspace_config() -> Option<PathBuf> {
        Self::workspace_root().map(|root| root.join(CONFIG_DIR).join(CONFIG_FILE))
    }

    /// Check if configuration is properly initialized
    pub fn check_init() -> Result<(), String> {
        let config_path = Self::find_workspace_config()
            .unwrap_or_else(|| PathBuf::from(CONFIG_DIR).join(CONFIG_FILE));

        if !config_path.exists() {
            return Err("No configuration file found".to_string());
        }

        match std::fs::read_to_string(&config_path) {
            Ok(content) => {
                if let Err(e) = toml::from_str::<Settings>(&content) {
                    return Err(format!(
                        "Configuration file is corrupted: {e}\nRun 'lexicluster init --force' to regenerate."
                    ));
                }
            }
            Err(e) => {
                return Err(format!("Cannot read configuration file: {e}"));
            }
        }

        Ok(())
    }

    /// Get the workspace root directory (where .lexicluster is located)
    pub fn workspace_root() -> Option<PathBuf> {
        let current = std::env::current_dir().ok()?;

        current
            .ancestors()
            .find(|ancestor| ancestor.join(CONFIG_DIR).is_dir())
            .map(Path::to_path_buf)
    }

    /// Load configuration from a specific file
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, Box<figment::Error>> {
        Figment::new()
            .merge(Serialized::defaults(Settings::default()))
            .merge(Toml::file(path))
            .merge(env_provider())
            .extract()
            .map_err(Box::new)
    }

    /// Create a default settings file with helpful comments
    pub fn init_config_file(force: bool) -> Result<PathBuf, Box<dyn std::error::Error>> {
        Self::init_config_file_in(Path::new("."), force)
    }

    /// Create a default settings file under `root`
    pub fn init_config_file_in(
        root: &Path,
        force: bool,
    ) -> Result<PathBuf, Box<dyn std::error::Error>> {
        let config_path = root.join(CONFIG_DIR).join(CONFIG_FILE);

        if !force && config_path.exists() {
            return Err("Configuration file already exists. Use --force to overwrite".into());
        }

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let template = format!(
            r#"# Lexicluster Configuration File

# Version of the configuration schema
version = 1

# Global debug mode
debug = false

# Worker threads for vectorizing and cluster assignment (defaults to CPU count)
# parallel_threads = {}

[input]
# CSV column naming the reviewed place
subject_column = "wisata"

# CSV column holding the review text
review_column = "review"

[preprocess]
# Lower-case, strip URLs, mentions and non-letters, drop stop words
enabled = true

# Tokens shorter than this are dropped
min_token_len = 3

# Added to the built-in Indonesian stop word list
extra_stop_words = []

[vectorizer]
# Keep terms found in at least min_df documents
min_df = 2

# and in at most floor(max_df * documents) documents
max_df = 0.85

# Inclusive n-gram lengths
ngram_range = [1, 2]

# Vocabulary cap, most frequent terms first
max_features = 500

[kmeans]
n_clusters = 3
max_iter = 300

# Stop once no centroid moves farther than this
tolerance = 0.0001

# Same seed and input give the same clustering
seed = 42

[summary]
# Terms listed per cluster
top_terms = 10

# Keywords listed per subject
keywords_per_subject = 5
"#,
            num_cpus::get()
        );

        std::fs::write(&config_path, template)?;

        if force {
            println!("Overwrote configuration at: {}", config_path.display());
        } else {
            println!(
                "Created default configuration at: {}",
                config_path.display()
            );
        }

        Ok(config_path)
    }
}
