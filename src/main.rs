//! CLI entry point for review clustering.
//!
//! Provides commands for creating and inspecting settings and for clustering
//! a review CSV into labeled groups of places.

use anyhow::Context;
use clap::{
    Parser, Subcommand,
    builder::styling::{AnsiColor, Effects, Styles},
};
use lexicluster::display::{THEME, create_cluster_table, create_subject_table, create_summary_table};
use lexicluster::io::ExitCode;
use lexicluster::pipeline::{self, ClusterReport};
use lexicluster::{PipelineError, Settings};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

fn clap_cargo_style() -> Styles {
    Styles::styled()
        .header(AnsiColor::Cyan.on_default() | Effects::BOLD)
        .usage(AnsiColor::Cyan.on_default() | Effects::BOLD)
        .literal(AnsiColor::Green.on_default())
        .placeholder(AnsiColor::Green.on_default())
}

/// Review clustering with TF-IDF and K-means
#[derive(Parser)]
#[command(
    name = "lexicluster",
    version = env!("CARGO_PKG_VERSION"),
    about = "Cluster tourist location reviews with TF-IDF and K-means",
    next_line_help = true,
    styles = clap_cargo_style()
)]
struct Cli {
    /// Path to custom settings.toml file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log debug details to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
enum Commands {
    /// Initialize project
    #[command(about = "Set up .lexicluster directory with default configuration")]
    Init {
        /// Force overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },

    /// Show current configuration settings
    #[command(about = "Display active settings from .lexicluster/settings.toml")]
    Config,

    /// Cluster the places reviewed in a CSV file
    #[command(
        about = "Cluster reviewed places and write subject and cluster tables",
        after_help = "Examples:\n  lexicluster cluster data/reviews.csv\n  lexicluster cluster data/reviews.csv --clusters 4 --seed 7\n  lexicluster cluster data/reviews.csv --output-dir out --json"
    )]
    Cluster {
        /// CSV file with one review per row
        input: PathBuf,

        /// Number of clusters (overrides config)
        #[arg(short = 'k', long)]
        clusters: Option<usize>,

        /// Random seed (overrides config)
        #[arg(long)]
        seed: Option<u64>,

        /// Minimum document frequency (overrides config)
        #[arg(long)]
        min_df: Option<usize>,

        /// Number of threads to use (overrides config)
        #[arg(short, long)]
        threads: Option<usize>,

        /// Directory for the output tables
        #[arg(short, long, default_value = "outputs")]
        output_dir: PathBuf,

        /// Also write the full report as JSON
        #[arg(long)]
        json: bool,

        /// Print one row per subject as well
        #[arg(long)]
        subjects: bool,
    },
}

fn init_logging(debug: bool) -> anyhow::Result<()> {
    let level = if debug { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to install the tracing subscriber")
}

fn load_settings(config: Option<&Path>) -> Result<Settings, PipelineError> {
    match config {
        Some(path) => Settings::load_from(path).map_err(|e| PipelineError::ConfigError {
            reason: format!("{e} (loading {})", path.display()),
        }),
        None => Settings::load().map_err(|e| PipelineError::ConfigError {
            reason: e.to_string(),
        }),
    }
}

fn print_report(report: &ClusterReport, settings: &Settings, with_subjects: bool) {
    println!("{}", THEME.apply(&THEME.header, "Run summary"));
    println!("{}", create_summary_table(report));
    println!("{}", THEME.apply(&THEME.header, "Clusters"));
    println!("{}", create_cluster_table(report, settings.summary.top_terms.min(8)));
    if with_subjects {
        println!("{}", THEME.apply(&THEME.header, "Subjects"));
        println!("{}", create_subject_table(report));
    }
}

/// Layered settings for commands that read them, with a warning when the
/// workspace has no usable settings file.
fn active_settings(cli: &Cli) -> anyhow::Result<Settings> {
    // An explicit --config file replaces the workspace lookup
    let init_warning = match cli.config {
        Some(_) => None,
        None => Settings::check_init().err(),
    };
    if let Some(warning) = init_warning {
        eprintln!("{}", THEME.warning_with_icon(&warning));
        eprintln!("Using default configuration for now.");
    }
    let settings = load_settings(cli.config.as_deref())?;
    init_logging(cli.verbose || settings.debug)?;
    Ok(settings)
}

fn execute(cli: &Cli) -> anyhow::Result<()> {
    match &cli.command {
        Commands::Init { force } => {
            let path = Settings::init_config_file(*force).map_err(|e| anyhow::anyhow!("{e}"))?;
            println!("Edit {} to customize your settings.", path.display());
            Ok(())
        }

        Commands::Config => {
            let settings = active_settings(cli)?;
            println!("Current Configuration:");
            println!("{}", "=".repeat(50));
            let toml_str =
                toml::to_string_pretty(&settings).context("Error displaying config")?;
            println!("{toml_str}");
            Ok(())
        }

        Commands::Cluster {
            input,
            clusters,
            seed,
            min_df,
            threads,
            output_dir,
            json,
            subjects,
        } => {
            let mut settings = active_settings(cli)?;
            // Override config with CLI args
            if let Some(k) = clusters {
                settings.kmeans.n_clusters = *k;
            }
            if let Some(s) = seed {
                settings.kmeans.seed = *s;
            }
            if let Some(m) = min_df {
                settings.vectorizer.min_df = *m;
            }
            if let Some(t) = threads {
                settings.parallel_threads = *t;
            }

            rayon::ThreadPoolBuilder::new()
                .num_threads(settings.parallel_threads)
                .build_global()
                .context("Failed to configure the worker thread pool")?;

            let start = Instant::now();
            let records = pipeline::load_reviews(input, &settings.input)?;
            let report = pipeline::run(&settings, &records)?;
            let written = pipeline::write_outputs(output_dir, &report, *json)?;
            info!("Clustering finished in {:?}", start.elapsed());

            print_report(&report, &settings, *subjects);
            for path in written {
                println!(
                    "{}",
                    THEME.success_with_icon(&format!(
                        "Saved {}",
                        THEME.apply(&THEME.path, path.display())
                    ))
                );
            }
            Ok(())
        }
    }
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();

    match execute(&cli) {
        Ok(()) => ExitCode::Success.into(),
        Err(error) => {
            eprintln!("{}", THEME.error_with_icon(&format!("{error:#}")));
            let code = match error.downcast_ref::<PipelineError>() {
                Some(pipeline_error) => {
                    for suggestion in pipeline_error.recovery_suggestions() {
                        eprintln!("  {}", THEME.apply(&THEME.dim, suggestion));
                    }
                    ExitCode::from_error(pipeline_error)
                }
                None => ExitCode::GeneralError,
            };
            code.into()
        }
    }
}
