//! Binary-level checks: exit codes and written files.

use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

fn lexicluster(workdir: &Path) -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_lexicluster"));
    command.current_dir(workdir).env("NO_COLOR", "1");
    command
}

fn fixture() -> String {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures/reviews.csv")
        .display()
        .to_string()
}

#[test]
fn cluster_command_writes_outputs() {
    let temp_dir = TempDir::new().unwrap();

    let output = lexicluster(temp_dir.path())
        .args(["cluster", &fixture(), "-k", "3", "--json", "--threads", "2"])
        .output()
        .unwrap();

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let out_dir = temp_dir.path().join("outputs");
    assert!(out_dir.join("subjects.csv").exists());
    assert!(out_dir.join("clusters.csv").exists());
    assert!(out_dir.join("report.json").exists());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Clusters"));
    assert!(stdout.contains("Inertia"));
}

#[test]
fn missing_input_maps_to_io_exit_code() {
    let temp_dir = TempDir::new().unwrap();

    let output = lexicluster(temp_dir.path())
        .args(["cluster", "does-not-exist.csv"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(5));
}

#[test]
fn strict_filtering_is_a_blocking_error() {
    let temp_dir = TempDir::new().unwrap();

    let output = lexicluster(temp_dir.path())
        .args(["cluster", &fixture(), "--min-df", "50"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("min_df"));
}

#[test]
fn init_then_config_round_trip() {
    let temp_dir = TempDir::new().unwrap();

    let init = lexicluster(temp_dir.path()).arg("init").output().unwrap();
    assert!(init.status.success());
    assert!(temp_dir.path().join(".lexicluster/settings.toml").exists());

    let again = lexicluster(temp_dir.path()).arg("init").output().unwrap();
    assert!(!again.status.success());

    let config = lexicluster(temp_dir.path())
        .arg("config")
        .env("LEXICLUSTER_KMEANS__N_CLUSTERS", "7")
        .output()
        .unwrap();
    assert!(config.status.success());
    let stdout = String::from_utf8_lossy(&config.stdout);
    assert!(stdout.contains("n_clusters = 7"));
}

#[test]
fn malformed_settings_file_maps_to_config_exit_code() {
    let temp_dir = TempDir::new().unwrap();
    let settings = temp_dir.path().join("bad.toml");
    std::fs::write(&settings, "[kmeans]\nn_clusters = \"three\"\n").unwrap();

    let output = lexicluster(temp_dir.path())
        .arg("--config")
        .arg(&settings)
        .args(["cluster", &fixture()])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(6));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Invalid configuration"));
    assert!(stderr.contains("lexicluster init --force"));
}
