//! Full pipeline over the bundled review fixture.

use lexicluster::config::InputConfig;
use lexicluster::pipeline::{self, CLUSTERS_FILE, REPORT_FILE, SUBJECTS_FILE};
use lexicluster::{PipelineError, Settings, Theme};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn fixture() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/reviews.csv")
}

#[test]
fn fixture_loads_every_review() {
    let records = pipeline::load_reviews(&fixture(), &InputConfig::default()).unwrap();
    assert_eq!(records.len(), 12);
    assert_eq!(records[0].subject, "Pantai Manggar");
    assert!(records[0].review.contains("ombak tenang"));
}

#[test]
fn fixture_clusters_into_three_groups() {
    let records = pipeline::load_reviews(&fixture(), &InputConfig::default()).unwrap();
    let report = pipeline::run(&Settings::default(), &records).unwrap();

    assert_eq!(report.n_reviews, 12);
    assert_eq!(report.n_subjects, 6);
    assert_eq!(report.clusters.len(), 3);
    assert_eq!(report.clusters.iter().map(|c| c.size).sum::<usize>(), 6);
    assert!(report.iterations <= 300);

    for cluster in &report.clusters {
        assert!(cluster.top_terms.len() <= 10);
        assert!(!cluster.top_terms.is_empty());
    }

    // Subjects are reported in lexicographic order
    let names: Vec<&str> = report.subjects.iter().map(|s| s.subject.as_str()).collect();
    let mut sorted = names.clone();
    sorted.sort_unstable();
    assert_eq!(names, sorted);

    let seafood = report
        .subjects
        .iter()
        .find(|s| s.subject == "Kampung Kuliner Seafood")
        .unwrap();
    assert_eq!(seafood.primary_theme, Theme::Culinary);
    assert_eq!(seafood.n_reviews, 2);
}

#[test]
fn fixture_outputs_are_written() {
    let temp_dir = TempDir::new().unwrap();
    let records = pipeline::load_reviews(&fixture(), &InputConfig::default()).unwrap();
    let report = pipeline::run(&Settings::default(), &records).unwrap();

    let written = pipeline::write_outputs(temp_dir.path(), &report, true).unwrap();
    assert_eq!(
        written,
        vec![
            temp_dir.path().join(SUBJECTS_FILE),
            temp_dir.path().join(CLUSTERS_FILE),
            temp_dir.path().join(REPORT_FILE),
        ]
    );

    let mut reader = csv::Reader::from_path(&written[0]).unwrap();
    assert_eq!(reader.records().count(), 6);
    let mut reader = csv::Reader::from_path(&written[1]).unwrap();
    assert_eq!(reader.records().count(), 3);
}

#[test]
fn custom_columns_are_honored() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("places.csv");
    std::fs::write(
        &path,
        "place,text\nA,pantai indah sunset\nB,pantai bersih sunset\nC,hutan sejuk hijau\nD,hutan hijau pohon\n",
    )
    .unwrap();

    let mut settings = Settings::default();
    settings.input.subject_column = "place".to_string();
    settings.input.review_column = "text".to_string();
    settings.kmeans.n_clusters = 2;

    let records = pipeline::load_reviews(&path, &settings.input).unwrap();
    let report = pipeline::run(&settings, &records).unwrap();

    let cluster_of = |name: &str| {
        report
            .subjects
            .iter()
            .find(|s| s.subject == name)
            .map(|s| s.cluster)
            .unwrap()
    };
    assert_eq!(cluster_of("A"), cluster_of("B"));
    assert_eq!(cluster_of("C"), cluster_of("D"));
    assert_ne!(cluster_of("A"), cluster_of("C"));
}

#[test]
fn header_only_file_has_no_reviews() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("empty.csv");
    std::fs::write(&path, "wisata,review\n").unwrap();

    let records = pipeline::load_reviews(&path, &InputConfig::default()).unwrap();
    assert!(records.is_empty());
    assert!(matches!(
        pipeline::run(&Settings::default(), &records),
        Err(PipelineError::NoReviews)
    ));
}
