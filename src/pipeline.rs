//! End-to-end review clustering: load, clean, group, vectorize, cluster,
//! label and persist.
//!
//! Reviews are grouped per subject (the reviewed place) so that each subject
//! becomes one document. Cluster labels come from the top centroid terms;
//! sentiment, theme and keywords are computed per subject document.

use crate::config::{InputConfig, Settings};
use crate::error::{ErrorContext, PipelineError, PipelineResult};
use crate::labeling::{
    SentimentCategory, Theme, analyze_sentiment, cluster_label, detect_theme,
    extract_top_keywords,
};
use crate::text::{Preprocessor, TfidfVectorizer};
use crate::vector::{FitStatus, kmeans_clustering, top_terms};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// File name of the per-subject CSV written by [`write_outputs`].
pub const SUBJECTS_FILE: &str = "subjects.csv";
/// File name of the per-cluster CSV written by [`write_outputs`].
pub const CLUSTERS_FILE: &str = "clusters.csv";
/// File name of the JSON report written by [`write_outputs`].
pub const REPORT_FILE: &str = "report.json";

/// One review row of the input table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewRecord {
    pub subject: String,
    pub review: String,
}

impl ReviewRecord {
    pub fn new(subject: impl Into<String>, review: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            review: review.into(),
        }
    }
}

/// All reviews of one subject joined into a single document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectDocument {
    pub subject: String,
    pub text: String,
    pub n_reviews: usize,
}

/// Per-subject outcome.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubjectResult {
    pub subject: String,
    pub cluster: usize,
    pub cluster_label: String,
    pub sentiment: SentimentCategory,
    pub sentiment_score: i32,
    pub primary_theme: Theme,
    pub related_themes: Vec<Theme>,
    pub keywords: Vec<String>,
    pub n_reviews: usize,
}

/// Per-cluster outcome.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClusterSummary {
    pub cluster: usize,
    pub label: String,
    pub size: usize,
    pub top_terms: Vec<String>,
}

/// Everything a run produces.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClusterReport {
    pub n_reviews: usize,
    pub n_subjects: usize,
    pub vocabulary_size: usize,
    pub inertia: f64,
    pub iterations: usize,
    pub status: FitStatus,
    pub clusters: Vec<ClusterSummary>,
    pub subjects: Vec<SubjectResult>,
}

impl ClusterReport {
    /// Subjects assigned to `cluster`, in subject order.
    pub fn members(&self, cluster: usize) -> impl Iterator<Item = &SubjectResult> {
        self.subjects.iter().filter(move |s| s.cluster == cluster)
    }
}

/// Reads review rows from a CSV file with a header row.
///
/// Rows with an empty subject are skipped.
pub fn load_reviews(path: &Path, input: &InputConfig) -> PipelineResult<Vec<ReviewRecord>> {
    let csv_error = |source: csv::Error| PipelineError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).read_context(path)?;
    let mut reader = csv::Reader::from_reader(file);
    let headers = reader.headers().map_err(csv_error)?.clone();

    let column_index = |column: &str| {
        headers
            .iter()
            .position(|h| h.trim() == column)
            .ok_or_else(|| PipelineError::MissingColumn {
                path: path.to_path_buf(),
                column: column.to_string(),
                available: headers.iter().map(str::to_string).collect(),
            })
    };
    let subject_idx = column_index(&input.subject_column)?;
    let review_idx = column_index(&input.review_column)?;

    let mut records = Vec::new();
    let mut skipped = 0usize;
    for row in reader.records() {
        let row = row.map_err(csv_error)?;
        let subject = row.get(subject_idx).unwrap_or_default().trim();
        if subject.is_empty() {
            skipped += 1;
            continue;
        }
        let review = row.get(review_idx).unwrap_or_default();
        records.push(ReviewRecord::new(subject, review));
    }

    if skipped > 0 {
        debug!("Skipped {skipped} rows without a subject in {}", path.display());
    }
    info!("Loaded {} reviews from {}", records.len(), path.display());
    Ok(records)
}

/// Joins the reviews of each subject with single spaces.
///
/// Subjects come out in lexicographic order. With a preprocessor, each
/// review is cleaned first and reviews that clean to nothing are left out
/// of the join.
pub fn group_by_subject(
    records: &[ReviewRecord],
    preprocessor: Option<&Preprocessor>,
) -> Vec<SubjectDocument> {
    let mut grouped: BTreeMap<&str, (Vec<String>, usize)> = BTreeMap::new();

    for record in records {
        let text = match preprocessor {
            Some(cleaner) => cleaner.clean(&record.review),
            None => record.review.trim().to_string(),
        };
        let entry = grouped.entry(record.subject.as_str()).or_default();
        entry.1 += 1;
        if !text.is_empty() {
            entry.0.push(text);
        }
    }

    grouped
        .into_iter()
        .map(|(subject, (texts, n_reviews))| SubjectDocument {
            subject: subject.to_string(),
            text: texts.join(" "),
            n_reviews,
        })
        .collect()
}

/// Clusters the subjects found in `records`.
///
/// Core fitting never reads settings directly; the relevant sections are
/// converted into explicit parameters here.
pub fn run(settings: &Settings, records: &[ReviewRecord]) -> PipelineResult<ClusterReport> {
    if records.is_empty() {
        return Err(PipelineError::NoReviews);
    }

    let preprocessor = settings.preprocess.enabled.then(|| {
        Preprocessor::new(
            &settings.preprocess.extra_stop_words,
            settings.preprocess.min_token_len,
        )
    });
    let documents = group_by_subject(records, preprocessor.as_ref());
    info!(
        "Grouped {} reviews into {} subjects",
        records.len(),
        documents.len()
    );

    let texts: Vec<&str> = documents.iter().map(|d| d.text.as_str()).collect();
    let vectorizer = TfidfVectorizer::new(settings.vectorizer.params());
    let (fitted, matrix) = vectorizer.fit_transform(&texts)?;

    let model = kmeans_clustering(&matrix, &settings.kmeans.params())?;
    let terms = top_terms(
        fitted.feature_names(),
        model.centroids(),
        settings.summary.top_terms,
    )?;

    let labels: BTreeMap<usize, String> = terms
        .iter()
        .map(|(&cluster, words)| (cluster, cluster_label(words)))
        .collect();
    let sizes = model.cluster_sizes();

    let clusters = terms
        .into_iter()
        .map(|(cluster, top_terms)| ClusterSummary {
            cluster,
            label: labels[&cluster].clone(),
            size: sizes[cluster],
            top_terms,
        })
        .collect();

    let subjects = documents
        .iter()
        .zip(model.labels())
        .map(|(document, &cluster)| {
            let (sentiment, sentiment_score) = analyze_sentiment(&document.text);
            let (primary_theme, related_themes) = detect_theme(&document.text);
            SubjectResult {
                subject: document.subject.clone(),
                cluster,
                cluster_label: labels[&cluster].clone(),
                sentiment,
                sentiment_score,
                primary_theme,
                related_themes,
                keywords: extract_top_keywords(
                    &document.text,
                    settings.summary.keywords_per_subject,
                ),
                n_reviews: document.n_reviews,
            }
        })
        .collect();

    Ok(ClusterReport {
        n_reviews: records.len(),
        n_subjects: documents.len(),
        vocabulary_size: fitted.n_features(),
        inertia: model.inertia(),
        iterations: model.iterations(),
        status: model.status(),
        clusters,
        subjects,
    })
}

fn join_display<T: ToString>(items: &[T]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Serialize)]
struct SubjectRow<'a> {
    subject: &'a str,
    cluster: usize,
    cluster_label: &'a str,
    sentiment: String,
    sentiment_score: i32,
    primary_theme: String,
    keywords: String,
    related_themes: String,
}

#[derive(Serialize)]
struct ClusterRow<'a> {
    cluster: usize,
    label: &'a str,
    size: usize,
    top_terms: String,
}

fn csv_writer(path: &Path) -> PipelineResult<csv::Writer<File>> {
    let file = File::create(path).write_context(path)?;
    Ok(csv::Writer::from_writer(file))
}

fn csv_write_error(path: &Path) -> impl Fn(csv::Error) -> PipelineError + '_ {
    move |source| PipelineError::Csv {
        path: path.to_path_buf(),
        source,
    }
}

/// Writes one row per subject.
pub fn write_subjects_csv(path: &Path, report: &ClusterReport) -> PipelineResult<()> {
    let mut writer = csv_writer(path)?;
    for subject in &report.subjects {
        writer
            .serialize(SubjectRow {
                subject: &subject.subject,
                cluster: subject.cluster,
                cluster_label: &subject.cluster_label,
                sentiment: subject.sentiment.to_string(),
                sentiment_score: subject.sentiment_score,
                primary_theme: subject.primary_theme.to_string(),
                keywords: subject.keywords.join(", "),
                related_themes: join_display(&subject.related_themes),
            })
            .map_err(csv_write_error(path))?;
    }
    writer.flush().write_context(path)
}

/// Writes one row per cluster.
pub fn write_clusters_csv(path: &Path, report: &ClusterReport) -> PipelineResult<()> {
    let mut writer = csv_writer(path)?;
    for cluster in &report.clusters {
        writer
            .serialize(ClusterRow {
                cluster: cluster.cluster,
                label: &cluster.label,
                size: cluster.size,
                top_terms: cluster.top_terms.join(", "),
            })
            .map_err(csv_write_error(path))?;
    }
    writer.flush().write_context(path)
}

/// Writes the whole report as pretty-printed JSON.
pub fn write_json(path: &Path, report: &ClusterReport) -> PipelineResult<()> {
    let file = File::create(path).write_context(path)?;
    serde_json::to_writer_pretty(BufWriter::new(file), report).map_err(|source| {
        PipelineError::Json {
            path: path.to_path_buf(),
            source,
        }
    })
}

/// Writes the subject and cluster tables, plus the JSON report when asked,
/// into `dir`. Returns the written paths.
pub fn write_outputs(
    dir: &Path,
    report: &ClusterReport,
    with_json: bool,
) -> PipelineResult<Vec<PathBuf>> {
    std::fs::create_dir_all(dir).write_context(dir)?;

    let subjects_path = dir.join(SUBJECTS_FILE);
    let clusters_path = dir.join(CLUSTERS_FILE);
    write_subjects_csv(&subjects_path, report)?;
    write_clusters_csv(&clusters_path, report)?;
    let mut written = vec![subjects_path, clusters_path];

    if with_json {
        let report_path = dir.join(REPORT_FILE);
        write_json(&report_path, report)?;
        written.push(report_path);
    }

    info!("Wrote {} output files to {}", written.len(), dir.display());
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn small_settings() -> Settings {
        let mut settings = Settings::default();
        settings.vectorizer.min_df = 1;
        settings.vectorizer.max_df = 1.0;
        settings.kmeans.n_clusters = 2;
        settings
    }

    fn sample_records() -> Vec<ReviewRecord> {
        vec![
            ReviewRecord::new("Pantai Manggar", "Pantai indah, pasir putih dan ombak tenang"),
            ReviewRecord::new("Hutan Lindung", "Hutan hijau sejuk, cocok untuk hiking"),
            ReviewRecord::new("Pantai Manggar", "Sunset di pantai sangat indah"),
            ReviewRecord::new("Pantai Kemala", "Pantai bersih, pasir lembut, sunset keren"),
            ReviewRecord::new("Hutan Mangrove", "Mangrove hijau dan hutan asri"),
        ]
    }

    #[test]
    fn test_group_by_subject_orders_and_joins() {
        let records = vec![
            ReviewRecord::new("b", "second"),
            ReviewRecord::new("a", "first"),
            ReviewRecord::new("b", "third"),
            ReviewRecord::new("b", "   "),
        ];

        let docs = group_by_subject(&records, None);
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].subject, "a");
        assert_eq!(docs[1].subject, "b");
        assert_eq!(docs[1].text, "second third");
        assert_eq!(docs[1].n_reviews, 3);
    }

    #[test]
    fn test_group_by_subject_cleans_reviews() {
        let records = vec![ReviewRecord::new("x", "Pantai yang INDAH!!")];
        let cleaner = Preprocessor::default();
        let docs = group_by_subject(&records, Some(&cleaner));
        assert_eq!(docs[0].text, "pantai indah");
    }

    #[test]
    fn test_run_no_reviews() {
        let result = run(&small_settings(), &[]);
        assert!(matches!(result, Err(PipelineError::NoReviews)));
    }

    #[test]
    fn test_run_report_shape() {
        let records = sample_records();
        let report = run(&small_settings(), &records).unwrap();

        assert_eq!(report.n_reviews, 5);
        assert_eq!(report.n_subjects, 4);
        assert_eq!(report.clusters.len(), 2);
        assert_eq!(report.subjects.len(), 4);
        assert!(report.vocabulary_size > 0);
        assert!(report.iterations >= 1);

        let total: usize = report.clusters.iter().map(|c| c.size).sum();
        assert_eq!(total, 4);
        for cluster in &report.clusters {
            assert!(cluster.size > 0);
            assert_eq!(cluster.size, report.members(cluster.cluster).count());
            assert!(cluster.label.contains(" - "));
        }

        let manggar = &report.subjects[3];
        assert_eq!(manggar.subject, "Pantai Manggar");
        assert_eq!(manggar.n_reviews, 2);
        assert_eq!(manggar.primary_theme, Theme::Beach);
        assert!(manggar.keywords.len() <= 5);
    }

    #[test]
    fn test_run_is_deterministic() {
        let records = sample_records();
        let first = run(&small_settings(), &records).unwrap();
        let second = run(&small_settings(), &records).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_run_empty_vocabulary_is_an_error() {
        let mut settings = small_settings();
        settings.vectorizer.min_df = 10;
        let result = run(&settings, &sample_records());
        assert!(matches!(result, Err(PipelineError::Vectorize(_))));
    }

    #[test]
    fn test_load_reviews_and_missing_column() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("reviews.csv");
        std::fs::write(
            &path,
            "wisata,review,rating\nPantai A,\"indah, bersih\",5\n,tanpa nama,3\nHutan B,sejuk,4\n",
        )
        .unwrap();

        let records = load_reviews(&path, &InputConfig::default()).unwrap();
        assert_eq!(
            records,
            vec![
                ReviewRecord::new("Pantai A", "indah, bersih"),
                ReviewRecord::new("Hutan B", "sejuk"),
            ]
        );

        let input = InputConfig {
            subject_column: "place".to_string(),
            ..InputConfig::default()
        };
        match load_reviews(&path, &input) {
            Err(PipelineError::MissingColumn {
                column, available, ..
            }) => {
                assert_eq!(column, "place");
                assert_eq!(available, vec!["wisata", "review", "rating"]);
            }
            other => panic!("expected MissingColumn, got {other:?}"),
        }
    }

    #[test]
    fn test_load_reviews_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let result = load_reviews(&temp_dir.path().join("absent.csv"), &InputConfig::default());
        assert!(matches!(result, Err(PipelineError::FileRead { .. })));
    }

    #[test]
    fn test_write_outputs() {
        let temp_dir = TempDir::new().unwrap();
        let report = run(&small_settings(), &sample_records()).unwrap();

        let written = write_outputs(&temp_dir.path().join("out"), &report, true).unwrap();
        assert_eq!(written.len(), 3);

        let subjects = std::fs::read_to_string(&written[0]).unwrap();
        let mut lines = subjects.lines();
        assert_eq!(
            lines.next(),
            Some(
                "subject,cluster,cluster_label,sentiment,sentiment_score,primary_theme,keywords,related_themes"
            )
        );
        assert_eq!(lines.count(), 4);

        let clusters = std::fs::read_to_string(&written[1]).unwrap();
        assert!(clusters.starts_with("cluster,label,size,top_terms"));

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&written[2]).unwrap()).unwrap();
        assert_eq!(json["n_subjects"], 4);
        assert_eq!(json["subjects"].as_array().unwrap().len(), 4);
    }
}
