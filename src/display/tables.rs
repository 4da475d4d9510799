//! Table formatting utilities for clustering reports.

use crate::pipeline::ClusterReport;
use comfy_table::{
    Attribute, Cell, CellAlignment, Color, Table, modifiers::UTF8_ROUND_CORNERS,
    presets::UTF8_FULL,
};

/// Builder for creating formatted tables.
pub struct TableBuilder {
    table: Table,
}

impl Default for TableBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TableBuilder {
    /// Create a new table builder.
    pub fn new() -> Self {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.apply_modifier(UTF8_ROUND_CORNERS);
        Self { table }
    }

    /// Set the table headers.
    pub fn set_headers(mut self, headers: Vec<&str>) -> Self {
        let header_cells: Vec<Cell> = headers
            .into_iter()
            .map(|h| Cell::new(h).add_attribute(Attribute::Bold))
            .collect();
        self.table.set_header(header_cells);
        self
    }

    /// Add a row to the table.
    pub fn add_row(mut self, row: Vec<String>) -> Self {
        self.table.add_row(row);
        self
    }

    /// Build and return the formatted table.
    pub fn build(self) -> String {
        self.table.to_string()
    }
}

/// One row per cluster: label, size, dominant terms and member subjects.
pub fn create_cluster_table(report: &ClusterReport, terms_shown: usize) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.apply_modifier(UTF8_ROUND_CORNERS);

    table.set_header(vec![
        Cell::new("Cluster").add_attribute(Attribute::Bold),
        Cell::new("Label").add_attribute(Attribute::Bold),
        Cell::new("Size").add_attribute(Attribute::Bold),
        Cell::new("Dominant terms").add_attribute(Attribute::Bold),
        Cell::new("Subjects").add_attribute(Attribute::Bold),
    ]);

    for cluster in &report.clusters {
        let members = report
            .members(cluster.cluster)
            .map(|s| s.subject.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        let terms = cluster
            .top_terms
            .iter()
            .take(terms_shown)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ");

        let size_cell = if cluster.size == 0 {
            Cell::new(cluster.size).fg(Color::Yellow)
        } else {
            Cell::new(cluster.size)
        };

        table.add_row(vec![
            Cell::new(cluster.cluster).set_alignment(CellAlignment::Right),
            Cell::new(&cluster.label),
            size_cell.set_alignment(CellAlignment::Right),
            Cell::new(terms),
            Cell::new(members),
        ]);
    }

    table.to_string()
}

/// One row per subject with its sentiment, theme and keywords.
pub fn create_subject_table(report: &ClusterReport) -> String {
    let mut builder = TableBuilder::new().set_headers(vec![
        "Subject",
        "Cluster",
        "Sentiment",
        "Theme",
        "Keywords",
    ]);

    for subject in &report.subjects {
        builder = builder.add_row(vec![
            subject.subject.clone(),
            subject.cluster.to_string(),
            format!("{} ({:+})", subject.sentiment, subject.sentiment_score),
            subject.primary_theme.to_string(),
            subject.keywords.join(", "),
        ]);
    }

    builder.build()
}

/// Metric/value summary of a run.
pub fn create_summary_table(report: &ClusterReport) -> String {
    TableBuilder::new()
        .set_headers(vec!["Metric", "Value"])
        .add_row(vec!["Reviews".to_string(), report.n_reviews.to_string()])
        .add_row(vec!["Subjects".to_string(), report.n_subjects.to_string()])
        .add_row(vec![
            "Vocabulary".to_string(),
            report.vocabulary_size.to_string(),
        ])
        .add_row(vec!["Clusters".to_string(), report.clusters.len().to_string()])
        .add_row(vec!["Iterations".to_string(), report.iterations.to_string()])
        .add_row(vec!["Inertia".to_string(), format!("{:.4}", report.inertia)])
        .build()
}
