// crates/cli/src/report.rs
//! Report rendering for evaluated sessions: fixed-width text or JSON.

use queryscope_core::MetricsReport;

/// Output format for per-log report files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ReportFormat {
    Text,
    Json,
}

impl ReportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Json => "json",
        }
    }

    /// File extension for reports in this format.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Text => "txt",
            Self::Json => "json",
        }
    }
}

impl std::fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

const RULE: &str =
    "============================================================";

const COVERAGE_KEYS: [&str; 4] = [
    "Table Coverage",
    "Column Coverage",
    "Aggregation Coverage",
    "Clause Coverage",
];

const COHESION_KEYS: [&str; 5] = [
    "Edit Index",
    "Jaccard Index",
    "Cosine Index",
    "Common Fragments Index",
    "Common Tables Index",
];

/// Render the fixed-width text report.
pub fn render_text(report: &MetricsReport) -> String {
    let metrics = report.to_metric_map();
    let mut out = String::new();

    out.push_str(RULE);
    out.push('\n');
    out.push_str("          Comprehensive Objective Metrics Evaluation Results\n");
    out.push_str(RULE);
    out.push_str("\n\n");

    out.push_str("--- Coverage Metrics ---\n");
    for key in COVERAGE_KEYS {
        out.push_str(&format!("{key:<35}: {:.4}\n", metrics[key]));
    }

    out.push_str("\n--- Session Cohesion Metrics ---\n");
    for key in COHESION_KEYS {
        out.push_str(&format!("{key:<35}: {:.4}\n", metrics[key]));
    }

    out.push_str(RULE);
    out.push('\n');
    out
}

/// Render the JSON report: the flat canonical `name → value` mapping.
pub fn render_json(report: &MetricsReport) -> String {
    // BTreeMap keys serialize in name order; values are plain floats.
    serde_json::to_string_pretty(&report.to_metric_map())
        .expect("metric map serialization cannot fail")
}
