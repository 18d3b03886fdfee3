// crates/core/src/evaluate.rs
//! The session-metrics facade: one call from (session log, schema) to the
//! nine metric values.
//!
//! This is the boundary component. It normalizes every SQL string with
//! [`clean_sql`], extracts each distinct string exactly once, then hands
//! the ordered chosen sequence to the cohesion calculator and the pooled
//! recommendations to the coverage calculator. The whole computation is a
//! stateless, re-entrant pure function; the only I/O lives in
//! [`evaluate_session_file`].

use std::collections::BTreeMap;
use std::collections::HashMap;
use std::path::Path;

use serde::Serialize;
use tracing::debug;

use crate::cohesion::{cohesion, CohesionMetrics};
use crate::coverage::{coverage, CoverageMetrics};
use crate::error::LogError;
use crate::extract::extract;
use crate::fragments::FragmentSet;
use crate::normalize::clean_sql;
use crate::schema::SchemaUniverse;
use crate::session::SessionLog;

/// Canonical metric names, coverage first; the key order of
/// [`MetricsReport::to_metric_map`].
pub const METRIC_NAMES: [&str; 9] = [
    "Table Coverage",
    "Column Coverage",
    "Aggregation Coverage",
    "Clause Coverage",
    "Edit Index",
    "Jaccard Index",
    "Cosine Index",
    "Common Fragments Index",
    "Common Tables Index",
];

/// The consolidated result of one evaluated session. Built once, never
/// mutated.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsReport {
    pub coverage: CoverageMetrics,
    pub cohesion: CohesionMetrics,
}

impl MetricsReport {
    /// Flatten into the canonical `metric name → value` mapping — the
    /// sole contract with reporting collaborators.
    pub fn to_metric_map(&self) -> BTreeMap<&'static str, f64> {
        BTreeMap::from([
            ("Table Coverage", self.coverage.table_coverage.value),
            ("Column Coverage", self.coverage.column_coverage.value),
            (
                "Aggregation Coverage",
                self.coverage.aggregation_coverage.value,
            ),
            ("Clause Coverage", self.coverage.clause_coverage.value),
            ("Edit Index", self.cohesion.edit_index),
            ("Jaccard Index", self.cohesion.jaccard_index),
            ("Cosine Index", self.cohesion.cosine_index),
            (
                "Common Fragments Index",
                self.cohesion.common_fragments_index,
            ),
            ("Common Tables Index", self.cohesion.common_tables_index),
        ])
    }
}

/// Normalize-then-extract with a per-call memo so each distinct query
/// string is parsed exactly once per evaluation.
struct Extractor {
    cache: HashMap<String, FragmentSet>,
}

impl Extractor {
    fn new() -> Self {
        Self {
            cache: HashMap::new(),
        }
    }

    fn fragments(&mut self, sql: &str) -> FragmentSet {
        let canonical = clean_sql(sql);
        if let Some(cached) = self.cache.get(&canonical) {
            return cached.clone();
        }
        let fragments = extract(&canonical);
        self.cache.insert(canonical, fragments.clone());
        fragments
    }
}

/// Evaluate one session log against one schema universe.
pub fn evaluate_session(log: &SessionLog, universe: &SchemaUniverse) -> MetricsReport {
    let mut extractor = Extractor::new();

    // All extractions complete before the cohesion pair loop runs; the
    // chosen sequence preserves turn order.
    let session: Vec<FragmentSet> = log
        .chosen_queries()
        .iter()
        .map(|sql| extractor.fragments(sql))
        .collect();
    let pool: Vec<FragmentSet> = log
        .recommendation_pool()
        .iter()
        .map(|sql| extractor.fragments(sql))
        .collect();

    debug!(
        chosen = session.len(),
        pool = pool.len(),
        distinct = extractor.cache.len(),
        "evaluating session"
    );

    MetricsReport {
        coverage: coverage(&pool, universe),
        cohesion: cohesion(&session),
    }
}

/// Load a session log from disk and evaluate it. The missing/unreadable
/// log is the engine's one fatal condition.
pub fn evaluate_session_file(
    log_path: &Path,
    universe: &SchemaUniverse,
) -> Result<MetricsReport, LogError> {
    let log = SessionLog::load(log_path)?;
    Ok(evaluate_session(&log, universe))
}
