// crates/core/src/cohesion.rs
//! Cohesion: how smoothly each chosen query evolves into the next.
//!
//! Five indices are computed per adjacent transition pair and averaged
//! over the session. All five are pure functions of two fragment sets
//! (Common Tables additionally takes one session-wide constant computed
//! before the pair loop). A session with fewer than two queries returns
//! all-zero metrics by contract, not NaN.

use serde::Serialize;

use crate::fragments::FragmentSet;

/// Fixed normalization scale shared by the Edit and Common-Fragments
/// indices: 10 fragment tokens of difference saturate Edit at 0, and 10
/// shared tokens constitute full cohesion. Deliberately not
/// schema-adaptive; the granularity of the extractor was tuned against it.
const EDIT_SCALE: f64 = 10.0;

/// Session-level means of the five transition indices, each in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CohesionMetrics {
    pub edit_index: f64,
    pub jaccard_index: f64,
    pub cosine_index: f64,
    pub common_fragments_index: f64,
    pub common_tables_index: f64,
}

impl CohesionMetrics {
    /// The defined result for a session with fewer than two queries.
    pub const ZERO: CohesionMetrics = CohesionMetrics {
        edit_index: 0.0,
        jaccard_index: 0.0,
        cosine_index: 0.0,
        common_fragments_index: 0.0,
        common_tables_index: 0.0,
    };
}

/// Edit Index: `max(0, 1 - (added + removed) / 10)`, counting per-category
/// set differences across all five categories.
pub fn edit_index(prev: &FragmentSet, curr: &FragmentSet) -> f64 {
    let added = curr.difference_count(prev) as f64;
    let removed = prev.difference_count(curr) as f64;
    (1.0 - (added + removed) / EDIT_SCALE).max(0.0)
}

/// Jaccard Index over the flattened fragment sets. Two empty queries are
/// maximally similar (1.0); exactly one empty side is 0.0.
pub fn jaccard_index(prev: &FragmentSet, curr: &FragmentSet) -> f64 {
    let flat_prev = prev.flatten();
    let flat_curr = curr.flatten();
    if flat_prev.is_empty() && flat_curr.is_empty() {
        return 1.0;
    }
    let intersection = flat_prev.intersection(&flat_curr).count() as f64;
    let union = flat_prev.union(&flat_curr).count() as f64;
    intersection / union
}

/// Cosine Index over the 5-dimensional shape vectors (category
/// cardinalities, not contents). Two zero vectors are 1.0; one zero
/// vector is 0.0.
pub fn cosine_index(prev: &FragmentSet, curr: &FragmentSet) -> f64 {
    let a = prev.shape();
    let b = curr.shape();
    let dot: f64 = a.iter().zip(&b).map(|(x, y)| x * y).sum();
    let norm_a: f64 = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b: f64 = b.iter().map(|x| x * x).sum::<f64>().sqrt();
    if norm_a > 0.0 && norm_b > 0.0 {
        dot / (norm_a * norm_b)
    } else if norm_a == norm_b {
        1.0
    } else {
        0.0
    }
}

/// Common Fragments Index: `min(1, shared / 10)`, counting per-category
/// intersections across all five categories.
pub fn common_fragments_index(prev: &FragmentSet, curr: &FragmentSet) -> f64 {
    let shared = prev.common_count(curr) as f64;
    (shared / EDIT_SCALE).min(1.0)
}

/// Common Tables Index: shared tables over the session's largest observed
/// table-set size (`max_tables`, minimum 1).
pub fn common_tables_index(prev: &FragmentSet, curr: &FragmentSet, max_tables: usize) -> f64 {
    let shared = prev.tables.intersection(&curr.tables).count() as f64;
    shared / max_tables.max(1) as f64
}

/// The largest table-set size observed across the session, minimum 1.
/// Computed once per session, before the pair loop.
fn max_tables_in_session(session: &[FragmentSet]) -> usize {
    session
        .iter()
        .map(|fragments| fragments.tables.len())
        .max()
        .unwrap_or(0)
        .max(1)
}

/// Compute the session-level cohesion metrics over the ordered sequence
/// of chosen-query fragment sets.
pub fn cohesion(session: &[FragmentSet]) -> CohesionMetrics {
    if session.len() < 2 {
        return CohesionMetrics::ZERO;
    }

    let max_tables = max_tables_in_session(session);
    let pairs = session.windows(2);
    let transition_count = (session.len() - 1) as f64;

    let mut sums = CohesionMetrics::ZERO;
    for pair in pairs {
        let (prev, curr) = (&pair[0], &pair[1]);
        sums.edit_index += edit_index(prev, curr);
        sums.jaccard_index += jaccard_index(prev, curr);
        sums.cosine_index += cosine_index(prev, curr);
        sums.common_fragments_index += common_fragments_index(prev, curr);
        sums.common_tables_index += common_tables_index(prev, curr, max_tables);
    }

    CohesionMetrics {
        edit_index: sums.edit_index / transition_count,
        jaccard_index: sums.jaccard_index / transition_count,
        cosine_index: sums.cosine_index / transition_count,
        common_fragments_index: sums.common_fragments_index / transition_count,
        common_tables_index: sums.common_tables_index / transition_count,
    }
}
