// crates/core/src/coverage.rs
//! Coverage: how much of the schema's structural surface the recommended
//! queries touched.
//!
//! Order-independent and stateless: the pool is reduced to one union per
//! fragment category, then divided by the matching universe category.
//! Table/column denominators come from the schema; the aggregation and
//! clause denominators are the fixed 5- and 7-member inventories.

use serde::Serialize;

use crate::fragments::{AggregateOp, ClauseKind, FragmentSet};
use crate::schema::SchemaUniverse;

/// One coverage ratio plus the counts that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverageRatio {
    /// Distinct fragments of this category touched by the pool.
    pub covered: usize,
    /// Size of the corresponding universe category.
    pub universe: usize,
    /// `covered / universe`, clipped to [0, 1]; 0 when the universe is
    /// empty (degenerate schema, never a division error).
    pub value: f64,
}

impl CoverageRatio {
    fn new(covered: usize, universe: usize) -> Self {
        let value = if universe == 0 {
            0.0
        } else {
            (covered as f64 / universe as f64).clamp(0.0, 1.0)
        };
        Self {
            covered,
            universe,
            value,
        }
    }
}

/// The four coverage ratios of one evaluated pool.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverageMetrics {
    pub table_coverage: CoverageRatio,
    pub column_coverage: CoverageRatio,
    pub aggregation_coverage: CoverageRatio,
    pub clause_coverage: CoverageRatio,
}

/// Compute coverage of `pool` against `universe`.
///
/// Duplicates and ordering in the pool are irrelevant; an empty pool
/// yields 0 for every ratio.
pub fn coverage(pool: &[FragmentSet], universe: &SchemaUniverse) -> CoverageMetrics {
    let mut tables = std::collections::BTreeSet::new();
    let mut columns = std::collections::BTreeSet::new();
    let mut aggregations: std::collections::BTreeSet<AggregateOp> =
        std::collections::BTreeSet::new();
    let mut clauses: std::collections::BTreeSet<ClauseKind> = std::collections::BTreeSet::new();
    for fragments in pool {
        tables.extend(fragments.tables.iter());
        columns.extend(fragments.projections.iter());
        aggregations.extend(fragments.aggregations.iter());
        clauses.extend(fragments.clauses.iter());
    }

    CoverageMetrics {
        table_coverage: CoverageRatio::new(tables.len(), universe.tables.len()),
        column_coverage: CoverageRatio::new(columns.len(), universe.columns.len()),
        aggregation_coverage: CoverageRatio::new(aggregations.len(), AggregateOp::ALL.len()),
        clause_coverage: CoverageRatio::new(clauses.len(), ClauseKind::ALL.len()),
    }
}
