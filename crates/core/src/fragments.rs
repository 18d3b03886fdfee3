// crates/core/src/fragments.rs
//! Fragment value types shared by the extractor and both calculators.
//!
//! A [`FragmentSet`] is the order-independent structural summary of one SQL
//! query: five canonical sets (projections, selections, clauses,
//! aggregations, tables). All string members are lower-cased and trimmed so
//! semantically identical fragments compare equal across queries. The type
//! is an immutable value: built once by extraction, then only read.

use std::collections::BTreeSet;

use serde::Serialize;

/// The five aggregation operators the extractor detects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum AggregateOp {
    #[serde(rename = "COUNT")]
    Count,
    #[serde(rename = "SUM")]
    Sum,
    #[serde(rename = "AVG")]
    Avg,
    #[serde(rename = "MAX")]
    Max,
    #[serde(rename = "MIN")]
    Min,
}

impl AggregateOp {
    /// All supported operators; also the aggregation-coverage denominator.
    pub const ALL: [AggregateOp; 5] = [
        Self::Count,
        Self::Sum,
        Self::Avg,
        Self::Max,
        Self::Min,
    ];

    /// Canonical SQL token for this operator.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Count => "COUNT",
            Self::Sum => "SUM",
            Self::Avg => "AVG",
            Self::Max => "MAX",
            Self::Min => "MIN",
        }
    }
}

impl std::fmt::Display for AggregateOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The seven structural clause keywords the extractor detects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum ClauseKind {
    #[serde(rename = "GROUP BY")]
    GroupBy,
    #[serde(rename = "ORDER BY")]
    OrderBy,
    #[serde(rename = "LIMIT")]
    Limit,
    #[serde(rename = "INTERSECT")]
    Intersect,
    #[serde(rename = "UNION")]
    Union,
    #[serde(rename = "EXCEPT")]
    Except,
    #[serde(rename = "JOIN")]
    Join,
}

impl ClauseKind {
    /// All supported clause keywords; also the clause-coverage denominator.
    pub const ALL: [ClauseKind; 7] = [
        Self::GroupBy,
        Self::OrderBy,
        Self::Limit,
        Self::Intersect,
        Self::Union,
        Self::Except,
        Self::Join,
    ];

    /// Canonical keyword for this clause (multi-word keywords use one space).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GroupBy => "GROUP BY",
            Self::OrderBy => "ORDER BY",
            Self::Limit => "LIMIT",
            Self::Intersect => "INTERSECT",
            Self::Union => "UNION",
            Self::Except => "EXCEPT",
            Self::Join => "JOIN",
        }
    }
}

impl std::fmt::Display for ClauseKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The structural summary of one SQL query.
///
/// `BTreeSet` keeps iteration deterministic, which matters for report dumps
/// and test stability. Malformed SQL degrades to `FragmentSet::default()`
/// (all five sets empty) rather than an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FragmentSet {
    /// Referenced columns: bare `name`, alias-resolved `table.column`,
    /// or wildcards (`*`, `table.*`).
    pub projections: BTreeSet<String>,
    /// First-WHERE predicates, split on top-level AND/OR, lower-cased.
    pub selections: BTreeSet<String>,
    /// Structural keywords present (presence, not count).
    pub clauses: BTreeSet<ClauseKind>,
    /// Aggregation operators whose call syntax appears.
    pub aggregations: BTreeSet<AggregateOp>,
    /// Referenced table names, aliases resolved, CTE names excluded.
    pub tables: BTreeSet<String>,
}

impl FragmentSet {
    /// True when all five sets are empty (the malformed-SQL degradation).
    pub fn is_empty(&self) -> bool {
        self.projections.is_empty()
            && self.selections.is_empty()
            && self.clauses.is_empty()
            && self.aggregations.is_empty()
            && self.tables.is_empty()
    }

    /// Total fragment count across the five categories.
    pub fn len(&self) -> usize {
        self.projections.len()
            + self.selections.len()
            + self.clauses.len()
            + self.aggregations.len()
            + self.tables.len()
    }

    /// Flatten all five categories into one set of canonical tokens.
    ///
    /// Enum categories contribute their canonical upper-case keywords, so
    /// they cannot collide with the lower-cased identifier categories.
    pub fn flatten(&self) -> BTreeSet<String> {
        let mut out: BTreeSet<String> = BTreeSet::new();
        out.extend(self.projections.iter().cloned());
        out.extend(self.selections.iter().cloned());
        out.extend(self.clauses.iter().map(|c| c.as_str().to_string()));
        out.extend(self.aggregations.iter().map(|a| a.as_str().to_string()));
        out.extend(self.tables.iter().cloned());
        out
    }

    /// Count of fragments present in `self` but absent in `other`, summed
    /// across all five categories.
    pub fn difference_count(&self, other: &FragmentSet) -> usize {
        self.projections.difference(&other.projections).count()
            + self.selections.difference(&other.selections).count()
            + self.clauses.difference(&other.clauses).count()
            + self.aggregations.difference(&other.aggregations).count()
            + self.tables.difference(&other.tables).count()
    }

    /// Count of fragments shared with `other`, per category (no flattening).
    pub fn common_count(&self, other: &FragmentSet) -> usize {
        self.projections.intersection(&other.projections).count()
            + self.selections.intersection(&other.selections).count()
            + self.clauses.intersection(&other.clauses).count()
            + self.aggregations.intersection(&other.aggregations).count()
            + self.tables.intersection(&other.tables).count()
    }

    /// The 5-dimensional shape vector: one cardinality per category.
    pub fn shape(&self) -> [f64; 5] {
        [
            self.projections.len() as f64,
            self.selections.len() as f64,
            self.clauses.len() as f64,
            self.aggregations.len() as f64,
            self.tables.len() as f64,
        ]
    }
}
