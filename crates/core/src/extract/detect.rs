// crates/core/src/extract/detect.rs
//! Lexical detectors for aggregation operators and structural clauses.
//!
//! These run over the raw query text, independent of the structural SQL
//! parse: a query that sqlparser rejects can still report `ORDER BY` or
//! `COUNT(` if the tokens are present. Presence is recorded, not count.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex_lite::Regex;

use crate::fragments::{AggregateOp, ClauseKind};

/// One compiled pattern per aggregation operator: the operator name as a
/// whole word immediately followed by `(`, whitespace allowed between.
static AGGREGATION_PATTERNS: LazyLock<Vec<(AggregateOp, Regex)>> = LazyLock::new(|| {
    AggregateOp::ALL
        .iter()
        .map(|op| {
            let pattern = format!(r"(?i)\b{}\s*\(", op.as_str());
            (*op, Regex::new(&pattern).unwrap())
        })
        .collect()
});

/// One compiled pattern per clause keyword: whole-word match, multi-word
/// keywords tolerate any internal whitespace ("group \n by" still counts).
static CLAUSE_PATTERNS: LazyLock<Vec<(ClauseKind, Regex)>> = LazyLock::new(|| {
    ClauseKind::ALL
        .iter()
        .map(|clause| {
            let keyword = clause.as_str().replace(' ', r"\s+");
            let pattern = format!(r"(?i)\b{keyword}\b");
            (*clause, Regex::new(&pattern).unwrap())
        })
        .collect()
});

/// Aggregation operators whose call syntax appears in `sql`.
pub fn detect_aggregations(sql: &str) -> BTreeSet<AggregateOp> {
    AGGREGATION_PATTERNS
        .iter()
        .filter(|(_, re)| re.is_match(sql))
        .map(|(op, _)| *op)
        .collect()
}

/// Structural clause keywords present in `sql`.
pub fn detect_clauses(sql: &str) -> BTreeSet<ClauseKind> {
    CLAUSE_PATTERNS
        .iter()
        .filter(|(_, re)| re.is_match(sql))
        .map(|(clause, _)| *clause)
        .collect()
}
