// crates/core/src/extract/mod.rs
//! SQL fragment extraction: one raw SQL string in, one [`FragmentSet`] out.
//!
//! Two independent passes with different correctness requirements:
//!
//! - a structural pass ([`relations`]) parses the statement with sqlparser
//!   and resolves aliased table/column references;
//! - lexical passes ([`detect`], [`selection`]) pattern-match the raw text
//!   for aggregation calls, clause keywords, and WHERE predicates.
//!
//! The lexical passes always run; a failed structural parse costs only the
//! table/column categories. Extraction is total: it never returns an error
//! and never panics, whatever the input.

mod detect;
mod relations;
mod selection;

use tracing::debug;

use crate::fragments::FragmentSet;

/// Extract the fragment set of one SQL string.
///
/// Idempotent and side-effect free; safe to run across queries in
/// parallel. Empty or malformed input degrades toward the all-empty set.
pub fn extract(sql: &str) -> FragmentSet {
    if sql.trim().is_empty() {
        return FragmentSet::default();
    }

    let mut fragments = FragmentSet {
        aggregations: detect::detect_aggregations(sql),
        clauses: detect::detect_clauses(sql),
        selections: selection::extract_selections(sql),
        ..Default::default()
    };

    match relations::extract_relations(sql) {
        Ok(relations) => {
            fragments.tables = relations.tables;
            fragments.projections = relations.columns;
        }
        Err(e) => {
            debug!(error = %e, "structural SQL parse failed; tables/columns empty");
        }
    }

    fragments
}
