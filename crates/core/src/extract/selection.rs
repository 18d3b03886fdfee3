// crates/core/src/extract/selection.rs
//! Lexical WHERE-predicate extraction.
//!
//! Deliberately not a boolean-expression parser: the first WHERE clause in
//! document order is taken, its text split on top-level AND/OR, and each
//! piece kept as one opaque fragment (parenthesized groups and sub-selects
//! stay whole). The cohesion normalization constants were tuned against
//! this granularity, so it must not be refined into a predicate tree.

use std::collections::BTreeSet;

/// Keywords that terminate a WHERE clause at its own nesting depth.
const CLAUSE_TERMINATORS: [&str; 10] = [
    "group",
    "order",
    "having",
    "limit",
    "union",
    "intersect",
    "except",
    "offset",
    "window",
    "returning",
];

fn is_word_byte(b: u8) -> bool {
    b == b'_' || b.is_ascii_alphanumeric()
}

/// Skip a quoted literal starting at `i` (which must point at the quote).
/// Doubled quotes are treated as escapes. Returns the index just past the
/// closing quote, or `bytes.len()` if the literal is unterminated.
fn skip_quoted(bytes: &[u8], i: usize) -> usize {
    let quote = bytes[i];
    let mut j = i + 1;
    while j < bytes.len() {
        if bytes[j] == quote {
            if j + 1 < bytes.len() && bytes[j + 1] == quote {
                j += 2;
                continue;
            }
            return j + 1;
        }
        j += 1;
    }
    bytes.len()
}

/// The raw text of the first WHERE clause in `sql`, document order, with
/// the keyword stripped. `None` when no WHERE is present.
fn first_where_clause(sql: &str) -> Option<&str> {
    let bytes = sql.as_bytes();

    // Locate the first whole-word WHERE outside string literals, at any
    // nesting depth (a subquery's WHERE appearing first wins).
    let mut i = 0;
    let mut depth: i32 = 0;
    let mut found: Option<(usize, i32)> = None;
    while i < bytes.len() {
        match bytes[i] {
            b'\'' | b'"' => {
                i = skip_quoted(bytes, i);
                continue;
            }
            b'(' => depth += 1,
            b')' => depth -= 1,
            b if is_word_byte(b) => {
                let start = i;
                while i < bytes.len() && is_word_byte(bytes[i]) {
                    i += 1;
                }
                if sql[start..i].eq_ignore_ascii_case("where") {
                    found = Some((i, depth));
                    break;
                }
                continue;
            }
            _ => {}
        }
        i += 1;
    }
    let (clause_start, start_depth) = found?;

    // Scan forward to the clause end: a terminator keyword at the clause's
    // own depth, the paren that closes the enclosing scope, a statement
    // separator, or end of input.
    let mut i = clause_start;
    let mut depth = start_depth;
    let mut end = bytes.len();
    while i < bytes.len() {
        match bytes[i] {
            b'\'' | b'"' => {
                i = skip_quoted(bytes, i);
                continue;
            }
            b'(' => depth += 1,
            b')' => {
                if depth == start_depth {
                    end = i;
                    break;
                }
                depth -= 1;
            }
            b';' if depth == start_depth => {
                end = i;
                break;
            }
            b if is_word_byte(b) => {
                let word_start = i;
                let mut j = i;
                while j < bytes.len() && is_word_byte(bytes[j]) {
                    j += 1;
                }
                let word = &sql[word_start..j];
                if depth == start_depth
                    && CLAUSE_TERMINATORS
                        .iter()
                        .any(|t| word.eq_ignore_ascii_case(t))
                {
                    end = word_start;
                    break;
                }
                i = j;
                continue;
            }
            _ => {}
        }
        i += 1;
    }

    let clause = sql[clause_start..end].trim();
    (!clause.is_empty()).then_some(clause)
}

/// Split a WHERE-clause body on top-level AND/OR into trimmed, lower-cased
/// predicate fragments. "Top-level" means outside parentheses and string
/// literals; a parenthesized group is one fragment.
fn split_predicates(clause: &str) -> BTreeSet<String> {
    let bytes = clause.as_bytes();
    let mut fragments = BTreeSet::new();
    let mut push = |piece: &str| {
        let trimmed = piece.trim();
        if !trimmed.is_empty() {
            fragments.insert(trimmed.to_lowercase());
        }
    };

    let mut frag_start = 0;
    let mut i = 0;
    let mut depth: i32 = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\'' | b'"' => {
                i = skip_quoted(bytes, i);
                continue;
            }
            b'(' => depth += 1,
            b')' => depth -= 1,
            b if is_word_byte(b) => {
                let word_start = i;
                let mut j = i;
                while j < bytes.len() && is_word_byte(bytes[j]) {
                    j += 1;
                }
                let word = &clause[word_start..j];
                if depth == 0
                    && (word.eq_ignore_ascii_case("and") || word.eq_ignore_ascii_case("or"))
                {
                    push(&clause[frag_start..word_start]);
                    frag_start = j;
                }
                i = j;
                continue;
            }
            _ => {}
        }
        i += 1;
    }
    push(&clause[frag_start..]);
    fragments
}

/// The selection fragments of `sql`: the first WHERE clause split on
/// top-level AND/OR. Empty set when no WHERE clause exists.
pub fn extract_selections(sql: &str) -> BTreeSet<String> {
    match first_where_clause(sql) {
        Some(clause) => split_predicates(clause),
        None => BTreeSet::new(),
    }
}
