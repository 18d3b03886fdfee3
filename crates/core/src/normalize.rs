// crates/core/src/normalize.rs
//! SQL canonicalizer applied before fragment extraction.
//!
//! Session logs collect SQL from several producers (hand-typed queries,
//! model suggestions wrapped in markdown fences, quoted identifiers), so
//! the facade runs every string through [`clean_sql`] first. The transform
//! is total and idempotent: fences and double quotes are stripped, one
//! trailing semicolon is removed, identifiers are lower-cased, whitespace
//! collapses to single spaces, and known keywords are upper-cased.

use std::sync::LazyLock;

use regex_lite::Regex;

/// SQL keywords upper-cased by the normalizer, longest first so composite
/// keywords ("GROUP BY") win over their suffixes ("BY" is not in the list,
/// but "OR" is a prefix-collision risk for "ORDER BY").
const SQL_KEYWORDS: [&str; 43] = [
    "FULL OUTER JOIN",
    "CREATE TABLE",
    "PARTITION BY",
    "DELETE FROM",
    "INSERT INTO",
    "PRIMARY KEY",
    "RIGHT JOIN",
    "INNER JOIN",
    "LEFT JOIN",
    "UNION ALL",
    "GROUP BY",
    "ORDER BY",
    "INTERSECT",
    "DISTINCT",
    "BETWEEN",
    "EXISTS",
    "EXCEPT",
    "HAVING",
    "OFFSET",
    "SELECT",
    "UPDATE",
    "VALUES",
    "COUNT",
    "LIMIT",
    "UNION",
    "WHERE",
    "DESC",
    "FROM",
    "JOIN",
    "LIKE",
    "OVER",
    "AND",
    "ASC",
    "AVG",
    "MAX",
    "MIN",
    "NOT",
    "SUM",
    "AS",
    "IN",
    "IS",
    "ON",
    "OR",
];

static FENCE_OPEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*```(?:sql)?\s*").unwrap());
static FENCE_CLOSE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s*```\s*$").unwrap());
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());
static KEYWORDS: LazyLock<Regex> = LazyLock::new(|| {
    // Alternation order is match priority, so the list above must stay
    // sorted longest-first.
    let pattern = SQL_KEYWORDS
        .iter()
        .map(|k| k.replace(' ', r"\s+"))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"(?i)\b(?:{pattern})\b")).unwrap()
});

/// Canonicalize a raw SQL string.
///
/// Never fails; the output for any input is a single-line string with
/// lower-cased identifiers and upper-cased keywords. Idempotent:
/// `clean_sql(clean_sql(s)) == clean_sql(s)`.
pub fn clean_sql(sql: &str) -> String {
    let no_fence = FENCE_OPEN.replace(sql, "");
    let no_fence = FENCE_CLOSE.replace(&no_fence, "");

    let mut cleaned = no_fence.replace('"', "");
    cleaned = cleaned.trim().to_string();
    if let Some(stripped) = cleaned.strip_suffix(';') {
        cleaned = stripped.trim_end().to_string();
    }

    let lowered = cleaned.to_lowercase();
    let collapsed = WHITESPACE.replace_all(&lowered, " ").trim().to_string();

    KEYWORDS
        .replace_all(&collapsed, |caps: &regex_lite::Captures<'_>| {
            caps[0].to_uppercase()
        })
        .into_owned()
}
