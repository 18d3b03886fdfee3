// crates/core/tests/evaluate_session.rs
//! End-to-end: session log + schema files on disk → the nine metrics.

use std::path::Path;

use queryscope_core::{evaluate_session_file, LogError, SchemaUniverse, METRIC_NAMES};

const LOG: &str = r#"{
    "dbId": "shop",
    "originSuggestions": [
        "SELECT name FROM customers",
        "SELECT COUNT(*) FROM orders GROUP BY customer_id"
    ],
    "turns": [
        {
            "sql": "SELECT name FROM customers;",
            "suggestions": ["SELECT label FROM products ORDER BY label"]
        },
        {
            "suggestions": ["```sql\nSELECT * FROM stores\n```"]
        },
        {
            "sql": "SELECT name, age FROM customers WHERE age > 30;",
            "suggestions": []
        }
    ]
}"#;

const SCHEMA_SQL: &str = r#"
CREATE TABLE customers (id INTEGER PRIMARY KEY, name TEXT, age INTEGER);
CREATE TABLE orders (id INTEGER PRIMARY KEY, customer_id INTEGER, total REAL);
CREATE TABLE products (id INTEGER PRIMARY KEY, label TEXT);
CREATE TABLE stores (id INTEGER PRIMARY KEY, city TEXT);
CREATE TABLE staff (id INTEGER PRIMARY KEY, role TEXT);
CREATE TABLE suppliers (id INTEGER PRIMARY KEY, region TEXT);
"#;

#[test]
fn evaluates_log_and_ddl_schema_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let log_path = dir.path().join("session.json");
    let schema_path = dir.path().join("schema.sql");
    std::fs::write(&log_path, LOG).unwrap();
    std::fs::write(&schema_path, SCHEMA_SQL).unwrap();

    let universe = SchemaUniverse::load(&schema_path).unwrap();
    assert_eq!(universe.tables.len(), 6);

    let report = evaluate_session_file(&log_path, &universe).unwrap();

    // Pool: customers, orders, products, stores = 4 of 6 tables.
    assert!((report.coverage.table_coverage.value - 4.0 / 6.0).abs() < 1e-12);
    // COUNT is the only aggregation offered.
    assert_eq!(report.coverage.aggregation_coverage.covered, 1);
    // GROUP BY and ORDER BY appear in the pool.
    assert_eq!(report.coverage.clause_coverage.covered, 2);

    // Chosen sequence is the spec's two-query scenario.
    assert!((report.cohesion.edit_index - 0.8).abs() < 1e-12);
    assert!((report.cohesion.jaccard_index - 0.5).abs() < 1e-12);
    assert_eq!(report.cohesion.common_tables_index, 1.0);

    let map = report.to_metric_map();
    for name in METRIC_NAMES {
        assert!(map.contains_key(name));
    }
}

#[test]
fn json_and_ddl_schema_forms_agree() {
    let dir = tempfile::tempdir().unwrap();

    let ddl_path = dir.path().join("schema.sql");
    std::fs::write(&ddl_path, "CREATE TABLE t (a INT, b TEXT);\nCREATE TABLE u (c INT);").unwrap();

    let json_path = dir.path().join("schema.json");
    std::fs::write(
        &json_path,
        r#"{"tables": {"t": ["a", "b"], "u": ["c"]}}"#,
    )
    .unwrap();

    assert_eq!(
        SchemaUniverse::load(&ddl_path).unwrap(),
        SchemaUniverse::load(&json_path).unwrap()
    );
}

#[test]
fn missing_log_is_fatal() {
    let universe = SchemaUniverse::empty();
    let err = evaluate_session_file(Path::new("/no/such/log.json"), &universe).unwrap_err();
    assert!(matches!(err, LogError::NotFound { .. }));
}

#[test]
fn malformed_sql_in_log_degrades_to_zero_not_error() {
    let dir = tempfile::tempdir().unwrap();
    let log_path = dir.path().join("broken.json");
    std::fs::write(
        &log_path,
        r#"{
            "turns": [
                {"sql": "SELEC ((( garbage"},
                {"sql": "also not sql )))"}
            ]
        }"#,
    )
    .unwrap();

    let report = evaluate_session_file(&log_path, &SchemaUniverse::empty()).unwrap();
    // Two degraded-to-empty queries: defined contracts, no NaN anywhere.
    assert_eq!(report.cohesion.jaccard_index, 1.0);
    assert_eq!(report.cohesion.common_tables_index, 0.0);
    for value in report.to_metric_map().values() {
        assert!(value.is_finite());
    }
}
