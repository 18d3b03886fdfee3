// crates/core/src/schema.rs
//! The reference universe of coverable fragments for one database.
//!
//! Tables and columns come from a schema description supplied externally,
//! either as JSON (`{"tables": {"<table>": ["<col>", ...]}}`) or as a DDL
//! script of `CREATE TABLE` statements (SQLite dumps). The aggregation and
//! clause denominators are fixed inventories and live on
//! [`AggregateOp::ALL`](crate::fragments::AggregateOp::ALL) /
//! [`ClauseKind::ALL`](crate::fragments::ClauseKind::ALL).
//!
//! Column names are pooled into one bare-name set across tables: a column
//! name shared by two tables counts once, matching the coverage
//! denominator definition.

use std::collections::BTreeSet;
use std::path::Path;

use serde::Deserialize;
use sqlparser::ast::Statement;
use sqlparser::dialect::SQLiteDialect;
use sqlparser::parser::Parser;

use crate::error::SchemaError;

/// Declared tables and columns of one database, lower-cased.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaUniverse {
    pub tables: BTreeSet<String>,
    pub columns: BTreeSet<String>,
}

/// JSON schema file shape.
#[derive(Deserialize)]
struct SchemaFile {
    #[serde(default)]
    tables: std::collections::BTreeMap<String, Vec<String>>,
}

impl SchemaUniverse {
    /// The degenerate universe: every coverage ratio over it is 0.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build from an in-memory table → columns description.
    pub fn from_tables<T, C, I>(tables: I) -> Self
    where
        I: IntoIterator<Item = (T, Vec<C>)>,
        T: AsRef<str>,
        C: AsRef<str>,
    {
        let mut universe = Self::default();
        for (table, columns) in tables {
            universe.tables.insert(table.as_ref().to_lowercase());
            for column in columns {
                universe.columns.insert(column.as_ref().to_lowercase());
            }
        }
        universe
    }

    /// Parse the JSON schema form.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        let file: SchemaFile = serde_json::from_str(json)?;
        Ok(Self::from_tables(file.tables))
    }

    /// Parse a DDL script: every `CREATE TABLE` statement contributes its
    /// table name and column names. Constraint clauses are not columns.
    pub fn from_ddl_str(ddl: &str) -> Result<Self, sqlparser::parser::ParserError> {
        let statements = Parser::parse_sql(&SQLiteDialect {}, ddl)?;
        let mut universe = Self::default();
        for statement in statements {
            if let Statement::CreateTable(create) = statement {
                if let Some(name) = create.name.0.last() {
                    universe.tables.insert(name.value.to_lowercase());
                }
                for column in &create.columns {
                    universe.columns.insert(column.name.value.to_lowercase());
                }
            }
        }
        Ok(universe)
    }

    /// Load a schema file, selecting JSON vs DDL by extension.
    pub fn load(path: &Path) -> Result<Self, SchemaError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase());
        match extension.as_deref() {
            Some("json") => {
                let contents =
                    std::fs::read_to_string(path).map_err(|e| SchemaError::io(path, e))?;
                Self::from_json_str(&contents).map_err(|e| SchemaError::MalformedJson {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })
            }
            Some("sql") => {
                let contents =
                    std::fs::read_to_string(path).map_err(|e| SchemaError::io(path, e))?;
                Self::from_ddl_str(&contents).map_err(|e| SchemaError::MalformedDdl {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })
            }
            _ => Err(SchemaError::UnsupportedFormat {
                path: path.to_path_buf(),
            }),
        }
    }
}
