// crates/core/src/extract/relations.rs
//! Structural pass: referenced tables and columns via the SQL AST.
//!
//! Parses with sqlparser's GenericDialect and walks the AST collecting
//! table references (aliases resolved to canonical names, CTE names
//! excluded) and column references. Column identity rules:
//!
//! - unqualified references stay bare: `name`
//! - qualified references resolve the alias: `a.age` with `FROM t a`
//!   becomes `t.age`
//! - wildcards are recorded as `*` / `table.*`
//! - `COUNT(*)`'s argument wildcard is an argument, not a projection
//!
//! All identifiers are lower-cased. Column references are collected raw
//! during the walk and resolved afterwards, so aliases defined later in
//! the statement (FROM comes after SELECT in source order) still apply.

use std::collections::{BTreeSet, HashMap, HashSet};

use sqlparser::ast::{
    Cte, Expr, FunctionArg, FunctionArgExpr, FunctionArguments, GroupByExpr, Join,
    JoinConstraint, JoinOperator, Query, Select, SelectItem, SetExpr, Statement, TableFactor,
    TableWithJoins,
};
use sqlparser::dialect::GenericDialect;
use sqlparser::parser::{Parser, ParserError};

/// Tables and columns referenced by one SQL string (all statements pooled).
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Relations {
    pub tables: BTreeSet<String>,
    pub columns: BTreeSet<String>,
}

/// Parse `sql` and collect its table/column references.
///
/// Errors surface to [`crate::extract::extract`], which degrades them to
/// the all-empty fragment set.
pub fn extract_relations(sql: &str) -> Result<Relations, ParserError> {
    let statements = Parser::parse_sql(&GenericDialect {}, sql)?;
    let mut walker = Walker::default();
    for statement in &statements {
        walker.statement(statement);
    }
    Ok(walker.finish())
}

/// A column reference as seen during the walk, before alias resolution.
enum ColumnRef {
    Bare(String),
    Qualified(String, String),
    Wildcard,
    QualifiedWildcard(String),
}

#[derive(Default)]
struct Walker {
    /// alias (or canonical name) → canonical table name, lower-cased.
    aliases: HashMap<String, String>,
    /// CTE names; referenced as tables but not part of the schema surface.
    ctes: HashSet<String>,
    tables: BTreeSet<String>,
    columns: Vec<ColumnRef>,
}

fn lower(ident: &sqlparser::ast::Ident) -> String {
    ident.value.to_lowercase()
}

impl Walker {
    fn finish(self) -> Relations {
        let mut columns = BTreeSet::new();
        for column in self.columns {
            match column {
                ColumnRef::Bare(name) => {
                    columns.insert(name);
                }
                ColumnRef::Qualified(qualifier, name) => {
                    let table = self
                        .aliases
                        .get(&qualifier)
                        .cloned()
                        .unwrap_or(qualifier);
                    columns.insert(format!("{table}.{name}"));
                }
                ColumnRef::Wildcard => {
                    columns.insert("*".to_string());
                }
                ColumnRef::QualifiedWildcard(qualifier) => {
                    let table = self
                        .aliases
                        .get(&qualifier)
                        .cloned()
                        .unwrap_or(qualifier);
                    columns.insert(format!("{table}.*"));
                }
            }
        }
        Relations {
            tables: self.tables,
            columns,
        }
    }

    fn statement(&mut self, statement: &Statement) {
        if let Statement::Query(query) = statement {
            self.query(query);
        }
    }

    fn query(&mut self, query: &Query) {
        if let Some(with) = &query.with {
            for cte in &with.cte_tables {
                self.cte(cte);
            }
        }
        self.set_expr(&query.body);
        if let Some(order_by) = &query.order_by {
            for order_expr in &order_by.exprs {
                self.expr(&order_expr.expr);
            }
        }
        if let Some(limit) = &query.limit {
            self.expr(limit);
        }
        if let Some(offset) = &query.offset {
            self.expr(&offset.value);
        }
    }

    fn cte(&mut self, cte: &Cte) {
        self.ctes.insert(lower(&cte.alias.name));
        self.query(&cte.query);
    }

    fn set_expr(&mut self, set_expr: &SetExpr) {
        match set_expr {
            SetExpr::Select(select) => self.select(select),
            SetExpr::Query(query) => self.query(query),
            SetExpr::SetOperation { left, right, .. } => {
                self.set_expr(left);
                self.set_expr(right);
            }
            SetExpr::Values(values) => {
                for row in &values.rows {
                    for expr in row {
                        self.expr(expr);
                    }
                }
            }
            _ => {}
        }
    }

    fn select(&mut self, select: &Select) {
        for table_with_joins in &select.from {
            self.table_with_joins(table_with_joins);
        }
        for item in &select.projection {
            match item {
                SelectItem::UnnamedExpr(expr) => self.expr(expr),
                SelectItem::ExprWithAlias { expr, .. } => self.expr(expr),
                SelectItem::Wildcard(_) => self.columns.push(ColumnRef::Wildcard),
                SelectItem::QualifiedWildcard(name, _) => {
                    if let Some(last) = name.0.last() {
                        self.columns.push(ColumnRef::QualifiedWildcard(lower(last)));
                    }
                }
            }
        }
        if let Some(selection) = &select.selection {
            self.expr(selection);
        }
        if let GroupByExpr::Expressions(exprs, _) = &select.group_by {
            for expr in exprs {
                self.expr(expr);
            }
        }
        if let Some(having) = &select.having {
            self.expr(having);
        }
        for expr in &select.sort_by {
            self.expr(expr);
        }
    }

    fn table_with_joins(&mut self, table_with_joins: &TableWithJoins) {
        self.table_factor(&table_with_joins.relation);
        for join in &table_with_joins.joins {
            self.join(join);
        }
    }

    fn join(&mut self, join: &Join) {
        self.table_factor(&join.relation);
        let constraint = match &join.join_operator {
            JoinOperator::Inner(c)
            | JoinOperator::LeftOuter(c)
            | JoinOperator::RightOuter(c)
            | JoinOperator::FullOuter(c)
            | JoinOperator::LeftSemi(c)
            | JoinOperator::RightSemi(c)
            | JoinOperator::LeftAnti(c)
            | JoinOperator::RightAnti(c) => Some(c),
            _ => None,
        };
        match constraint {
            Some(JoinConstraint::On(expr)) => self.expr(expr),
            Some(JoinConstraint::Using(idents)) => {
                for ident in idents {
                    self.columns.push(ColumnRef::Bare(lower(ident)));
                }
            }
            _ => {}
        }
    }

    fn table_factor(&mut self, factor: &TableFactor) {
        match factor {
            TableFactor::Table { name, alias, .. } => {
                let Some(last) = name.0.last() else { return };
                let table = lower(last);
                if !self.ctes.contains(&table) {
                    self.tables.insert(table.clone());
                    self.aliases.insert(table.clone(), table.clone());
                }
                if let Some(alias) = alias {
                    self.aliases.insert(lower(&alias.name), table);
                }
            }
            TableFactor::Derived {
                subquery, alias, ..
            } => {
                self.query(subquery);
                // A derived table's alias resolves to itself: its columns
                // are not schema columns of any real table.
                if let Some(alias) = alias {
                    let name = lower(&alias.name);
                    self.aliases.insert(name.clone(), name);
                }
            }
            TableFactor::NestedJoin {
                table_with_joins, ..
            } => self.table_with_joins(table_with_joins),
            _ => {}
        }
    }

    fn expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Identifier(ident) => self.columns.push(ColumnRef::Bare(lower(ident))),
            Expr::CompoundIdentifier(parts) => {
                if parts.len() >= 2 {
                    let qualifier = lower(&parts[parts.len() - 2]);
                    let column = lower(&parts[parts.len() - 1]);
                    self.columns.push(ColumnRef::Qualified(qualifier, column));
                } else if let Some(only) = parts.last() {
                    self.columns.push(ColumnRef::Bare(lower(only)));
                }
            }
            Expr::BinaryOp { left, right, .. } => {
                self.expr(left);
                self.expr(right);
            }
            Expr::UnaryOp { expr, .. } => self.expr(expr),
            Expr::Nested(inner) => self.expr(inner),
            Expr::IsNull(inner)
            | Expr::IsNotNull(inner)
            | Expr::IsTrue(inner)
            | Expr::IsNotTrue(inner)
            | Expr::IsFalse(inner)
            | Expr::IsNotFalse(inner)
            | Expr::IsUnknown(inner)
            | Expr::IsNotUnknown(inner) => self.expr(inner),
            Expr::IsDistinctFrom(left, right) | Expr::IsNotDistinctFrom(left, right) => {
                self.expr(left);
                self.expr(right);
            }
            Expr::InList { expr, list, .. } => {
                self.expr(expr);
                for item in list {
                    self.expr(item);
                }
            }
            Expr::InSubquery { expr, subquery, .. } => {
                self.expr(expr);
                self.query(subquery);
            }
            Expr::Between {
                expr, low, high, ..
            } => {
                self.expr(expr);
                self.expr(low);
                self.expr(high);
            }
            Expr::Like { expr, pattern, .. }
            | Expr::ILike { expr, pattern, .. }
            | Expr::SimilarTo { expr, pattern, .. } => {
                self.expr(expr);
                self.expr(pattern);
            }
            Expr::Cast { expr, .. } => self.expr(expr),
            Expr::Function(function) => self.function_args(&function.args),
            Expr::Case {
                operand,
                conditions,
                results,
                else_result,
                ..
            } => {
                if let Some(operand) = operand {
                    self.expr(operand);
                }
                for condition in conditions {
                    self.expr(condition);
                }
                for result in results {
                    self.expr(result);
                }
                if let Some(else_result) = else_result {
                    self.expr(else_result);
                }
            }
            Expr::Exists { subquery, .. } => self.query(subquery),
            Expr::Subquery(subquery) => self.query(subquery),
            Expr::Tuple(exprs) => {
                for item in exprs {
                    self.expr(item);
                }
            }
            _ => {}
        }
    }

    fn function_args(&mut self, args: &FunctionArguments) {
        match args {
            FunctionArguments::List(list) => {
                for arg in &list.args {
                    let payload = match arg {
                        FunctionArg::Unnamed(payload) => payload,
                        FunctionArg::Named { arg, .. } => arg,
                    };
                    // Wildcard arguments (COUNT(*)) are not projections.
                    if let FunctionArgExpr::Expr(expr) = payload {
                        self.expr(expr);
                    }
                }
            }
            FunctionArguments::Subquery(subquery) => self.query(subquery),
            FunctionArguments::None => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn relations(sql: &str) -> Relations {
        extract_relations(sql).expect("valid SQL")
    }

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_simple_select() {
        let r = relations("SELECT name FROM customers");
        assert_eq!(r.tables, set(&["customers"]));
        assert_eq!(r.columns, set(&["name"]));
    }

    #[test]
    fn test_identifiers_lowercased() {
        let r = relations("SELECT Name, AGE FROM Customers");
        assert_eq!(r.tables, set(&["customers"]));
        assert_eq!(r.columns, set(&["name", "age"]));
    }

    #[test]
    fn test_alias_resolved_to_table() {
        let r = relations("SELECT c.name FROM customers c WHERE c.age > 30");
        assert_eq!(r.tables, set(&["customers"]));
        assert_eq!(r.columns, set(&["customers.name", "customers.age"]));
    }

    #[test]
    fn test_join_aliases_resolved() {
        let r = relations(
            "SELECT c.name, o.total FROM customers AS c JOIN orders AS o ON c.id = o.customer_id",
        );
        assert_eq!(r.tables, set(&["customers", "orders"]));
        assert_eq!(
            r.columns,
            set(&[
                "customers.name",
                "customers.id",
                "orders.total",
                "orders.customer_id"
            ])
        );
    }

    #[test]
    fn test_join_using_columns() {
        let r = relations("SELECT name FROM a JOIN b USING (id)");
        assert_eq!(r.tables, set(&["a", "b"]));
        assert_eq!(r.columns, set(&["name", "id"]));
    }

    #[test]
    fn test_wildcard_projection() {
        let r = relations("SELECT * FROM t");
        assert_eq!(r.columns, set(&["*"]));
    }

    #[test]
    fn test_qualified_wildcard_resolves_alias() {
        let r = relations("SELECT a.* FROM accounts a");
        assert_eq!(r.tables, set(&["accounts"]));
        assert_eq!(r.columns, set(&["accounts.*"]));
    }

    #[test]
    fn test_count_star_contributes_no_column() {
        let r = relations("SELECT COUNT(*) FROM orders");
        assert_eq!(r.tables, set(&["orders"]));
        assert!(r.columns.is_empty());
    }

    #[test]
    fn test_aggregate_argument_is_a_column() {
        let r = relations("SELECT AVG(age) FROM people");
        assert_eq!(r.columns, set(&["age"]));
    }

    #[test]
    fn test_group_and_order_columns_collected() {
        let r = relations("SELECT city FROM t GROUP BY city, region ORDER BY pop");
        assert_eq!(r.columns, set(&["city", "region", "pop"]));
    }

    #[test]
    fn test_cte_name_is_not_a_table() {
        let r = relations(
            "WITH recent AS (SELECT id FROM orders WHERE ts > 5) SELECT id FROM recent",
        );
        assert_eq!(r.tables, set(&["orders"]));
        assert!(r.columns.contains("id"));
    }

    #[test]
    fn test_subquery_tables_collected() {
        let r = relations("SELECT name FROM t WHERE id IN (SELECT id FROM u)");
        assert_eq!(r.tables, set(&["t", "u"]));
    }

    #[test]
    fn test_derived_table_alias_not_resolved_to_schema_table() {
        let r = relations("SELECT d.total FROM (SELECT SUM(x) AS total FROM raw) d");
        assert_eq!(r.tables, set(&["raw"]));
        assert!(r.columns.contains("d.total"));
        assert!(r.columns.contains("x"));
    }

    #[test]
    fn test_union_pools_both_sides() {
        let r = relations("SELECT a FROM t UNION SELECT b FROM u");
        assert_eq!(r.tables, set(&["t", "u"]));
        assert_eq!(r.columns, set(&["a", "b"]));
    }

    #[test]
    fn test_multi_statement_pools_fragments() {
        let r = relations("SELECT a FROM t; SELECT b FROM u");
        assert_eq!(r.tables, set(&["t", "u"]));
        assert_eq!(r.columns, set(&["a", "b"]));
    }

    #[test]
    fn test_case_and_between_columns() {
        let r = relations(
            "SELECT CASE WHEN age BETWEEN lo AND hi THEN grade ELSE fallback END FROM t",
        );
        assert_eq!(r.columns, set(&["age", "lo", "hi", "grade", "fallback"]));
    }

    #[test]
    fn test_malformed_sql_is_an_error() {
        assert!(extract_relations("SELECT FROM WHERE (").is_err());
        assert!(extract_relations("not sql at all ((").is_err());
    }
}
