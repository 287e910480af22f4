//! Builds parameterized SELECT, INSERT, UPDATE, DELETE statements.
//!
//! All four builders are pure: table and column names go into the SQL text
//! verbatim (callers must have validated them), every value becomes a `$n`
//! placeholder with the matching entry in `params`. When `types` carries a
//! column's catalog type the placeholder is cast to it (`$n::date`), so
//! text-typed binds reach date, numeric, and boolean columns. None of the
//! builders checks for empty inputs; that discipline lives in the repository.

use serde_json::Value;
use std::collections::HashMap;

pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<Value>,
}

impl QueryBuf {
    fn new() -> Self {
        QueryBuf {
            sql: String::new(),
            params: Vec::new(),
        }
    }

    fn push_param(&mut self, v: Value) -> usize {
        self.params.push(v);
        self.params.len()
    }
}

/// Next placeholder for `col`, cast to its catalog type when known.
fn placeholder(q: &mut QueryBuf, col: &str, val: &Value, types: &HashMap<String, String>) -> String {
    let n = q.push_param(val.clone());
    match types.get(col) {
        Some(t) => format!("${}::{}", n, t),
        None => format!("${}", n),
    }
}

/// `WHERE c1 = $n AND c2 = $n+1 ...` with params appended to `q`, or empty
/// string when there are no conditions. Placeholder numbering continues from
/// whatever `q` already holds.
fn where_clause(
    q: &mut QueryBuf,
    conditions: &[(String, Value)],
    types: &HashMap<String, String>,
) -> String {
    if conditions.is_empty() {
        return String::new();
    }
    let parts: Vec<String> = conditions
        .iter()
        .map(|(col, val)| {
            let ph = placeholder(q, col, val, types);
            format!("{} = {}", col, ph)
        })
        .collect();
    format!(" WHERE {}", parts.join(" AND "))
}

/// `SELECT <columns> FROM <table> [WHERE ...]`. One placeholder per condition,
/// in slice order.
pub fn build_select(
    table: &str,
    conditions: &[(String, Value)],
    columns: &[&str],
    types: &HashMap<String, String>,
) -> QueryBuf {
    let mut q = QueryBuf::new();
    let cols = if columns.is_empty() {
        "*".to_string()
    } else {
        columns.join(", ")
    };
    let where_sql = where_clause(&mut q, conditions, types);
    q.sql = format!("SELECT {} FROM {}{}", cols, table, where_sql);
    q
}

/// `INSERT INTO <table> (k1, ...) VALUES ($1, ...) RETURNING *`.
pub fn build_insert(table: &str, data: &[(String, Value)], types: &HashMap<String, String>) -> QueryBuf {
    let mut q = QueryBuf::new();
    let mut cols = Vec::with_capacity(data.len());
    let mut placeholders = Vec::with_capacity(data.len());
    for (col, val) in data {
        let ph = placeholder(&mut q, col, val, types);
        cols.push(col.as_str());
        placeholders.push(ph);
    }
    q.sql = format!(
        "INSERT INTO {} ({}) VALUES ({}) RETURNING *",
        table,
        cols.join(", "),
        placeholders.join(", ")
    );
    q
}

/// `UPDATE <table> SET k1 = $1, ... WHERE c1 = $n+1 ... RETURNING *`.
/// Condition placeholders continue numbering after the data placeholders;
/// params are data values followed by condition values.
pub fn build_update(
    table: &str,
    data: &[(String, Value)],
    conditions: &[(String, Value)],
    types: &HashMap<String, String>,
) -> QueryBuf {
    let mut q = QueryBuf::new();
    let sets: Vec<String> = data
        .iter()
        .map(|(col, val)| {
            let ph = placeholder(&mut q, col, val, types);
            format!("{} = {}", col, ph)
        })
        .collect();
    let where_sql = where_clause(&mut q, conditions, types);
    q.sql = format!(
        "UPDATE {} SET {}{} RETURNING *",
        table,
        sets.join(", "),
        where_sql
    );
    q
}

/// `DELETE FROM <table> WHERE c1 = $1 AND ...`.
pub fn build_delete(
    table: &str,
    conditions: &[(String, Value)],
    types: &HashMap<String, String>,
) -> QueryBuf {
    let mut q = QueryBuf::new();
    let where_sql = where_clause(&mut q, conditions, types);
    q.sql = format!("DELETE FROM {}{}", table, where_sql);
    q
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn pairs(items: &[(&str, Value)]) -> Vec<(String, Value)> {
        items.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
    }

    fn no_types() -> HashMap<String, String> {
        HashMap::new()
    }

    fn types(items: &[(&str, &str)]) -> HashMap<String, String> {
        items
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn select_without_conditions() {
        let q = build_select("property", &[], &["*"], &no_types());
        assert_eq!(q.sql, "SELECT * FROM property");
        assert!(q.params.is_empty());
    }

    #[test]
    fn select_with_conditions_in_order() {
        let conds = pairs(&[("status", json!("listed")), ("address", json!("Baner"))]);
        let q = build_select("property", &conds, &["id", "status"], &no_types());
        assert_eq!(
            q.sql,
            "SELECT id, status FROM property WHERE status = $1 AND address = $2"
        );
        assert_eq!(q.params, vec![json!("listed"), json!("Baner")]);
    }

    #[test]
    fn insert_returns_all_columns() {
        let data = pairs(&[("property_name", json!("A")), ("price_in_cr", json!(1.5))]);
        let q = build_insert("property", &data, &no_types());
        assert_eq!(
            q.sql,
            "INSERT INTO property (property_name, price_in_cr) VALUES ($1, $2) RETURNING *"
        );
        assert_eq!(q.params, vec![json!("A"), json!(1.5)]);
    }

    #[test]
    fn insert_casts_placeholders_to_catalog_types() {
        let data = pairs(&[
            ("property_name", json!("B")),
            ("listed_date", json!("2024-06-01")),
            ("price_in_cr", json!("1.5")),
        ]);
        let ty = types(&[
            ("property_name", "text"),
            ("listed_date", "date"),
            ("price_in_cr", "numeric"),
        ]);
        let q = build_insert("property", &data, &ty);
        assert_eq!(
            q.sql,
            "INSERT INTO property (property_name, listed_date, price_in_cr) \
             VALUES ($1::text, $2::date, $3::numeric) RETURNING *"
        );
        assert_eq!(q.params, vec![json!("B"), json!("2024-06-01"), json!("1.5")]);
    }

    #[test]
    fn cast_handles_multi_word_catalog_types() {
        let data = pairs(&[("status", json!("listed"))]);
        let ty = types(&[("status", "character varying")]);
        let q = build_insert("property", &data, &ty);
        assert_eq!(
            q.sql,
            "INSERT INTO property (status) VALUES ($1::character varying) RETURNING *"
        );
    }

    #[test]
    fn update_numbering_continues_across_clauses() {
        let data = pairs(&[("a", json!(1)), ("b", json!(2))]);
        let conds = pairs(&[("id", json!(5))]);
        let q = build_update("t", &data, &conds, &no_types());
        assert_eq!(q.sql, "UPDATE t SET a = $1, b = $2 WHERE id = $3 RETURNING *");
        assert_eq!(q.params, vec![json!(1), json!(2), json!(5)]);
    }

    #[test]
    fn update_casts_string_values_for_typed_columns() {
        let data = pairs(&[("price_in_cr", json!("2.25"))]);
        let conds = pairs(&[("id", json!(5))]);
        let ty = types(&[("price_in_cr", "numeric"), ("id", "integer")]);
        let q = build_update("property", &data, &conds, &ty);
        assert_eq!(
            q.sql,
            "UPDATE property SET price_in_cr = $1::numeric WHERE id = $2::integer RETURNING *"
        );
        assert_eq!(q.params, vec![json!("2.25"), json!(5)]);
    }

    #[test]
    fn delete_by_id() {
        let conds = pairs(&[("id", json!(7))]);
        let q = build_delete("property", &conds, &no_types());
        assert_eq!(q.sql, "DELETE FROM property WHERE id = $1");
        assert_eq!(q.params, vec![json!(7)]);
    }
}
