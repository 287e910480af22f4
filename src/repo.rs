//! Row CRUD and column DDL against the live table.
//!
//! Every row operation re-reads the column set from the catalog and filters
//! request fields against it, so a column added a moment ago is usable
//! immediately. The add-column existence pre-check is not atomic with the DDL;
//! two concurrent adds of the same name race and the loser surfaces the
//! database error.

use crate::error::AppError;
use crate::ident::validate_identifier;
use crate::schema::{self, ColumnInfo};
use crate::sql::{
    build_add_column, build_delete, build_drop_column, build_insert, build_rename_column,
    build_select, build_update, PgBindValue, QueryBuf,
};
use serde_json::{json, Map, Value};
use sqlx::PgPool;
use std::collections::HashMap;

#[derive(Clone)]
pub struct PropertyRepo {
    pool: PgPool,
    table: String,
}

impl PropertyRepo {
    pub fn new(pool: PgPool, table: impl Into<String>) -> Result<Self, AppError> {
        let table = table.into();
        validate_identifier(&table)?;
        Ok(PropertyRepo { pool, table })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// All rows, as JSON objects keyed by column name.
    pub async fn fetch_all(&self) -> Result<Vec<Value>, AppError> {
        let q = build_select(&self.table, &[], &["*"], &HashMap::new());
        self.query_many(&q).await
    }

    /// One row by identifier, or None.
    pub async fn fetch_by_id(&self, id: i64) -> Result<Option<Value>, AppError> {
        let q = build_select(&self.table, &[("id".into(), json!(id))], &["*"], &HashMap::new());
        self.query_opt(&q).await
    }

    /// Insert a row. Fields outside the current column set are dropped; if
    /// nothing survives the filter, errors without touching the database.
    pub async fn insert(&self, row: &Map<String, Value>) -> Result<Value, AppError> {
        if row.is_empty() {
            return Err(AppError::NoValidColumns);
        }
        let (names, types) = self.column_map().await?;
        let data = filter_to_columns(row, &names);
        if data.is_empty() {
            return Err(AppError::NoValidColumns);
        }
        let q = build_insert(&self.table, &data, &types);
        self.query_opt(&q)
            .await?
            .ok_or(AppError::Db(sqlx::Error::RowNotFound))
    }

    /// Partial update by identifier, same filtering discipline as insert.
    /// Returns None when no row matched.
    pub async fn update(&self, id: i64, changes: &Map<String, Value>) -> Result<Option<Value>, AppError> {
        if changes.is_empty() {
            return Err(AppError::NoValidColumns);
        }
        let (names, types) = self.column_map().await?;
        let data = filter_to_columns(changes, &names);
        if data.is_empty() {
            return Err(AppError::NoValidColumns);
        }
        let q = build_update(&self.table, &data, &[("id".into(), json!(id))], &types);
        self.query_opt(&q).await
    }

    /// Delete by identifier. Succeeds even when no row matched.
    pub async fn remove(&self, id: i64) -> Result<(), AppError> {
        let q = build_delete(&self.table, &[("id".into(), json!(id))], &HashMap::new());
        self.execute(&q).await?;
        Ok(())
    }

    /// Add a column. Errors when the name is already present (no DDL issued),
    /// the name is not a valid identifier, or the type is off the whitelist.
    pub async fn add_column(&self, name: &str, ty: &str) -> Result<(), AppError> {
        validate_identifier(name)?;
        let columns = schema::column_names(&self.pool, &self.table).await?;
        ensure_column_absent(&columns, name)?;
        let ddl = build_add_column(&self.table, name, ty)?;
        tracing::debug!(sql = %ddl, "ddl");
        sqlx::query(&ddl).execute(&self.pool).await?;
        Ok(())
    }

    /// Rename a column. No existence pre-check; a missing column surfaces as a
    /// database error.
    pub async fn rename_column(&self, old: &str, new: &str) -> Result<(), AppError> {
        let ddl = build_rename_column(&self.table, old, new)?;
        tracing::debug!(sql = %ddl, "ddl");
        sqlx::query(&ddl).execute(&self.pool).await?;
        Ok(())
    }

    /// Drop a column. No existence pre-check.
    pub async fn drop_column(&self, name: &str) -> Result<(), AppError> {
        let ddl = build_drop_column(&self.table, name)?;
        tracing::debug!(sql = %ddl, "ddl");
        sqlx::query(&ddl).execute(&self.pool).await?;
        Ok(())
    }

    /// Current `(column_name, data_type)` pairs from the catalog.
    pub async fn list_columns(&self) -> Result<Vec<ColumnInfo>, AppError> {
        schema::get_columns(&self.pool, &self.table).await
    }

    /// Column names (catalog order) and a name → data_type map for placeholder
    /// casts, from one catalog read.
    async fn column_map(&self) -> Result<(Vec<String>, HashMap<String, String>), AppError> {
        let columns = schema::get_columns(&self.pool, &self.table).await?;
        let names = columns.iter().map(|c| c.column_name.clone()).collect();
        let types = columns
            .into_iter()
            .map(|c| (c.column_name, c.data_type))
            .collect();
        Ok((names, types))
    }

    async fn query_many(&self, q: &QueryBuf) -> Result<Vec<Value>, AppError> {
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let mut query = sqlx::query(&q.sql);
        for p in &q.params {
            query = query.bind(PgBindValue::from_json(p));
        }
        let rows = query.fetch_all(&self.pool).await?;
        Ok(rows.iter().map(row_to_json).collect())
    }

    async fn query_opt(&self, q: &QueryBuf) -> Result<Option<Value>, AppError> {
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let mut query = sqlx::query(&q.sql);
        for p in &q.params {
            query = query.bind(PgBindValue::from_json(p));
        }
        let row = query.fetch_optional(&self.pool).await?;
        Ok(row.map(|r| row_to_json(&r)))
    }

    async fn execute(&self, q: &QueryBuf) -> Result<u64, AppError> {
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let mut query = sqlx::query(&q.sql);
        for p in &q.params {
            query = query.bind(PgBindValue::from_json(p));
        }
        let done = query.execute(&self.pool).await?;
        Ok(done.rows_affected())
    }
}

/// Keep only entries whose key is a current column.
fn filter_to_columns(body: &Map<String, Value>, columns: &[String]) -> Vec<(String, Value)> {
    body.iter()
        .filter(|(k, _)| columns.iter().any(|c| c == *k))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

/// The add-column pre-check: an existing name errors before any DDL is built.
fn ensure_column_absent(columns: &[String], name: &str) -> Result<(), AppError> {
    if columns.iter().any(|c| c == name) {
        return Err(AppError::ColumnExists(name.to_string()));
    }
    Ok(())
}

fn row_to_json(row: &sqlx::postgres::PgRow) -> Value {
    use sqlx::{Column, Row};
    let mut map = serde_json::Map::new();
    for col in row.columns() {
        let name = col.name();
        map.insert(name.to_string(), cell_to_value(row, name));
    }
    Value::Object(map)
}

fn cell_to_value(row: &sqlx::postgres::PgRow, name: &str) -> Value {
    use sqlx::Row;
    if let Ok(Some(n)) = row.try_get::<Option<i16>, _>(name) {
        return Value::Number(n.into());
    }
    if let Ok(Some(n)) = row.try_get::<Option<i32>, _>(name) {
        return Value::Number(n.into());
    }
    if let Ok(Some(n)) = row.try_get::<Option<i64>, _>(name) {
        return Value::Number(n.into());
    }
    if let Ok(Some(n)) = row.try_get::<Option<f64>, _>(name) {
        if let Some(n) = serde_json::Number::from_f64(n) {
            return Value::Number(n);
        }
    }
    // NUMERIC comes back as a string so precision survives the trip.
    if let Ok(Some(d)) = row.try_get::<Option<rust_decimal::Decimal>, _>(name) {
        return Value::String(d.to_string());
    }
    if let Ok(Some(b)) = row.try_get::<Option<bool>, _>(name) {
        return Value::Bool(b);
    }
    if let Ok(Some(d)) = row.try_get::<Option<chrono::DateTime<chrono::Utc>>, _>(name) {
        return Value::String(d.to_rfc3339());
    }
    if let Ok(Some(d)) = row.try_get::<Option<chrono::NaiveDateTime>, _>(name) {
        return Value::String(d.format("%Y-%m-%dT%H:%M:%S%.f").to_string());
    }
    if let Ok(Some(d)) = row.try_get::<Option<chrono::NaiveDate>, _>(name) {
        return Value::String(d.format("%Y-%m-%d").to_string());
    }
    if let Ok(Some(s)) = row.try_get::<Option<String>, _>(name) {
        return Value::String(s);
    }
    if let Ok(Some(j)) = row.try_get::<Option<serde_json::Value>, _>(name) {
        return j;
    }
    Value::Null
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn body(v: Value) -> Map<String, Value> {
        match v {
            Value::Object(m) => m,
            _ => unreachable!(),
        }
    }

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn unknown_keys_are_dropped() {
        let b = body(json!({"property_name": "X", "bogus": "Y"}));
        let filtered = filter_to_columns(&b, &cols(&["id", "property_name"]));
        assert_eq!(filtered, vec![("property_name".to_string(), json!("X"))]);
    }

    #[test]
    fn all_unknown_keys_filter_to_empty() {
        let b = body(json!({"bogus": 1, "also_bogus": 2}));
        assert!(filter_to_columns(&b, &cols(&["id", "property_name"])).is_empty());
    }

    #[test]
    fn empty_body_filters_to_empty() {
        let b = body(json!({}));
        assert!(filter_to_columns(&b, &cols(&["id"])).is_empty());
    }

    #[test]
    fn known_keys_pass_through_with_values() {
        let b = body(json!({"price_in_cr": 1.5, "status": "listed"}));
        let filtered = filter_to_columns(&b, &cols(&["price_in_cr", "status"]));
        assert_eq!(filtered.len(), 2);
        assert!(filtered.contains(&("price_in_cr".to_string(), json!(1.5))));
        assert!(filtered.contains(&("status".to_string(), json!("listed"))));
    }

    #[test]
    fn existing_column_fails_the_add_pre_check() {
        let existing = cols(&["id", "property_name", "status"]);
        let err = ensure_column_absent(&existing, "status").unwrap_err();
        assert!(matches!(err, AppError::ColumnExists(name) if name == "status"));
    }

    #[test]
    fn absent_column_passes_the_add_pre_check() {
        let existing = cols(&["id", "property_name"]);
        assert!(ensure_column_absent(&existing, "broker_fee").is_ok());
    }
}
