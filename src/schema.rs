//! Baseline schema, catalog access, and startup reconciliation.
//!
//! The database catalog is the only source of truth for the table's shape.
//! Reconciliation is additive: missing baseline columns are added, nothing is
//! ever dropped or renamed here.

use crate::error::AppError;
use crate::ident::validate_identifier;
use crate::sql::{build_add_column, build_get_columns};
use serde::Serialize;
use sqlx::{ConnectOptions, PgPool};
use std::collections::HashSet;
use std::str::FromStr;

/// The one table this service fronts.
pub const PROPERTY_TABLE: &str = "property";

/// Columns the table must contain, reconciled at startup. The `id` identifier
/// column is created with the table and is not part of this list.
pub const BASELINE_COLUMNS: &[(&str, &str)] = &[
    ("property_name", "TEXT"),
    ("address", "TEXT"),
    ("area_in_sqft", "NUMERIC"),
    ("price_in_cr", "NUMERIC"),
    ("listed_date", "DATE"),
    ("status", "TEXT"),
    ("earnings", "NUMERIC"),
];

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ColumnInfo {
    pub column_name: String,
    pub data_type: String,
}

/// Current columns of `table`, in catalog order.
pub async fn get_columns(pool: &PgPool, table: &str) -> Result<Vec<ColumnInfo>, AppError> {
    let cols = sqlx::query_as::<_, ColumnInfo>(build_get_columns())
        .bind(table)
        .fetch_all(pool)
        .await?;
    Ok(cols)
}

/// Current column names of `table`, in catalog order.
pub async fn column_names(pool: &PgPool, table: &str) -> Result<Vec<String>, AppError> {
    Ok(get_columns(pool, table)
        .await?
        .into_iter()
        .map(|c| c.column_name)
        .collect())
}

/// Baseline columns not present in `existing`, in baseline order.
fn missing_baseline(existing: &HashSet<String>) -> Vec<(&'static str, &'static str)> {
    BASELINE_COLUMNS
        .iter()
        .filter(|(name, _)| !existing.contains(*name))
        .copied()
        .collect()
}

/// Idempotent startup reconciliation. Creates the table with the baseline
/// schema if absent; otherwise adds any missing baseline columns. A failure to
/// add one column is logged and does not stop the remaining columns; a failed
/// existence check or CREATE TABLE aborts with Err.
pub async fn ensure_schema(pool: &PgPool, table: &str) -> Result<(), AppError> {
    validate_identifier(table)?;
    let exists: (bool,) = sqlx::query_as(
        "SELECT EXISTS(SELECT 1 FROM information_schema.tables \
         WHERE table_schema = 'public' AND table_name = $1)",
    )
    .bind(table)
    .fetch_one(pool)
    .await?;

    if !exists.0 {
        let mut col_defs = vec!["id SERIAL PRIMARY KEY".to_string()];
        col_defs.extend(
            BASELINE_COLUMNS
                .iter()
                .map(|(name, ty)| format!("{} {}", name, ty)),
        );
        let ddl = format!("CREATE TABLE {} (\n  {}\n)", table, col_defs.join(",\n  "));
        sqlx::query(&ddl).execute(pool).await?;
        tracing::info!(table, "created table with baseline schema");
        return Ok(());
    }

    let existing: HashSet<String> = column_names(pool, table).await?.into_iter().collect();
    for (name, ty) in missing_baseline(&existing) {
        let ddl = build_add_column(table, name, ty)?;
        match sqlx::query(&ddl).execute(pool).await {
            Ok(_) => tracing::info!(table, column = name, "added missing baseline column"),
            Err(e) => tracing::warn!(table, column = name, error = %e, "baseline column add failed"),
        }
    }
    Ok(())
}

/// Ensure the database in `database_url` exists; create it if not. Connects to
/// the default `postgres` database to run CREATE DATABASE. Call before
/// creating the main pool.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), AppError> {
    let (admin_url, db_name) = parse_db_name_from_url(database_url)?;
    if db_name.is_empty() || db_name == "postgres" {
        return Ok(());
    }
    let opts = sqlx::postgres::PgConnectOptions::from_str(&admin_url)
        .map_err(|e| AppError::BadRequest(format!("invalid DATABASE_URL: {}", e)))?;
    let mut conn: sqlx::PgConnection = opts.connect().await?;
    let exists: (bool,) =
        sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
            .bind(&db_name)
            .fetch_one(&mut conn)
            .await?;
    if !exists.0 {
        sqlx::query(&format!("CREATE DATABASE {}", quote_db_name(&db_name)))
            .execute(&mut conn)
            .await?;
        tracing::info!(database = %db_name, "created database");
    }
    Ok(())
}

fn parse_db_name_from_url(url: &str) -> Result<(String, String), AppError> {
    let after_scheme = url.find("://").map(|i| i + 3).unwrap_or(0);
    // No path segment means no database name; the caller skips creation.
    let Some(slash) = url[after_scheme..].find('/') else {
        return Ok((url.to_string(), String::new()));
    };
    let path_start = after_scheme + slash + 1;
    let path_and_query = url.get(path_start..).unwrap_or("");
    let db_name = path_and_query.split('?').next().unwrap_or("").trim();
    let base = url.get(..path_start).unwrap_or(url);
    let admin_url = format!("{}postgres", base);
    Ok((admin_url, db_name.to_string()))
}

fn quote_db_name(name: &str) -> String {
    format!("\"{}\"", name.replace('\\', "\\\\").replace('"', "\\\""))
}
