//! Column DDL builders and the allowed-type whitelist.
//!
//! ALTER TABLE has no parameter binding, so column names pass through the
//! identifier validator before they are interpolated. Types never come from
//! free-form input: they must match the whitelist, and the upper-cased
//! whitelist form is what lands in the statement.

use crate::error::AppError;
use crate::ident::validate_identifier;

/// Column types accepted for runtime-added columns.
const ALLOWED_COLUMN_TYPES: &[&str] = &[
    "text",
    "varchar",
    "character varying",
    "numeric",
    "integer",
    "boolean",
    "date",
    "timestamp",
    "timestamptz",
];

/// Case-insensitive membership test against the allowed type set.
pub fn validate_column_type(ty: &str) -> bool {
    let ty = ty.trim();
    ALLOWED_COLUMN_TYPES.iter().any(|t| t.eq_ignore_ascii_case(ty))
}

/// `ALTER TABLE <t> ADD COLUMN <name> <TYPE>`. Errors on a bad identifier or a
/// type outside the whitelist.
pub fn build_add_column(table: &str, name: &str, ty: &str) -> Result<String, AppError> {
    validate_identifier(name)?;
    if !validate_column_type(ty) {
        return Err(AppError::InvalidColumnType(ty.to_string()));
    }
    Ok(format!(
        "ALTER TABLE {} ADD COLUMN {} {}",
        table,
        name,
        ty.trim().to_uppercase()
    ))
}

/// `ALTER TABLE <t> RENAME COLUMN <old> TO <new>`. Both names are validated.
pub fn build_rename_column(table: &str, old: &str, new: &str) -> Result<String, AppError> {
    validate_identifier(old)?;
    validate_identifier(new)?;
    Ok(format!("ALTER TABLE {} RENAME COLUMN {} TO {}", table, old, new))
}

/// `ALTER TABLE <t> DROP COLUMN <name>`.
pub fn build_drop_column(table: &str, name: &str) -> Result<String, AppError> {
    validate_identifier(name)?;
    Ok(format!("ALTER TABLE {} DROP COLUMN {}", table, name))
}

/// Catalog query for the current column set, ordered by position. The table
/// name is a bound value here, not an identifier.
pub fn build_get_columns() -> &'static str {
    "SELECT column_name, data_type FROM information_schema.columns \
     WHERE table_schema = 'public' AND table_name = $1 \
     ORDER BY ordinal_position"
}
