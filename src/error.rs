//! Typed errors and HTTP mapping.
//!
//! The wire contract is deliberately coarse: everything except not-found is a
//! 500 with `{"error": message}`. Variants stay distinct internally so callers
//! and tests can tell a validation failure from a driver failure.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("no valid columns to insert or update")]
    NoValidColumns,
    #[error("column '{0}' already exists")]
    ColumnExists(String),
    #[error("invalid column type '{0}'")]
    InvalidColumnType(String),
    #[error("invalid identifier '{0}'")]
    BadIdentifier(String),
    #[error("not found")]
    NotFound,
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("database: {0}")]
    Db(#[from] sqlx::Error),
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::NotFound => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = ErrorBody {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
