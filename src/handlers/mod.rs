//! HTTP handlers: thin request-to-repository mapping.

pub mod columns;
pub mod rows;

use crate::error::AppError;
use serde::Serialize;
use serde_json::{Map, Value};

#[derive(Serialize)]
pub struct Message {
    pub message: String,
}

pub(crate) fn body_to_map(value: Value) -> Result<Map<String, Value>, AppError> {
    match value {
        Value::Object(m) => Ok(m),
        _ => Err(AppError::BadRequest("body must be a JSON object".into())),
    }
}
