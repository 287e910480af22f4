//! Row CRUD handlers: fetch, fetch-by-id, create, update, delete.

use crate::error::AppError;
use crate::handlers::{body_to_map, Message};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::Value;

fn parse_id(id_str: &str) -> Result<i64, AppError> {
    id_str
        .parse()
        .map_err(|_| AppError::BadRequest(format!("invalid id '{}'", id_str)))
}

pub async fn fetch_all(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let rows = state.repo.fetch_all().await?;
    Ok(Json(rows))
}

pub async fn fetch_by_id(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    let row = state.repo.fetch_by_id(id).await?.ok_or(AppError::NotFound)?;
    Ok(Json(row))
}

pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, AppError> {
    let body = body_to_map(body)?;
    let row = state.repo.insert(&body).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    let body = body_to_map(body)?;
    let row = state.repo.update(id, &body).await?;
    Ok(Json(update_body(row)))
}

/// 404 is reserved for fetch-single; an update that matched no row still
/// answers 200, with a null body.
fn update_body(row: Option<Value>) -> Value {
    row.unwrap_or(Value::Null)
}

pub async fn remove(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    state.repo.remove(id).await?;
    Ok(Json(Message {
        message: format!("property {} deleted", id),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missed_update_answers_with_null_body() {
        assert_eq!(update_body(None), Value::Null);
    }

    #[test]
    fn matched_update_passes_the_row_through() {
        let row = json!({"id": 1, "status": "sold"});
        assert_eq!(update_body(Some(row.clone())), row);
    }
}
