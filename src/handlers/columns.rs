//! Column DDL handlers: add, rename, delete, list.

use crate::error::AppError;
use crate::handlers::Message;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddColumnBody {
    pub column_name: String,
    pub column_type: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenameColumnBody {
    pub new_name: String,
}

pub async fn add(
    State(state): State<AppState>,
    Json(body): Json<AddColumnBody>,
) -> Result<impl IntoResponse, AppError> {
    state.repo.add_column(&body.column_name, &body.column_type).await?;
    Ok((
        StatusCode::CREATED,
        Json(Message {
            message: format!("column '{}' added", body.column_name),
        }),
    ))
}

pub async fn rename(
    State(state): State<AppState>,
    Path(column_name): Path<String>,
    Json(body): Json<RenameColumnBody>,
) -> Result<impl IntoResponse, AppError> {
    state.repo.rename_column(&column_name, &body.new_name).await?;
    Ok(Json(Message {
        message: format!("column '{}' renamed to '{}'", column_name, body.new_name),
    }))
}

pub async fn remove(
    State(state): State<AppState>,
    Path(column_name): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.repo.drop_column(&column_name).await?;
    Ok(Json(Message {
        message: format!("column '{}' deleted", column_name),
    }))
}

pub async fn fetch(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let cols = state.repo.list_columns().await?;
    Ok(Json(cols))
}
