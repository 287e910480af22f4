//! Route tables: the property API plus service routes (health, readiness,
//! version).

use crate::handlers::{columns, rows};
use crate::state::AppState;
use axum::{
    extract::State,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::Serialize;

/// Routes mounted under `/api/property`.
pub fn property_routes(state: AppState) -> Router {
    Router::new()
        .route("/fetch", get(rows::fetch_all))
        .route("/fetch/:id", get(rows::fetch_by_id))
        .route("/create", post(rows::create))
        .route("/update/:id", put(rows::update))
        .route("/delete/:id", delete(rows::remove))
        .route("/columns/add", post(columns::add))
        .route("/columns/rename/:column_name", put(columns::rename))
        .route("/columns/delete/:column_name", delete(columns::remove))
        .route("/columns/fetch", get(columns::fetch))
        .with_state(state)
}

#[derive(Serialize)]
struct HealthBody {
    status: &'static str,
}

#[derive(Serialize)]
struct ReadyBody {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    database: Option<&'static str>,
}

async fn health() -> Json<HealthBody> {
    Json(HealthBody { status: "ok" })
}

async fn ready(
    State(state): State<AppState>,
) -> Result<Json<ReadyBody>, (axum::http::StatusCode, Json<ReadyBody>)> {
    if sqlx::query("SELECT 1")
        .fetch_optional(state.repo.pool())
        .await
        .is_err()
    {
        return Err((
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            Json(ReadyBody {
                status: "degraded",
                database: Some("unavailable"),
            }),
        ));
    }
    Ok(Json(ReadyBody {
        status: "ok",
        database: Some("ok"),
    }))
}

async fn version() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Service routes: GET /health, GET /ready (with DB check), GET /version.
pub fn common_routes_with_ready(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/ready", get(ready))
        .route("/version", get(version))
        .with_state(state)
}
