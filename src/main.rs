//! Server binary: wires config, pool, schema reconciliation, and routes.

use axum::Router;
use propboard::{
    common_routes_with_ready, ensure_database_exists, ensure_schema, property_routes, AppState,
    Config, PropertyRepo, PROPERTY_TABLE,
};
use tokio::net::TcpListener;
use tower_http::limit::RequestBodyLimitLayer;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("propboard=info".parse()?))
        .init();

    let config = Config::from_env();
    ensure_database_exists(&config.database_url).await?;
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await?;

    ensure_schema(&pool, PROPERTY_TABLE).await?;

    let repo = PropertyRepo::new(pool, PROPERTY_TABLE)?;
    let state = AppState { repo };

    let app = Router::new()
        .merge(common_routes_with_ready(state.clone()))
        .nest("/api/property", property_routes(state))
        .layer(RequestBodyLimitLayer::new(1024 * 1024));

    let listener = TcpListener::bind(("0.0.0.0", config.listen_port)).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
