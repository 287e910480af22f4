//! Propboard: property listing REST service with a runtime-extensible
//! PostgreSQL schema.

pub mod config;
pub mod error;
pub mod handlers;
pub mod ident;
pub mod repo;
pub mod routes;
pub mod schema;
pub mod sql;
pub mod state;

pub use config::Config;
pub use error::AppError;
pub use repo::PropertyRepo;
pub use routes::{common_routes_with_ready, property_routes};
pub use schema::{ensure_database_exists, ensure_schema, PROPERTY_TABLE};
pub use state::AppState;
