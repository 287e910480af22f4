//! Shared application state for all routes.

use crate::repo::PropertyRepo;

#[derive(Clone)]
pub struct AppState {
    pub repo: PropertyRepo,
}
