use std::sync::Arc;

use axum::routing::get;
use axum::Router;

use crate::server::endpoints::{course, status, subjects};
use crate::types::AppState;

mod endpoints;
mod types;

/// Creates the application router.
pub fn create_router(app_state: Arc<AppState>) -> Router {
    Router::new()
        .route("/course", get(course::get_course))
        .route("/subjects", get(subjects::get_subjects))
        .route("/health", get(status::get_health))
        .route("/cache_stats", get(status::get_cache_stats))
        .with_state(app_state)
}
