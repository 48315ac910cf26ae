use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::sync::Arc;

use crate::types::AppState;

/// GET /health
pub async fn get_health() -> Response {
    (StatusCode::OK, Json(json!({"status": "ok"}))).into_response()
}

/// GET /cache_stats
///
/// Reports cache occupancy for monitoring.
pub async fn get_cache_stats(State(s): State<Arc<AppState>>) -> Response {
    let cached_term = s.term_resolver.cached().await;
    (
        StatusCode::OK,
        Json(json!({
            "course_cache_entries": s.course_cache.len(),
            "course_cache_capacity": s.course_cache.capacity(),
            "cached_term": cached_term,
            "subjects": s.subjects.len(),
        })),
    )
        .into_response()
}
