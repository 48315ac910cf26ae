use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::sync::Arc;

use crate::types::AppState;

/// GET /subjects
///
/// Lists the subject directory, sorted by abbreviation.
pub async fn get_subjects(State(s): State<Arc<AppState>>) -> Response {
    let subjects: Vec<_> = s
        .subjects
        .entries()
        .map(|(abbreviation, title)| {
            json!({
                "abbreviation": abbreviation,
                "title": title,
            })
        })
        .collect();

    (StatusCode::OK, Json(subjects)).into_response()
}
