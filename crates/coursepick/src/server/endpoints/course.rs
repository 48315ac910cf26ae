//! The course endpoint: a random course meeting at the requested instant.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{Datelike, Local, Weekday};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{error, info};

use crate::catalog::{self, ClockTime, CoursePick};
use crate::server::types::ApiErrorType;
use crate::types::AppState;

/// Query parameters for the course endpoint. Values that fail validation
/// fall back to their defaults rather than erroring.
#[derive(Debug, Deserialize)]
pub struct CourseQueryParams {
    /// Subject abbreviation, or "random"
    #[serde(default)]
    pub subject: Option<String>,
    /// Day name (monday..sunday); defaults to today
    #[serde(default)]
    pub day: Option<String>,
    /// Clock time as zero-padded "HHMM"; defaults to now
    #[serde(default)]
    pub time: Option<String>,
    /// Explicit term id, overriding current-term resolution
    #[serde(default)]
    pub term: Option<String>,
}

/// GET /course
///
/// Picks a random offerable course meeting on the requested day and time.
/// On a catalog failure the response still renders, with an empty course
/// list and the error message.
pub async fn get_course(
    State(s): State<Arc<AppState>>,
    Query(params): Query<CourseQueryParams>,
) -> Response {
    let now = Local::now();

    let day = params
        .day
        .as_deref()
        .and_then(|raw| raw.parse::<Weekday>().ok())
        .unwrap_or_else(|| now.weekday());
    let at = params
        .time
        .as_deref()
        .and_then(ClockTime::parse)
        .unwrap_or_else(|| ClockTime::from_time(now.time()));

    let subject = match params
        .subject
        .as_deref()
        .filter(|subject| *subject != "random" && s.subjects.contains(subject))
    {
        Some(subject) => subject.to_string(),
        None => match s.subjects.random() {
            Some(subject) => subject.to_string(),
            None => {
                return ApiErrorType::from((
                    StatusCode::SERVICE_UNAVAILABLE,
                    "subject directory is empty",
                    None,
                ))
                .into_response();
            }
        },
    };

    info!(subject, day = %day_name(day), time = %at, "GET /course");

    let outcome = catalog::resolve_course(
        &s,
        &subject,
        day,
        at,
        now.date_naive(),
        params.term.as_deref(),
    )
    .await;

    let base = json!({
        "subject": subject,
        "subject_title": s.subjects.title(&subject),
        "day": day_name(day),
        "time": at.to_string(),
    });

    match outcome {
        Ok(CoursePick::Course {
            course,
            meeting,
            matching,
        }) => {
            let mut body = base;
            body["course"] = serde_json::to_value(&course).unwrap_or_default();
            body["meeting"] = serde_json::to_value(&meeting).unwrap_or_default();
            body["matching_courses"] = json!(matching);
            (StatusCode::OK, Json(body)).into_response()
        }
        Ok(CoursePick::NoCourse) => {
            let mut body = base;
            body["course"] = json!(null);
            body["matching_courses"] = json!(0);
            (StatusCode::OK, Json(body)).into_response()
        }
        Ok(CoursePick::NoTerm) => {
            let mut body = base;
            body["course"] = json!(null);
            body["matching_courses"] = json!(0);
            body["error"] = json!("no term is in session");
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(e) => {
            error!(subject, error = %e, "course resolution failed");
            let mut body = base;
            body["course"] = json!(null);
            body["matching_courses"] = json!(0);
            body["error"] = json!(e.to_string());
            (StatusCode::OK, Json(body)).into_response()
        }
    }
}

fn day_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "monday",
        Weekday::Tue => "tuesday",
        Weekday::Wed => "wednesday",
        Weekday::Thu => "thursday",
        Weekday::Fri => "friday",
        Weekday::Sat => "saturday",
        Weekday::Sun => "sunday",
    }
}
