//! The course catalog retrieval pipeline.
//!
//! Resolution runs leaf-first: the term resolver supplies a term, the
//! fetcher walks the paginated listing for (term, subject), the filter
//! keeps the offerable subset (cached per key), the matcher narrows to
//! courses active at the requested instant, and a uniform random pick
//! decides which one to show.

mod cache;
mod client;
mod error;
mod fetcher;
mod filter;
mod meeting;
mod subjects;
mod term;
#[cfg(test)]
pub mod testing;
mod types;

pub use cache::{CacheKey, CourseCache, COURSE_CACHE_CAPACITY};
pub use client::{CatalogApi, CatalogClient, CatalogClientConfig};
pub use error::CatalogError;
pub use fetcher::{fetch_all_courses, PAGE_SIZE};
pub use filter::{is_offerable, offerable_courses};
pub use meeting::{meeting_at, meets_at};
pub use subjects::SubjectDirectory;
pub use term::TermResolver;
pub use types::{
    ClockTime, Course, CourseAttributes, CoursePage, MeetingTime, PageLinks, Subject, Term,
    TermAttributes, TermSummary,
};

use crate::types::AppState;
use chrono::{NaiveDate, Weekday};
use rand::seq::SliceRandom;
use std::sync::Arc;
use tracing::info;

/// Outcome of resolving a course for a subject/day/time request.
#[derive(Debug)]
pub enum CoursePick {
    /// A course meeting at the requested instant, with the matched entry
    /// and the size of the matching set it was drawn from.
    Course {
        course: Course,
        meeting: MeetingTime,
        matching: usize,
    },
    /// The term is known but nothing meets at the requested instant.
    NoCourse,
    /// No term is in session on the requested date.
    NoTerm,
}

/// Resolves a random course meeting on `day` at `at` for `subject`.
///
/// Uses the current term unless `explicit_term` overrides it. Catalog
/// errors propagate unchanged; the caller decides how to degrade.
pub async fn resolve_course(
    state: &AppState,
    subject: &str,
    day: Weekday,
    at: ClockTime,
    today: NaiveDate,
    explicit_term: Option<&str>,
) -> Result<CoursePick, CatalogError> {
    let term_id = match explicit_term {
        Some(id) => id.to_string(),
        None => {
            match state
                .term_resolver
                .current_term(state.catalog.as_ref(), today)
                .await?
            {
                Some(term) => term.id,
                None => return Ok(CoursePick::NoTerm),
            }
        }
    };

    let courses = offerable_for(state, &term_id, subject).await?;
    let matching: Vec<&Course> = courses
        .iter()
        .filter(|course| meets_at(course, day, at))
        .collect();

    let Some(course) = matching.choose(&mut rand::thread_rng()) else {
        return Ok(CoursePick::NoCourse);
    };
    let course = (*course).clone();
    let Some(meeting) = meeting_at(&course, day, at).cloned() else {
        return Ok(CoursePick::NoCourse);
    };

    Ok(CoursePick::Course {
        course,
        meeting,
        matching: matching.len(),
    })
}

/// Returns the offerable course list for (term, subject), fetching and
/// filtering on a cache miss. Holds the key's refresh lock across the
/// fetch so concurrent misses coalesce onto one catalog walk.
async fn offerable_for(
    state: &AppState,
    term_id: &str,
    subject: &str,
) -> Result<Arc<Vec<Course>>, CatalogError> {
    let key = CacheKey::new(term_id, subject);
    if let Some(courses) = state.course_cache.get(&key) {
        return Ok(courses);
    }

    let lock = state.course_cache.refresh_lock(&key);
    let _guard = lock.lock().await;
    // another caller may have filled the entry while we waited
    if let Some(courses) = state.course_cache.get(&key) {
        return Ok(courses);
    }

    let fetched = fetch_all_courses(state.catalog.as_ref(), term_id, subject).await?;
    let offerable = offerable_courses(fetched);
    info!(
        term = term_id,
        subject,
        count = offerable.len(),
        "cached offerable courses"
    );
    Ok(state.course_cache.insert(key, offerable))
}
