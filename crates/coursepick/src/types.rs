use crate::catalog::{CatalogApi, CourseCache, SubjectDirectory, TermResolver};
use std::sync::Arc;

/// Shared application state, constructed once in `main` and injected into
/// every handler. All cross-request mutability lives behind the resolver
/// and cache types it holds.
pub struct AppState {
    /// The catalog client
    pub catalog: Arc<dyn CatalogApi>,
    /// The single current-term cache slot
    pub term_resolver: TermResolver,
    /// Filtered course lists per (term, subject)
    pub course_cache: CourseCache,
    /// Subject directory loaded at startup
    pub subjects: SubjectDirectory,
}
