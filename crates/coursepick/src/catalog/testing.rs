//! Test doubles for the catalog pipeline.

use super::client::CatalogApi;
use super::error::CatalogError;
use super::types::{CoursePage, Subject, TermSummary};
use async_trait::async_trait;
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Scripted in-memory [`CatalogApi`] implementation.
///
/// Terms are served from a fixed list, course pages are served by page
/// number from `pages`, and every call is counted so tests can assert on
/// network behavior.
#[derive(Default)]
pub struct MockCatalog {
    pub terms: Vec<TermSummary>,
    pub pages: Vec<CoursePage>,
    pub subjects: Vec<Subject>,
    pub open_terms_calls: AtomicUsize,
    pub term_calls: AtomicUsize,
    pub page_calls: AtomicUsize,
}

impl MockCatalog {
    pub fn with_terms(terms: Vec<TermSummary>) -> Self {
        Self {
            terms,
            ..Default::default()
        }
    }

    pub fn with_pages(pages: Vec<CoursePage>) -> Self {
        Self {
            pages,
            ..Default::default()
        }
    }

    pub fn open_terms_call_count(&self) -> usize {
        self.open_terms_calls.load(Ordering::SeqCst)
    }

    pub fn page_call_count(&self) -> usize {
        self.page_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CatalogApi for MockCatalog {
    async fn open_terms(&self) -> Result<Vec<TermSummary>, CatalogError> {
        self.open_terms_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.terms.clone())
    }

    async fn term(&self, id: &str) -> Result<TermSummary, CatalogError> {
        self.term_calls.fetch_add(1, Ordering::SeqCst);
        self.terms
            .iter()
            .find(|term| term.id == id)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound {
                message: format!("no term {id}"),
            })
    }

    async fn course_page(
        &self,
        _term: &str,
        _subject: &str,
        _page_size: u32,
        page_number: u32,
    ) -> Result<CoursePage, CatalogError> {
        self.page_calls.fetch_add(1, Ordering::SeqCst);
        self.pages
            .get(page_number as usize - 1)
            .cloned()
            .ok_or_else(|| CatalogError::Transport {
                message: format!("no page {page_number} scripted"),
            })
    }

    async fn subjects(&self) -> Result<Vec<Subject>, CatalogError> {
        Ok(self.subjects.clone())
    }
}

/// Builds a term resource in the catalog's wire shape.
pub fn term_fixture(id: &str, start: &str, end: &str) -> TermSummary {
    serde_json::from_value(json!({
        "id": id,
        "attributes": {
            "code": id,
            "description": format!("Term {id}"),
            "startDate": start,
            "endDate": end,
        }
    }))
    .unwrap()
}

/// Builds a course page in the catalog's wire shape.
pub fn page_fixture(course_ids: &[&str], next: Option<&str>) -> CoursePage {
    serde_json::from_value(json!({
        "data": course_ids.iter().map(|id| json!({"id": id})).collect::<Vec<_>>(),
        "links": {"next": next},
    }))
    .unwrap()
}
