//! Paginated course retrieval.

use super::client::CatalogApi;
use super::error::CatalogError;
use super::types::Course;
use tracing::debug;

/// Number of courses requested per page.
pub const PAGE_SIZE: u32 = 100;

/// Retrieves every course for a (term, subject) pair, walking the page
/// cursor from page 1 until the catalog stops advertising a next page.
///
/// Entries accumulate in received order; the catalog does not guarantee a
/// stable order and this function never re-sorts. A page in which the `data`
/// or `links` key is absent is a contract violation and fails the whole
/// retrieval; an empty data page alone never terminates the walk.
pub async fn fetch_all_courses(
    api: &dyn CatalogApi,
    term: &str,
    subject: &str,
) -> Result<Vec<Course>, CatalogError> {
    let mut courses = Vec::new();
    let mut page_number = 1u32;

    loop {
        let page = api.course_page(term, subject, PAGE_SIZE, page_number).await?;

        let data = page.data.ok_or_else(|| CatalogError::InvalidPage {
            message: format!("page {page_number} has no data list"),
        })?;
        let links = page.links.ok_or_else(|| CatalogError::InvalidPage {
            message: format!("page {page_number} has no links object"),
        })?;

        courses.extend(data);

        let has_next = links.and_then(|links| links.next).is_some();
        if !has_next {
            break;
        }
        page_number += 1;
    }

    debug!(
        term,
        subject,
        pages = page_number,
        count = courses.len(),
        "fetched course listing"
    );
    Ok(courses)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::testing::{page_fixture, MockCatalog};
    use serde_json::json;

    #[tokio::test]
    async fn test_accumulates_all_pages_in_received_order() {
        let api = MockCatalog::with_pages(vec![
            page_fixture(&["CS101", "CS102"], Some("/courses?page[number]=2")),
            page_fixture(&["CS201"], Some("/courses?page[number]=3")),
            page_fixture(&["CS301", "CS999"], None),
        ]);

        let courses = fetch_all_courses(&api, "201701", "CS").await.unwrap();
        let ids: Vec<&str> = courses.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["CS101", "CS102", "CS201", "CS301", "CS999"]);
        assert_eq!(api.page_call_count(), 3);
    }

    #[tokio::test]
    async fn test_missing_links_is_fatal_and_stops_fetching() {
        let first: crate::catalog::CoursePage =
            serde_json::from_value(json!({"data": [{"id": "CS101"}]})).unwrap();
        let api = MockCatalog::with_pages(vec![
            first,
            page_fixture(&["CS201"], None),
        ]);

        let result = fetch_all_courses(&api, "201701", "CS").await;
        assert!(matches!(result, Err(CatalogError::InvalidPage { .. })));
        assert_eq!(api.page_call_count(), 1);
    }

    #[tokio::test]
    async fn test_missing_data_is_fatal() {
        let page: crate::catalog::CoursePage =
            serde_json::from_value(json!({"links": null})).unwrap();
        let api = MockCatalog::with_pages(vec![page]);

        let result = fetch_all_courses(&api, "201701", "CS").await;
        assert!(matches!(result, Err(CatalogError::InvalidPage { .. })));
    }

    #[tokio::test]
    async fn test_null_links_terminates_cleanly() {
        let page: crate::catalog::CoursePage =
            serde_json::from_value(json!({"data": [{"id": "CS101"}], "links": null})).unwrap();
        let api = MockCatalog::with_pages(vec![page]);

        let courses = fetch_all_courses(&api, "201701", "CS").await.unwrap();
        assert_eq!(courses.len(), 1);
        assert_eq!(api.page_call_count(), 1);
    }

    #[tokio::test]
    async fn test_empty_data_page_with_next_keeps_walking() {
        let api = MockCatalog::with_pages(vec![
            page_fixture(&[], Some("/courses?page[number]=2")),
            page_fixture(&["CS101"], None),
        ]);

        let courses = fetch_all_courses(&api, "201701", "CS").await.unwrap();
        assert_eq!(courses.len(), 1);
        assert_eq!(api.page_call_count(), 2);
    }

    #[tokio::test]
    async fn test_client_errors_propagate_unchanged() {
        let api = MockCatalog::default();
        let result = fetch_all_courses(&api, "201701", "CS").await;
        assert!(matches!(result, Err(CatalogError::Transport { .. })));
    }
}
