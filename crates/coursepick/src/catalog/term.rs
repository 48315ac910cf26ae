//! Resolution and caching of the term currently in session.

use super::client::CatalogApi;
use super::error::CatalogError;
use super::types::Term;
use chrono::NaiveDate;
use futures::future;
use tokio::sync::RwLock;
use tracing::{info, warn};

/// Where `today` falls relative to a cached term's window.
enum TermPosition {
    /// The term has not started yet
    Upcoming,
    /// The term is in session
    InSession,
    /// The term is over; the cache is stale
    Ended,
}

/// Answers "what term is in session right now?" from a single cached slot,
/// refreshing from the catalog only when the slot is empty or stale.
///
/// The slot holds either the in-session term or, between terms, the next
/// upcoming one; both cases answer without a network call until the window
/// rolls over. Refreshes run under the write lock with a re-check after
/// acquisition, so concurrent callers coalesce onto one catalog round trip.
pub struct TermResolver {
    slot: RwLock<Option<Term>>,
}

impl TermResolver {
    pub fn new() -> Self {
        Self {
            slot: RwLock::new(None),
        }
    }

    /// Returns the term in session on `today`, or None when between terms.
    ///
    /// `today` is caller-supplied so request handlers pass the wall clock
    /// and tests pass fixed dates.
    pub async fn current_term(
        &self,
        api: &dyn CatalogApi,
        today: NaiveDate,
    ) -> Result<Option<Term>, CatalogError> {
        {
            let slot = self.slot.read().await;
            if let Some(term) = slot.as_ref() {
                match Self::position(term, today) {
                    TermPosition::Upcoming => return Ok(None),
                    TermPosition::InSession => return Ok(Some(term.clone())),
                    TermPosition::Ended => {}
                }
            }
        }

        let mut slot = self.slot.write().await;
        // another caller may have refreshed while we waited for the lock
        if let Some(term) = slot.as_ref() {
            match Self::position(term, today) {
                TermPosition::Upcoming => return Ok(None),
                TermPosition::InSession => return Ok(Some(term.clone())),
                TermPosition::Ended => *slot = None,
            }
        }

        Self::refresh(api, today, &mut slot).await
    }

    /// The cached term, if any. Exposed for monitoring.
    pub async fn cached(&self) -> Option<Term> {
        self.slot.read().await.clone()
    }

    fn position(term: &Term, today: NaiveDate) -> TermPosition {
        if term.start_date.is_some_and(|start| today < start) {
            return TermPosition::Upcoming;
        }
        if term.end_date.is_some_and(|end| today <= end) {
            return TermPosition::InSession;
        }
        TermPosition::Ended
    }

    /// Re-resolves from the catalog: lists the open terms, fetches detail
    /// for each, and caches either the term containing `today` or the
    /// next-starting one. Terms with missing or inverted dates are skipped.
    async fn refresh(
        api: &dyn CatalogApi,
        today: NaiveDate,
        slot: &mut Option<Term>,
    ) -> Result<Option<Term>, CatalogError> {
        let summaries = api.open_terms().await?;
        let details =
            future::try_join_all(summaries.iter().map(|summary| api.term(&summary.id))).await?;

        let mut candidates: Vec<Term> = details
            .iter()
            .map(Term::from_summary)
            .filter(Term::has_valid_window)
            .collect();
        candidates.sort_by_key(|term| term.start_date);

        if let Some(current) = candidates.iter().find(|term| term.contains(today)) {
            info!(term = %current.id, "resolved current term");
            *slot = Some(current.clone());
            return Ok(Some(current.clone()));
        }

        if let Some(next) = candidates
            .iter()
            .find(|term| term.start_date.is_some_and(|start| start > today))
        {
            info!(term = %next.id, "no term in session, cached next upcoming term");
            *slot = Some(next.clone());
            return Ok(None);
        }

        warn!("no current or upcoming term found");
        *slot = None;
        Ok(None)
    }
}

impl Default for TermResolver {
    fn default() -> Self {
        Self::new()
    }
}
