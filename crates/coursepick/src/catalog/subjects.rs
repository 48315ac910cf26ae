//! The subject directory, loaded once at startup.

use super::client::CatalogApi;
use super::error::CatalogError;
use rand::Rng;
use std::collections::BTreeMap;
use tracing::info;

/// The catalog's placeholder for "Subject Unknown".
const UNKNOWN_SUBJECT: &str = "0000";
/// Overseas-studies subjects carry this title prefix and have no local
/// meeting times.
const OVERSEAS_PREFIX: &str = "OS/";

/// Maps subject abbreviations to display titles.
pub struct SubjectDirectory {
    subjects: BTreeMap<String, String>,
}

impl SubjectDirectory {
    /// Creates an empty directory.
    pub fn empty() -> Self {
        Self {
            subjects: BTreeMap::new(),
        }
    }

    /// Fetches the subject list from the catalog, dropping the unknown
    /// placeholder and overseas-studies entries.
    pub async fn load(api: &dyn CatalogApi) -> Result<Self, CatalogError> {
        let subjects: BTreeMap<String, String> = api
            .subjects()
            .await?
            .into_iter()
            .filter(|subject| subject.abbreviation != UNKNOWN_SUBJECT)
            .filter(|subject| !subject.title.starts_with(OVERSEAS_PREFIX))
            .map(|subject| (subject.abbreviation, subject.title))
            .collect();

        info!(count = subjects.len(), "loaded subject directory");
        Ok(Self { subjects })
    }

    pub fn contains(&self, abbreviation: &str) -> bool {
        self.subjects.contains_key(abbreviation)
    }

    pub fn title(&self, abbreviation: &str) -> Option<&str> {
        self.subjects.get(abbreviation).map(String::as_str)
    }

    /// A uniformly random subject abbreviation, or None when the directory
    /// is empty.
    pub fn random(&self) -> Option<&str> {
        if self.subjects.is_empty() {
            return None;
        }
        let index = rand::thread_rng().gen_range(0..self.subjects.len());
        self.subjects.keys().nth(index).map(String::as_str)
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.subjects
            .iter()
            .map(|(abbreviation, title)| (abbreviation.as_str(), title.as_str()))
    }

    pub fn len(&self) -> usize {
        self.subjects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subjects.is_empty()
    }
}
