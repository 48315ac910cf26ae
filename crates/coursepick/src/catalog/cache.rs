//! Bounded caching of filtered course lists.

use super::types::Course;
use dashmap::DashMap;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Instant;

/// Cache capacity; roughly one catalog's worth of subjects.
pub const COURSE_CACHE_CAPACITY: usize = 100;

/// Cache key for a filtered course list.
#[derive(Debug, Clone, Hash, Eq, PartialEq)]
pub struct CacheKey {
    term: String,
    subject: String,
}

impl CacheKey {
    pub fn new(term: &str, subject: &str) -> Self {
        Self {
            term: term.to_string(),
            subject: subject.to_string(),
        }
    }
}

struct CacheEntry {
    courses: Arc<Vec<Course>>,
    last_used: Instant,
}

/// LRU cache of filtered course lists, keyed by (term, subject).
///
/// Inserting at capacity evicts the least-recently-used entry; reads count
/// as use. The per-key refresh locks let callers ensure only one fetch per
/// key is in flight at a time.
pub struct CourseCache {
    entries: Mutex<HashMap<CacheKey, CacheEntry>>,
    capacity: usize,
    refresh_locks: DashMap<CacheKey, Arc<tokio::sync::Mutex<()>>>,
}

impl CourseCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            capacity,
            refresh_locks: DashMap::new(),
        }
    }

    /// Returns the cached list for `key`, marking it recently used.
    pub fn get(&self, key: &CacheKey) -> Option<Arc<Vec<Course>>> {
        let mut entries = self.entries.lock().unwrap();
        entries.get_mut(key).map(|entry| {
            entry.last_used = Instant::now();
            Arc::clone(&entry.courses)
        })
    }

    /// Stores a course list, evicting the least-recently-used entry when at
    /// capacity. Returns the stored list.
    pub fn insert(&self, key: CacheKey, courses: Vec<Course>) -> Arc<Vec<Course>> {
        let courses = Arc::new(courses);
        let mut entries = self.entries.lock().unwrap();

        if !entries.contains_key(&key) && entries.len() >= self.capacity {
            if let Some(victim) = entries
                .iter()
                .min_by_key(|(_, entry)| entry.last_used)
                .map(|(key, _)| key.clone())
            {
                entries.remove(&victim);
            }
        }

        entries.insert(
            key,
            CacheEntry {
                courses: Arc::clone(&courses),
                last_used: Instant::now(),
            },
        );
        courses
    }

    /// Gets or creates the refresh lock for `key`.
    pub fn refresh_lock(&self, key: &CacheKey) -> Arc<tokio::sync::Mutex<()>> {
        self.refresh_locks
            .entry(key.clone())
            .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
            .clone()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
