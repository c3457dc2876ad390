use std::collections::HashMap;
use std::time::{Duration, Instant};

use serde::{de::DeserializeOwned, Serialize};

/// Identity of one cached resource. Two bindings share an entry only when
/// kind and every parameter match.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    ProjectDetails {
        workspace: String,
        project: String,
    },
    ProjectIssues {
        workspace: String,
        project: String,
    },
    ProjectCycles {
        workspace: String,
        project: String,
    },
    CycleDetails {
        workspace: String,
        project: String,
        cycle: String,
    },
    CycleIssues {
        workspace: String,
        project: String,
        cycle: String,
    },
}

struct CachedEntry {
    value: serde_json::Value,
    fetched_at: Instant,
}

/// In-process response cache with a revalidation interval.
///
/// A load borrows the cache mutably, so loads never overlap and each key is
/// fetched at most once per load. Nothing is claimed before a fetch
/// completes, so dropping a load midway leaves the cache as it was.
pub struct FetchCache {
    entries: HashMap<CacheKey, CachedEntry>,
    revalidate_after: Duration,
}

impl FetchCache {
    pub fn new(revalidate_after: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            revalidate_after,
        }
    }

    /// Any entry, stale or not.
    pub fn peek<T: DeserializeOwned>(&self, key: &CacheKey) -> Option<T> {
        let entry = self.entries.get(key)?;
        match serde_json::from_value(entry.value.clone()) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(?key, error = %e, "cached value has unexpected shape");
                None
            }
        }
    }

    pub fn is_fresh(&self, key: &CacheKey) -> bool {
        self.entries
            .get(key)
            .is_some_and(|entry| entry.fetched_at.elapsed() < self.revalidate_after)
    }

    #[cfg(test)]
    pub fn contains(&self, key: &CacheKey) -> bool {
        self.entries.contains_key(key)
    }

    pub fn insert<T: Serialize>(&mut self, key: CacheKey, value: &T) {
        match serde_json::to_value(value) {
            Ok(value) => {
                self.entries.insert(
                    key,
                    CachedEntry {
                        value,
                        fetched_at: Instant::now(),
                    },
                );
            }
            Err(e) => tracing::warn!(?key, error = %e, "value not cacheable"),
        }
    }

    /// Drop one entry so the next load fetches it again.
    pub fn invalidate(&mut self, key: &CacheKey) -> bool {
        let removed = self.entries.remove(key).is_some();
        tracing::debug!(?key, removed, "invalidated");
        removed
    }
}
