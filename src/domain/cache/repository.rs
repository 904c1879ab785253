//! Result cache trait definition

use std::fmt::Debug;

#[cfg(test)]
use mockall::automock;
use serde::Serialize;

use super::SearchKey;
use crate::domain::search::ResultSet;

/// Cache statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Entries currently held, including expired ones not yet purged
    pub entries: usize,
    pub max_entries: usize,
    pub hits: u64,
    pub misses: u64,
    /// Live entries dropped to respect `max_entries`
    pub evictions: u64,
    /// Entries dropped because they outlived `max_age`
    pub expirations: u64,
}

impl CacheStats {
    /// Hit rate as a percentage
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            (self.hits as f64 / total as f64) * 100.0
        }
    }
}

/// Bounded, expiring store of search results keyed by [`SearchKey`].
///
/// Values are handed out as owned copies. Implementations are internally
/// synchronized, so one instance can be shared between dispatchers on purpose.
#[cfg_attr(test, automock)]
pub trait ResultCache: Send + Sync + Debug {
    /// Returns a live entry and marks it most recently used.
    /// Expired entries are removed and reported absent.
    fn get(&self, key: &SearchKey) -> Option<ResultSet>;

    /// Inserts or replaces an entry, evicting the least recently used one
    /// when a new key would exceed capacity
    fn set(&self, key: SearchKey, value: ResultSet);

    /// Removes every entry
    fn clear(&self);

    /// Number of stored entries
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether a live entry exists, without touching recency
    fn contains(&self, key: &SearchKey) -> bool;

    /// Drops every expired entry, returning how many were removed
    fn purge_expired(&self) -> usize;

    fn stats(&self) -> CacheStats;
}
