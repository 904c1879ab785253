//! In-memory result cache: LRU with lazy TTL expiry

use std::num::NonZeroUsize;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use lru::LruCache;
use tokio::time::Instant;
use tracing::debug;

use crate::domain::cache::{CacheConfig, CacheStats, ResultCache, SearchKey};
use crate::domain::search::ResultSet;
use crate::domain::DomainError;
use crate::infrastructure::observability::record_cache_removal;

/// Cache entry stored in the LRU map
#[derive(Debug, Clone)]
struct CacheEntry {
    value: ResultSet,
    inserted_at: Instant,
    last_accessed_at: Instant,
}

impl CacheEntry {
    fn new(value: ResultSet, now: Instant) -> Self {
        Self {
            value,
            inserted_at: now,
            last_accessed_at: now,
        }
    }

    fn is_expired(&self, now: Instant, max_age: Duration) -> bool {
        now.saturating_duration_since(self.inserted_at) > max_age
    }
}

#[derive(Debug)]
struct CacheState {
    entries: LruCache<SearchKey, CacheEntry>,
    hits: u64,
    misses: u64,
    evictions: u64,
    expirations: u64,
}

impl CacheState {
    fn purge_expired(&mut self, now: Instant, max_age: Duration) -> usize {
        let expired: Vec<SearchKey> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired(now, max_age))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired {
            self.entries.pop(key);
        }

        self.expirations += expired.len() as u64;
        expired.len()
    }
}

/// Result cache scoped to one search context.
///
/// Features:
/// - strict capacity: `len() <= max_entries` after every call
/// - least-recently-accessed eviction, touched by both `get` and `set`
/// - lazy expiry on `get`, plus an explicit [`ResultCache::purge_expired`] sweep
///
/// Timestamps come from `tokio::time::Instant`, so a paused test clock drives
/// expiry.
#[derive(Debug)]
pub struct InMemoryResultCache {
    state: Mutex<CacheState>,
    config: CacheConfig,
}

impl InMemoryResultCache {
    /// Creates a cache bounded by the given configuration
    pub fn new(config: CacheConfig) -> Result<Self, DomainError> {
        config.validate()?;

        let capacity = NonZeroUsize::new(config.max_entries).ok_or_else(|| {
            DomainError::configuration("Cache max_entries must be at least 1")
        })?;

        Ok(Self {
            state: Mutex::new(CacheState {
                entries: LruCache::new(capacity),
                hits: 0,
                misses: 0,
                evictions: 0,
                expirations: 0,
            }),
            config,
        })
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    // The state is left consistent by every critical section, so a poisoned
    // lock is still usable.
    fn lock(&self) -> MutexGuard<'_, CacheState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ResultCache for InMemoryResultCache {
    fn get(&self, key: &SearchKey) -> Option<ResultSet> {
        let now = Instant::now();
        let max_age = self.config.max_age();
        let mut guard = self.lock();
        let state = &mut *guard;

        match state.entries.get_mut(key) {
            Some(entry) if !entry.is_expired(now, max_age) => {
                entry.last_accessed_at = now;
                state.hits += 1;
                return Some(entry.value.clone());
            }
            Some(_) => {}
            None => {
                state.misses += 1;
                return None;
            }
        }

        state.entries.pop(key);
        state.expirations += 1;
        state.misses += 1;
        debug!(key = %key, "Expired cache entry removed on lookup");
        record_cache_removal("expired", 1);

        None
    }

    fn set(&self, key: SearchKey, value: ResultSet) {
        let now = Instant::now();
        let max_age = self.config.max_age();
        let mut guard = self.lock();
        let state = &mut *guard;

        let is_new = !state.entries.contains(&key);

        if is_new && state.entries.len() >= state.entries.cap().get() {
            let purged = state.purge_expired(now, max_age);
            if purged > 0 {
                record_cache_removal("expired", purged as u64);
            }
        }

        if let Some((evicted, _)) = state.entries.push(key.clone(), CacheEntry::new(value, now)) {
            if evicted != key {
                state.evictions += 1;
                debug!(evicted = %evicted, "Evicted least recently used cache entry");
                record_cache_removal("capacity", 1);
            }
        }
    }

    fn clear(&self) {
        self.lock().entries.clear();
    }

    fn len(&self) -> usize {
        self.lock().entries.len()
    }

    fn contains(&self, key: &SearchKey) -> bool {
        let now = Instant::now();
        let max_age = self.config.max_age();

        self.lock()
            .entries
            .peek(key)
            .is_some_and(|entry| !entry.is_expired(now, max_age))
    }

    fn purge_expired(&self) -> usize {
        let purged = self.lock().purge_expired(Instant::now(), self.config.max_age());

        if purged > 0 {
            debug!(purged, "Purged expired cache entries");
            record_cache_removal("expired", purged as u64);
        }

        purged
    }

    fn stats(&self) -> CacheStats {
        let state = self.lock();

        CacheStats {
            entries: state.entries.len(),
            max_entries: self.config.max_entries,
            hits: state.hits,
            misses: state.misses,
            evictions: state.evictions,
            expirations: state.expirations,
        }
    }
}
