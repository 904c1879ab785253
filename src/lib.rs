//! Live search
//!
//! Caching and debounce layer for search-as-you-type:
//! - Query normalization into stable cache keys
//! - Result cache with TTL and LRU eviction
//! - Debounced dispatch with generation tokens, latest search wins
//! - Consumer session exposing results, loading and error state

pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use crate::config::AppConfig;
pub use domain::{
    normalize, CacheConfig, DomainError, FilterSet, ResultCache, ResultItem, ResultKind,
    ResultSet, SearchError, SearchKey, SearchProvider,
};
pub use infrastructure::cache::InMemoryResultCache;
pub use infrastructure::debounce::{DebounceConfig, Debouncer};
pub use infrastructure::services::{
    DispatcherConfig, Generation, PendingSearch, Resolution, SearchDispatcher, SearchOutcome,
    SearchSession, SearchState,
};
