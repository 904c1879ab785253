//! Domain layer - Core search entities and abstractions

pub mod cache;
pub mod error;
pub mod search;

pub use cache::{normalize, CacheConfig, CacheStats, ResultCache, SearchKey};
pub use error::DomainError;
pub use search::{FilterSet, ResultItem, ResultKind, ResultSet, SearchError, SearchProvider};
