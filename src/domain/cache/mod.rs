//! Cache domain - key normalization and the result cache abstraction

mod config;
mod key;
mod repository;

pub use self::config::CacheConfig;
pub use key::{fold_query, normalize, SearchKey};
pub use repository::{CacheStats, ResultCache};

#[cfg(test)]
pub use repository::MockResultCache;
