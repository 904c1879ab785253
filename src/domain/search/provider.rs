use std::fmt::Debug;

use async_trait::async_trait;

use super::{FilterSet, ResultSet};
use crate::domain::DomainError;

/// Trait for search backends (hosted search endpoint, in-memory catalog...)
///
/// Implementations must report failure through `Err` rather than a sentinel
/// result, and must answer identical inputs identically; the dispatcher
/// caches their output on that assumption.
#[async_trait]
pub trait SearchProvider: Send + Sync + Debug {
    /// Runs a search for the raw query and filters
    async fn provide(&self, query: &str, filters: &FilterSet) -> Result<ResultSet, DomainError>;

    /// Get the provider name
    fn provider_name(&self) -> &'static str;
}
