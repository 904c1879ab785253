//! Cache key normalization

use std::fmt;

use serde::Serialize;

use crate::domain::search::FilterSet;

/// Canonical cache key for a query/filter combination.
///
/// Layout is `<query as JSON string>|<canonical filter JSON>`; the query is
/// JSON-quoted so a `|` typed by the user cannot collide with the separator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct SearchKey(String);

impl SearchKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SearchKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SearchKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Trims and case-folds a raw query
pub fn fold_query(query: &str) -> String {
    query.trim().to_lowercase()
}

/// Derives the cache key for a query and its filters.
///
/// Never fails: empty queries and empty filter sets produce valid keys, and an
/// empty query with filters is distinct from one without.
pub fn normalize(query: &str, filters: &FilterSet) -> SearchKey {
    let folded = serde_json::Value::String(fold_query(query)).to_string();
    SearchKey(format!("{}|{}", folded, filters.canonical_json()))
}
