//! In-memory catalog search provider for development and demos

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use crate::domain::cache::fold_query;
use crate::domain::search::{FilterSet, ResultItem, ResultSet, SearchProvider};
use crate::domain::DomainError;

/// Filter name matched against [`ResultItem::kind`] instead of attributes
const KIND_FILTER: &str = "kind";

#[derive(Deserialize)]
#[serde(untagged)]
enum CatalogFile {
    Items(Vec<ResultItem>),
    Wrapped { items: Vec<ResultItem> },
}

/// Search provider over a fixed list of items
#[derive(Debug, Clone, Default)]
pub struct CatalogSearchProvider {
    items: Vec<ResultItem>,
    latency: Duration,
    limit: Option<usize>,
}

impl CatalogSearchProvider {
    pub fn new(items: Vec<ResultItem>) -> Self {
        Self {
            items,
            latency: Duration::ZERO,
            limit: None,
        }
    }

    /// Parses a catalog given either as an array or as `{"items": [...]}`
    pub fn from_json(json: &str) -> Result<Self, DomainError> {
        let file: CatalogFile = serde_json::from_str(json)
            .map_err(|e| DomainError::configuration(format!("Invalid catalog: {}", e)))?;

        let items = match file {
            CatalogFile::Items(items) | CatalogFile::Wrapped { items } => items,
        };

        Ok(Self::new(items))
    }

    /// Loads a catalog file
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, DomainError> {
        let path = path.as_ref();
        let json = tokio::fs::read_to_string(path).await.map_err(|e| {
            DomainError::configuration(format!(
                "Failed to read catalog {}: {}",
                path.display(),
                e
            ))
        })?;

        let provider = Self::from_json(&json)?;
        tracing::info!(
            path = %path.display(),
            items = provider.items.len(),
            "Catalog loaded"
        );

        Ok(provider)
    }

    /// Delays every answer, to simulate a remote backend
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn matches_query(item: &ResultItem, folded: &str) -> bool {
        if folded.is_empty() {
            return true;
        }

        let contains = |text: &str| text.to_lowercase().contains(folded);

        contains(&item.title)
            || item.subtitle.as_deref().is_some_and(contains)
            || item.attributes.values().any(|value| match value {
                Value::String(s) => contains(s),
                Value::Array(values) => values
                    .iter()
                    .any(|v| v.as_str().is_some_and(contains)),
                _ => false,
            })
    }

    fn matches_filters(item: &ResultItem, filters: &FilterSet) -> bool {
        filters.iter().all(|(name, expected)| {
            if name == KIND_FILTER {
                return match expected {
                    Value::String(kind) => kind.eq_ignore_ascii_case(item.kind.as_str()),
                    Value::Array(kinds) => kinds.iter().any(|k| {
                        k.as_str()
                            .is_some_and(|kind| kind.eq_ignore_ascii_case(item.kind.as_str()))
                    }),
                    _ => false,
                };
            }

            match item.attributes.get(name) {
                Some(Value::Array(values)) if !expected.is_array() => values.contains(expected),
                Some(actual) => actual == expected,
                None => false,
            }
        })
    }
}

#[async_trait]
impl SearchProvider for CatalogSearchProvider {
    async fn provide(&self, query: &str, filters: &FilterSet) -> Result<ResultSet, DomainError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        let folded = fold_query(query);

        let mut matched: Vec<&ResultItem> = self
            .items
            .iter()
            .filter(|item| Self::matches_filters(item, filters))
            .filter(|item| Self::matches_query(item, &folded))
            .collect();

        // Stable sort: title-prefix hits first, catalog order otherwise
        matched.sort_by_key(|item| !item.title.to_lowercase().starts_with(&folded));

        let limit = self.limit.unwrap_or(usize::MAX);

        Ok(matched.into_iter().take(limit).cloned().collect())
    }

    fn provider_name(&self) -> &'static str {
        "catalog"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::search::ResultKind;
    use serde_json::json;

    fn catalog() -> CatalogSearchProvider {
        CatalogSearchProvider::new(vec![
            ResultItem::new("t-1", ResultKind::Talent, "Ada Obi")
                .with_subtitle("Afrobeat music vocalist")
                .with_attribute("city", "Lagos")
                .with_attribute("skills", json!(["singing", "dance"])),
            ResultItem::new("c-1", ResultKind::Category, "Music"),
            ResultItem::new("t-2", ResultKind::Talent, "Musa Bello")
                .with_subtitle("Street dance")
                .with_attribute("city", "Abuja")
                .with_attribute("skills", json!(["dance"])),
            ResultItem::new("a-1", ResultKind::Achievement, "Dance Battle Winner")
                .with_attribute("year", 2023),
        ])
    }

    #[tokio::test]
    async fn test_query_matches_title_subtitle_and_attributes() {
        let results = catalog().provide("dance", &FilterSet::new()).await.unwrap();

        assert_eq!(
            results.titles(),
            vec!["Dance Battle Winner", "Ada Obi", "Musa Bello"]
        );
    }

    #[tokio::test]
    async fn test_query_is_case_insensitive_and_trimmed() {
        let results = catalog().provide("  MUSIC ", &FilterSet::new()).await.unwrap();

        assert_eq!(results.titles(), vec!["Music", "Ada Obi"]);
    }

    #[tokio::test]
    async fn test_kind_filter() {
        let filters = FilterSet::new().with("kind", "talent");
        let results = catalog().provide("", &filters).await.unwrap();

        assert_eq!(results.titles(), vec!["Ada Obi", "Musa Bello"]);
    }

    #[tokio::test]
    async fn test_kind_filter_accepts_list() {
        let filters = FilterSet::new().with("kind", json!(["category", "achievement"]));
        let results = catalog().provide("", &filters).await.unwrap();

        assert_eq!(results.len(), 2);
    }

    #[tokio::test]
    async fn test_attribute_filters() {
        let filters = FilterSet::new().with("city", "Abuja");
        let results = catalog().provide("dance", &filters).await.unwrap();
        assert_eq!(results.titles(), vec!["Musa Bello"]);

        let filters = FilterSet::new().with("skills", "singing");
        let results = catalog().provide("", &filters).await.unwrap();
        assert_eq!(results.titles(), vec!["Ada Obi"]);

        let filters = FilterSet::new().with("year", 2023);
        let results = catalog().provide("", &filters).await.unwrap();
        assert_eq!(results.titles(), vec!["Dance Battle Winner"]);
    }

    #[tokio::test]
    async fn test_no_match_is_empty() {
        let results = catalog().provide("painting", &FilterSet::new()).await.unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_limit() {
        let results = catalog()
            .with_limit(1)
            .provide("", &FilterSet::new())
            .await
            .unwrap();
        assert_eq!(results.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_latency() {
        let provider = catalog().with_latency(Duration::from_millis(250));
        let started = tokio::time::Instant::now();

        provider.provide("music", &FilterSet::new()).await.unwrap();

        assert!(started.elapsed() >= Duration::from_millis(250));
    }

    #[test]
    fn test_from_json_formats() {
        let array = r#"[{"id": "c-1", "kind": "category", "title": "Music"}]"#;
        let wrapped = r#"{"items": [{"id": "c-1", "kind": "category", "title": "Music"}]}"#;

        assert_eq!(CatalogSearchProvider::from_json(array).unwrap().len(), 1);
        assert_eq!(CatalogSearchProvider::from_json(wrapped).unwrap().len(), 1);
        assert!(CatalogSearchProvider::from_json(r#"{"nope": 1}"#).is_err());
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        std::fs::write(
            &path,
            r#"[{"id": "t-1", "kind": "talent", "title": "Ada Obi"}]"#,
        )
        .unwrap();

        let provider = CatalogSearchProvider::load(&path).await.unwrap();
        assert_eq!(provider.len(), 1);

        let missing = CatalogSearchProvider::load(dir.path().join("missing.json")).await;
        assert!(matches!(missing, Err(DomainError::Configuration { .. })));
    }
}
