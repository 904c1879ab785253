//! Search provider factory for runtime selection

use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;

use crate::domain::search::SearchProvider;
use crate::domain::DomainError;

use super::catalog::CatalogSearchProvider;
use super::http::{HttpSearchConfig, HttpSearchProvider};

/// Supported provider types
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    /// In-memory catalog loaded from a JSON file
    #[default]
    Catalog,
    /// Hosted search endpoint
    Http,
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderKind::Catalog => write!(f, "catalog"),
            ProviderKind::Http => write!(f, "http"),
        }
    }
}

impl std::str::FromStr for ProviderKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "catalog" | "memory" | "in_memory" => Ok(ProviderKind::Catalog),
            "http" | "remote" => Ok(ProviderKind::Http),
            _ => Err(DomainError::configuration(format!(
                "Unknown provider type: {}. Valid types: catalog, http",
                s
            ))),
        }
    }
}

/// Configuration for provider creation
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderConfig {
    #[serde(default)]
    pub kind: ProviderKind,
    /// Catalog file (required for the catalog provider)
    #[serde(default)]
    pub catalog_path: Option<String>,
    /// Simulated catalog latency
    #[serde(default)]
    pub latency_ms: u64,
    /// Maximum number of catalog hits returned
    #[serde(default)]
    pub limit: Option<usize>,
    /// Search endpoint base URL (required for the http provider)
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_timeout_ms() -> u64 {
    10_000
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            kind: ProviderKind::Catalog,
            catalog_path: None,
            latency_ms: 0,
            limit: None,
            base_url: None,
            api_key: None,
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl ProviderConfig {
    pub fn catalog(path: impl Into<String>) -> Self {
        Self {
            kind: ProviderKind::Catalog,
            catalog_path: Some(path.into()),
            ..Default::default()
        }
    }

    pub fn http(base_url: impl Into<String>) -> Self {
        Self {
            kind: ProviderKind::Http,
            base_url: Some(base_url.into()),
            ..Default::default()
        }
    }
}

/// Factory for creating search providers
#[derive(Debug, Default)]
pub struct ProviderFactory;

impl ProviderFactory {
    pub fn new() -> Self {
        Self
    }

    /// Creates a provider instance based on configuration
    pub async fn create(
        &self,
        config: &ProviderConfig,
    ) -> Result<Arc<dyn SearchProvider>, DomainError> {
        match config.kind {
            ProviderKind::Catalog => {
                let path = config.catalog_path.as_deref().ok_or_else(|| {
                    DomainError::configuration("catalog_path is required for the catalog provider")
                })?;

                let mut provider = CatalogSearchProvider::load(path)
                    .await?
                    .with_latency(Duration::from_millis(config.latency_ms));

                if let Some(limit) = config.limit {
                    provider = provider.with_limit(limit);
                }

                Ok(Arc::new(provider))
            }
            ProviderKind::Http => {
                let base_url = config.base_url.clone().ok_or_else(|| {
                    DomainError::configuration("base_url is required for the http provider")
                })?;

                let mut http_config = HttpSearchConfig::new(base_url)
                    .with_timeout(Duration::from_millis(config.timeout_ms));

                if let Some(api_key) = &config.api_key {
                    http_config = http_config.with_api_key(api_key.clone());
                }

                Ok(Arc::new(HttpSearchProvider::new(http_config)?))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::search::FilterSet;

    #[test]
    fn test_provider_kind_from_str() {
        assert_eq!("catalog".parse::<ProviderKind>().unwrap(), ProviderKind::Catalog);
        assert_eq!("MEMORY".parse::<ProviderKind>().unwrap(), ProviderKind::Catalog);
        assert_eq!("http".parse::<ProviderKind>().unwrap(), ProviderKind::Http);
        assert!("solr".parse::<ProviderKind>().is_err());
    }

    #[test]
    fn test_provider_kind_display() {
        assert_eq!(ProviderKind::Catalog.to_string(), "catalog");
        assert_eq!(ProviderKind::Http.to_string(), "http");
    }

    #[tokio::test]
    async fn test_create_catalog_provider() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        std::fs::write(
            &path,
            r#"[{"id": "c-1", "kind": "category", "title": "Music"}]"#,
        )
        .unwrap();

        let config = ProviderConfig::catalog(path.to_string_lossy());
        let provider = ProviderFactory::new().create(&config).await.unwrap();

        assert_eq!(provider.provider_name(), "catalog");
        let results = provider.provide("mus", &FilterSet::new()).await.unwrap();
        assert_eq!(results.len(), 1);
    }

    #[tokio::test]
    async fn test_create_catalog_missing_path() {
        let config = ProviderConfig::default();
        let result = ProviderFactory::new().create(&config).await;

        assert!(matches!(result, Err(DomainError::Configuration { .. })));
    }

    #[tokio::test]
    async fn test_create_http_provider() {
        let config = ProviderConfig::http("https://search.example.com");
        let provider = ProviderFactory::new().create(&config).await.unwrap();

        assert_eq!(provider.provider_name(), "http");
    }

    #[tokio::test]
    async fn test_create_http_missing_url() {
        let config = ProviderConfig {
            kind: ProviderKind::Http,
            ..Default::default()
        };

        assert!(ProviderFactory::new().create(&config).await.is_err());
    }
}
