//! Search provider backed by a hosted HTTP search endpoint

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::search::{FilterSet, ResultItem, ResultSet, SearchProvider};
use crate::domain::DomainError;

const PROVIDER_NAME: &str = "http";

/// Configuration for the HTTP search provider
#[derive(Debug, Clone)]
pub struct HttpSearchConfig {
    /// Base URL; requests go to `{base_url}/search`
    pub base_url: String,
    /// Sent as `apikey` and as a bearer token when present
    pub api_key: Option<String>,
    pub timeout: Duration,
}

impl HttpSearchConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: None,
            timeout: Duration::from_secs(10),
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[derive(Serialize)]
struct SearchRequest<'a> {
    query: &'a str,
    filters: &'a FilterSet,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SearchResponse {
    Items(Vec<ResultItem>),
    Wrapped { results: Vec<ResultItem> },
}

/// Search provider calling `POST {base_url}/search`
#[derive(Debug, Clone)]
pub struct HttpSearchProvider {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
}

impl HttpSearchProvider {
    pub fn new(config: HttpSearchConfig) -> Result<Self, DomainError> {
        if config.base_url.trim().is_empty() {
            return Err(DomainError::configuration(
                "Base URL is required for the HTTP search provider",
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| {
                DomainError::configuration(format!("Failed to build HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            endpoint: format!("{}/search", config.base_url.trim_end_matches('/')),
            api_key: config.api_key,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl SearchProvider for HttpSearchProvider {
    async fn provide(&self, query: &str, filters: &FilterSet) -> Result<ResultSet, DomainError> {
        let mut request = self
            .client
            .post(&self.endpoint)
            .json(&SearchRequest { query, filters });

        if let Some(api_key) = &self.api_key {
            request = request.header("apikey", api_key).bearer_auth(api_key);
        }

        let response = request.send().await.map_err(|e| {
            DomainError::provider(PROVIDER_NAME, format!("Request failed: {}", e))
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response.text().await.unwrap_or_default();
            return Err(DomainError::provider(
                PROVIDER_NAME,
                format!("HTTP {}: {}", status, error_body),
            ));
        }

        let body: SearchResponse = response.json().await.map_err(|e| {
            DomainError::provider(PROVIDER_NAME, format!("Failed to parse response: {}", e))
        })?;

        let items = match body {
            SearchResponse::Items(items) | SearchResponse::Wrapped { results: items } => items,
        };

        Ok(ResultSet::new(items))
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER_NAME
    }
}
