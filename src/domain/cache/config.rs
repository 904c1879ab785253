use std::time::Duration;

use serde::Deserialize;

use crate::domain::DomainError;

const DEFAULT_MAX_AGE_MS: u64 = 300_000;
const DEFAULT_MAX_ENTRIES: usize = 100;

/// Bounds of a result cache, fixed for the cache's lifetime
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CacheConfig {
    /// Entries older than this are treated as absent
    #[serde(default = "default_max_age_ms")]
    pub max_age_ms: u64,
    /// Maximum number of live entries
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,
}

fn default_max_age_ms() -> u64 {
    DEFAULT_MAX_AGE_MS
}

fn default_max_entries() -> usize {
    DEFAULT_MAX_ENTRIES
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_age_ms: DEFAULT_MAX_AGE_MS,
            max_entries: DEFAULT_MAX_ENTRIES,
        }
    }
}

impl CacheConfig {
    pub fn new(max_age: Duration, max_entries: usize) -> Self {
        Self {
            max_age_ms: u64::try_from(max_age.as_millis()).unwrap_or(u64::MAX),
            max_entries,
        }
    }

    pub fn with_max_age(mut self, max_age: Duration) -> Self {
        self.max_age_ms = u64::try_from(max_age.as_millis()).unwrap_or(u64::MAX);
        self
    }

    pub fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = max_entries;
        self
    }

    pub fn max_age(&self) -> Duration {
        Duration::from_millis(self.max_age_ms)
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.max_entries == 0 {
            return Err(DomainError::configuration(
                "Cache max_entries must be at least 1",
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CacheConfig::default();
        assert_eq!(config.max_age(), Duration::from_secs(300));
        assert_eq!(config.max_entries, 100);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = CacheConfig::default()
            .with_max_age(Duration::from_millis(1500))
            .with_max_entries(2);

        assert_eq!(config, CacheConfig::new(Duration::from_millis(1500), 2));
    }

    #[test]
    fn test_huge_max_age_saturates() {
        let config = CacheConfig::new(Duration::MAX, 1);
        assert_eq!(config.max_age_ms, u64::MAX);
        assert_eq!(config.with_max_age(Duration::MAX).max_age_ms, u64::MAX);
    }

    #[test]
    fn test_zero_entries_rejected() {
        let config = CacheConfig::default().with_max_entries(0);
        assert!(matches!(
            config.validate(),
            Err(DomainError::Configuration { .. })
        ));
    }

    #[test]
    fn test_deserialize_partial() {
        let config: CacheConfig = serde_json::from_str(r#"{"max_entries": 20}"#).unwrap();
        assert_eq!(config.max_entries, 20);
        assert_eq!(config.max_age_ms, 300_000);
    }
}
