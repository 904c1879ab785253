use std::path::Path;

use serde::Deserialize;

use crate::domain::cache::CacheConfig;
use crate::domain::DomainError;
use crate::infrastructure::debounce::DebounceConfig;
use crate::infrastructure::observability::MetricsConfig;
use crate::infrastructure::search::ProviderConfig;
use crate::infrastructure::services::DispatcherConfig;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub search: SearchSettings,
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
}

/// Debounce, cache and timeout settings of a search scope
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchSettings {
    #[serde(default)]
    pub debounce: DebounceConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub provider_timeout_ms: Option<u64>,
}

impl SearchSettings {
    pub fn dispatcher(&self) -> DispatcherConfig {
        DispatcherConfig {
            debounce: self.debounce.clone(),
            provider_timeout_ms: self.provider_timeout_ms,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

fn default_level() -> String {
    "warn".to_string()
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: LogFormat::default(),
        }
    }
}

impl AppConfig {
    /// Loads `config/default`, `config/local` and `APP__*` environment overrides
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from(Path::new("config"))
    }

    /// Same layering as [`AppConfig::load`], rooted at `dir`
    pub fn load_from(dir: &Path) -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::from(dir.join("default")).required(false))
            .add_source(config::File::from(dir.join("local")).required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Rejects settings no component can run with
    pub fn validate(&self) -> Result<(), DomainError> {
        self.search.cache.validate()?;

        if self.search.provider_timeout_ms == Some(0) {
            return Err(DomainError::configuration(
                "search.provider_timeout_ms must be greater than zero",
            ));
        }

        Ok(())
    }
}
