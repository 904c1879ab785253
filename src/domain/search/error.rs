use serde::Serialize;
use thiserror::Error;

use crate::domain::DomainError;

/// Search failure as surfaced to consumers.
///
/// Failures are never cached; the next input is the only retry.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SearchError {
    #[error("Search provider '{provider}' failed: {message}")]
    Provider { provider: String, message: String },

    #[error("Search provider '{provider}' timed out after {timeout_ms}ms")]
    TimedOut { provider: String, timeout_ms: u64 },
}

impl SearchError {
    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    pub fn timed_out(provider: impl Into<String>, timeout_ms: u64) -> Self {
        Self::TimedOut {
            provider: provider.into(),
            timeout_ms,
        }
    }

    /// Converts a provider's domain error, keeping its message
    pub fn from_domain(provider: &str, error: DomainError) -> Self {
        match error {
            DomainError::Provider { provider, message } => Self::Provider { provider, message },
            other => Self::provider(provider, other.to_string()),
        }
    }
}
