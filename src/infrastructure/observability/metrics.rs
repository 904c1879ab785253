//! Prometheus metrics infrastructure

use std::sync::Arc;
use std::time::Duration;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

use super::config::MetricsConfig;

/// Prometheus metrics handle for rendering a scrape snapshot
#[derive(Clone)]
pub struct PrometheusMetrics {
    handle: Arc<PrometheusHandle>,
}

impl PrometheusMetrics {
    /// Get the metrics in Prometheus text format
    pub fn render(&self) -> String {
        self.handle.render()
    }
}

/// Initialize Prometheus metrics
pub fn init_metrics(config: &MetricsConfig) -> Option<PrometheusMetrics> {
    if !config.enabled {
        tracing::info!("Prometheus metrics disabled");
        return None;
    }

    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => {
            register_default_metrics();

            tracing::info!("Prometheus metrics initialized");

            Some(PrometheusMetrics {
                handle: Arc::new(handle),
            })
        }
        Err(e) => {
            tracing::error!("Failed to initialize Prometheus metrics: {}", e);
            None
        }
    }
}

fn register_default_metrics() {
    gauge!("live_search_info", "version" => env!("CARGO_PKG_VERSION")).set(1.0);
}

/// Record a cache lookup performed by a dispatcher
pub fn record_cache_lookup(hit: bool) {
    let result = if hit { "hit" } else { "miss" };
    counter!("live_search_cache_lookups_total", "result" => result).increment(1);
}

/// Record entries leaving the cache ("expired" or "capacity")
pub fn record_cache_removal(reason: &'static str, count: u64) {
    counter!("live_search_cache_removals_total", "reason" => reason).increment(count);
}

/// Record a search provider call
pub fn record_provider_request(provider: &str, success: bool, duration: Duration) {
    let labels = [
        ("provider", provider.to_string()),
        ("status", if success { "success" } else { "error" }.to_string()),
    ];

    counter!("live_search_provider_requests_total", &labels).increment(1);
    histogram!("live_search_provider_request_duration_seconds", &labels)
        .record(duration.as_secs_f64());
}

/// Record what happened to a search resolution
/// ("applied", "discarded", "superseded" or "skipped")
pub fn record_resolution(outcome: &'static str) {
    counter!("live_search_resolutions_total", "outcome" => outcome).increment(1);
}
