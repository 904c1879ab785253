//! Observability infrastructure - Metrics

mod config;
mod metrics;

pub use self::config::MetricsConfig;
pub use self::metrics::{
    init_metrics, record_cache_lookup, record_cache_removal, record_provider_request,
    record_resolution, PrometheusMetrics,
};
