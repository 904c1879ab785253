//! CLI module for live-search
//!
//! Provides subcommands for driving the search pipeline from a terminal:
//! - `query`: one-shot search, printed as JSON
//! - `replay`: replays a timed keystroke script through a search session

pub mod query;
pub mod replay;

use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde_json::Value;
use tracing::info;

use crate::config::AppConfig;
use crate::domain::search::FilterSet;
use crate::infrastructure::logging::init_logging;
use crate::infrastructure::observability::{init_metrics, PrometheusMetrics};
use crate::infrastructure::search::ProviderFactory;
use crate::infrastructure::services::SearchDispatcher;

/// live-search - Debounced, cached, latest-wins search over a catalog or HTTP backend
#[derive(Parser)]
#[command(name = "live-search")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Print Prometheus metrics after the run
    #[arg(long, global = true)]
    pub metrics: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run a single search and print the outcome
    Query(query::QueryArgs),

    /// Replay a keystroke script and print the final search state
    Replay(replay::ReplayArgs),
}

/// Everything a subcommand needs to run searches
pub struct Runtime {
    pub config: AppConfig,
    pub dispatcher: Arc<SearchDispatcher>,
    metrics: Option<PrometheusMetrics>,
}

impl Runtime {
    /// Loads configuration, installs logging and metrics, builds the dispatcher
    pub async fn bootstrap(with_metrics: bool) -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = AppConfig::load().context("Failed to load configuration")?;
        init_logging(&config.logging);
        config.validate()?;

        let metrics = if with_metrics {
            init_metrics(&config.metrics)
        } else {
            None
        };

        let provider = ProviderFactory::new().create(&config.provider).await?;
        info!(provider = provider.provider_name(), "Search provider ready");

        let dispatcher = SearchDispatcher::with_cache_config(
            provider,
            config.search.cache.clone(),
            &config.search.dispatcher(),
        )?;

        Ok(Self {
            config,
            dispatcher: Arc::new(dispatcher),
            metrics,
        })
    }

    /// Prints the Prometheus snapshot when metrics were requested
    pub fn print_metrics(&self) {
        if let Some(metrics) = &self.metrics {
            println!("{}", metrics.render());
        }
    }
}

/// Parses `key=value`; values that are valid JSON keep their type
pub fn parse_filter(raw: &str) -> Result<(String, Value), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("invalid filter `{}`, expected key=value", raw))?;

    let key = key.trim();
    if key.is_empty() {
        return Err(format!("invalid filter `{}`, empty key", raw));
    }

    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));

    Ok((key.to_string(), value))
}

/// Collects parsed `--filter` arguments into a filter set
pub fn filter_set(filters: Vec<(String, Value)>) -> FilterSet {
    filters.into_iter().collect()
}
