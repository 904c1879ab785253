//! Replay command - drives a search session from a timed keystroke script

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use clap::Args;
use futures::future::join_all;
use serde::Deserialize;
use serde_json::json;
use tokio::time::Instant;
use tracing::debug;

use super::Runtime;
use crate::domain::search::FilterSet;
use crate::infrastructure::services::SearchSession;

#[derive(Args, Debug)]
pub struct ReplayArgs {
    /// JSON script: `[{"at_ms": 0, "query": "m"}, {"at_ms": 400, "action": "cancel"}]`
    pub script: PathBuf,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplayAction {
    #[default]
    Search,
    Cancel,
}

/// One scripted input event
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ReplayStep {
    /// Offset from the start of the replay
    pub at_ms: u64,
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub filters: FilterSet,
    #[serde(default)]
    pub action: ReplayAction,
}

/// Reads a script and orders its steps by time
pub async fn load_script(path: &Path) -> anyhow::Result<Vec<ReplayStep>> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read replay script {}", path.display()))?;

    let mut steps: Vec<ReplayStep> = serde_json::from_str(&raw)
        .with_context(|| format!("Invalid replay script {}", path.display()))?;
    steps.sort_by_key(|step| step.at_ms);

    Ok(steps)
}

/// Feeds the steps into the session at their offsets and waits for every
/// issued search to be applied or discarded
pub async fn play(session: &SearchSession, steps: Vec<ReplayStep>) {
    let started = Instant::now();
    let mut handles = Vec::with_capacity(steps.len());

    for step in steps {
        tokio::time::sleep_until(started + Duration::from_millis(step.at_ms)).await;

        match step.action {
            ReplayAction::Search => {
                debug!(at_ms = step.at_ms, query = %step.query, "Replaying keystroke");
                handles.push(session.search(step.query, step.filters));
            }
            ReplayAction::Cancel => {
                debug!(at_ms = step.at_ms, "Replaying cancel");
                session.cancel();
            }
        }
    }

    for joined in join_all(handles).await {
        if let Err(e) = joined {
            tracing::error!("Search task failed: {}", e);
        }
    }
}

/// Run the replay and print the final session state
pub async fn run(args: ReplayArgs, with_metrics: bool) -> anyhow::Result<()> {
    let runtime = Runtime::bootstrap(with_metrics).await?;
    let steps = load_script(&args.script).await?;

    let session = SearchSession::new(runtime.dispatcher.clone());
    play(&session, steps).await;

    let output = json!({
        "state": session.state(),
        "generation": runtime.dispatcher.current_generation(),
        "cache": runtime.dispatcher.cache().stats(),
    });

    println!("{}", serde_json::to_string_pretty(&output)?);
    runtime.print_metrics();

    Ok(())
}
