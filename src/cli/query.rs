//! Query command - one-shot search

use clap::Args;
use serde_json::{json, Value};

use super::{filter_set, parse_filter, Runtime};
use crate::infrastructure::services::{Resolution, SearchOutcome};

#[derive(Args, Debug)]
pub struct QueryArgs {
    /// Search text
    pub text: String,

    /// Filter as key=value; repeatable
    #[arg(long = "filter", value_parser = parse_filter)]
    pub filters: Vec<(String, Value)>,
}

/// Run a single search through the dispatcher
pub async fn run(args: QueryArgs, with_metrics: bool) -> anyhow::Result<()> {
    let runtime = Runtime::bootstrap(with_metrics).await?;

    let resolution = runtime
        .dispatcher
        .search(args.text, filter_set(args.filters))
        .await;

    let output = match resolution {
        Resolution::Completed(outcome) => render_outcome(&outcome),
        Resolution::Superseded { generation } => {
            json!({ "generation": generation, "superseded": true })
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    runtime.print_metrics();

    Ok(())
}

/// Flattens an outcome into `results` or `error`
pub fn render_outcome(outcome: &SearchOutcome) -> Value {
    let mut output = json!({
        "generation": outcome.generation,
        "key": outcome.key,
        "source": outcome.source,
    });

    match &outcome.result {
        Ok(results) => output["results"] = json!(results),
        Err(error) => output["error"] = json!(error),
    }

    output
}
