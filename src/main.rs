use clap::Parser;
use live_search::cli::{self, Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Query(args) => cli::query::run(args, cli.metrics).await,
        Command::Replay(args) => cli::replay::run(args, cli.metrics).await,
    }
}
