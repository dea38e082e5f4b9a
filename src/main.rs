use std::process::ExitCode;

use agent_workflow_config::cli::{self, Cli, Command};
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    match cli.command {
        Command::Validate(args) => cli::validate::run(args).await,
        Command::Models(args) => cli::models::run(args).await,
    }
}
