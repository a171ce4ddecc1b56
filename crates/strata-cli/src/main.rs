mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Apply => commands::apply(&cli.state_path, cli.dry_run),
        Command::Destroy => commands::destroy(&cli.state_path, cli.dry_run),
        Command::Status => commands::status(&cli.state_path),
    }
}
