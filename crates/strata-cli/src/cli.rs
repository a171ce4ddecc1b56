use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "strata", about = "Declarative resource graph reconciliation engine", version)]
pub struct Cli {
    /// Path to the state file backing the reference StateStore.
    #[arg(long, env = "STRATA_STATE_PATH", global = true, default_value = "strata-state.json")]
    pub state_path: PathBuf,

    /// Don't mutate remote state; adapters fabricate sentinel outputs.
    #[arg(long, global = true)]
    pub dry_run: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Reconcile the demo plan against persisted and observed state.
    Apply,

    /// Tear down every resource the demo plan owns.
    Destroy,

    /// Print the persisted envelopes and pending-destroy queue.
    Status,
}
