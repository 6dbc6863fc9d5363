//! rulestream CLI binary.

use anyhow::Context;
use clap::Parser;
use rulestream::cli::{args::*, commands::*};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    // Parse command line arguments using clap
    let args = RuleStreamArgs::parse();

    // RUST_LOG wins over the verbosity flags
    let default_level = match args.verbosity() {
        0 => "error",
        1 => "warn",
        2 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let command = match &args.command {
        Command::Run(_) => "run",
        Command::Generate(_) => "generate",
    };

    // Execute the command
    execute_command(args).with_context(|| format!("rulestream {command} failed"))
}
