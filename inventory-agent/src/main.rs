//! Single-process inventory agent binary.
//!
//! Runs the whole pipeline over in-memory queues: dispatches the commands
//! file given on the command line, collects inventory with the local worker
//! pool and persists successful payloads next to the configured path.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use crate::config::load_agent_config;

mod config;
mod core;

#[derive(Debug, Parser)]
#[command(about = "Machine inventory agent")]
struct Args {
    /// Path to the text file with commands, one per line.
    #[arg(long)]
    commands: PathBuf,
}

fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();

    let config = load_agent_config()?;
    let _log_flusher = inventory_telemetry::tracing::init_tracing(env!("CARGO_BIN_NAME"))?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(core::run(config, args.commands))
}
