//! Distributed inventory worker service binary.
//!
//! Consumes tasks from the Redis task queue, collects inventory and pushes
//! tagged results onto the Redis result queue. Runs until it receives a
//! termination signal, then drains and stops its local pool.

use anyhow::Context;
use inventory_config::load_config;
use inventory_config::shared::WorkerConfig;

mod core;

fn main() -> anyhow::Result<()> {
    let config = load_config::<WorkerConfig>().context("loading worker configuration")?;
    config
        .validate()
        .context("validating worker configuration")?;

    let _log_flusher = inventory_telemetry::tracing::init_tracing(env!("CARGO_BIN_NAME"))?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(core::run(config))
}
