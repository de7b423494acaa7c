//! Result writer service binary.
//!
//! Hosts the result sink: drains the Redis result queue and persists
//! successful payloads to the durable payload file. Exposes a health check
//! endpoint while running. Terminates once every paired worker has signaled
//! completion, or earlier on a termination signal.

use anyhow::Context;
use inventory_config::load_config;
use inventory_config::shared::WriterConfig;

mod core;

fn main() -> anyhow::Result<()> {
    let config = load_config::<WriterConfig>().context("loading writer configuration")?;
    config
        .validate()
        .context("validating writer configuration")?;

    let _log_flusher = inventory_telemetry::tracing::init_tracing(env!("CARGO_BIN_NAME"))?;

    actix_web::rt::System::new().block_on(core::run(config))
}
