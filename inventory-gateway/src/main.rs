//! Dispatch gateway service binary.

use anyhow::Context;
use inventory_config::load_config;
use inventory_config::shared::GatewayConfig;
use inventory_gateway::startup::Application;
use tracing::info;

fn main() -> anyhow::Result<()> {
    let _log_flusher = inventory_telemetry::tracing::init_tracing(env!("CARGO_BIN_NAME"))?;

    actix_web::rt::System::new().block_on(async_main())
}

async fn async_main() -> anyhow::Result<()> {
    let config = load_config::<GatewayConfig>().context("loading gateway configuration")?;
    config
        .validate()
        .context("validating gateway configuration")?;

    let application = Application::build(config).await?;
    info!(port = application.port(), "gateway listening");

    application.run_until_stopped().await?;

    Ok(())
}
