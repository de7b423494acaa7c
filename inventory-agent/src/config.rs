use anyhow::Context;
use inventory_config::load_config;
use inventory_config::shared::AgentConfig;

/// Loads and validates the agent configuration.
pub fn load_agent_config() -> anyhow::Result<AgentConfig> {
    let config = load_config::<AgentConfig>().context("loading agent configuration")?;
    config.validate().context("validating agent configuration")?;

    Ok(config)
}
