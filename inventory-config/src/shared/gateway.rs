use serde::{Deserialize, Serialize};

use crate::shared::{QueueConfig, RedisConfig, ServiceConfig, ValidationError};

/// Configuration for the dispatch gateway service.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct GatewayConfig {
    pub service: ServiceConfig,
    #[serde(default)]
    pub queue: QueueConfig,
    #[serde(default)]
    pub redis: RedisConfig,
}

impl GatewayConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.queue.validate()?;
        self.redis.validate()?;

        Ok(())
    }
}
