use serde::{Deserialize, Serialize};

use crate::shared::{PoolConfig, QueueConfig, RedisConfig, ValidationError};

/// Configuration for the distributed worker service.
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub struct WorkerConfig {
    #[serde(default)]
    pub pool: PoolConfig,
    #[serde(default)]
    pub queue: QueueConfig,
    #[serde(default)]
    pub redis: RedisConfig,
}

impl WorkerConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.pool.validate()?;
        self.queue.validate()?;
        self.redis.validate()?;

        Ok(())
    }
}
