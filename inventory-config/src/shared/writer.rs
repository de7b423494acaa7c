use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::shared::{PoolConfig, QueueConfig, RedisConfig, ServiceConfig, ValidationError};

/// Configuration for the result writer service.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct WriterConfig {
    pub service: ServiceConfig,
    /// Worker count of the pool the writer is paired with; the sink needs it
    /// to count stop signals.
    #[serde(default)]
    pub pool: PoolConfig,
    #[serde(default)]
    pub queue: QueueConfig,
    #[serde(default)]
    pub redis: RedisConfig,
    /// Destination for the durable payload record.
    #[serde(default = "default_payload_path")]
    pub payload_path: PathBuf,
}

impl WriterConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.pool.validate()?;
        self.queue.validate()?;
        self.redis.validate()?;

        Ok(())
    }
}

fn default_payload_path() -> PathBuf {
    PathBuf::from("payload.json")
}
