use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::shared::{PoolConfig, QueueConfig, ValidationError};

/// Configuration for the single-process agent binary.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct AgentConfig {
    #[serde(default)]
    pub pool: PoolConfig,
    #[serde(default)]
    pub queue: QueueConfig,
    /// Destination for the durable payload record.
    #[serde(default = "default_payload_path")]
    pub payload_path: PathBuf,
}

impl AgentConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.pool.validate()?;
        self.queue.validate()?;

        Ok(())
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            pool: PoolConfig::default(),
            queue: QueueConfig::default(),
            payload_path: default_payload_path(),
        }
    }
}

fn default_payload_path() -> PathBuf {
    PathBuf::from("payload.json")
}
