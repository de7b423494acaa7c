use serde::{Deserialize, Serialize};

use crate::shared::ValidationError;

/// Connection and key settings for the Redis-backed queues.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RedisConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    /// Redis list holding queued tasks.
    #[serde(default = "default_task_queue_key")]
    pub task_queue_key: String,
    /// Redis list holding queued results.
    #[serde(default = "default_result_queue_key")]
    pub result_queue_key: String,
}

impl RedisConfig {
    pub const DEFAULT_HOST: &'static str = "127.0.0.1";
    pub const DEFAULT_PORT: u16 = 6379;
    pub const DEFAULT_TASK_QUEUE_KEY: &'static str = "inventory:tasks";
    pub const DEFAULT_RESULT_QUEUE_KEY: &'static str = "inventory:results";

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.task_queue_key.is_empty() {
            return Err(ValidationError::InvalidFieldValue {
                field: "redis.task_queue_key".to_string(),
                constraint: "must not be empty".to_string(),
            });
        }
        if self.result_queue_key.is_empty() {
            return Err(ValidationError::InvalidFieldValue {
                field: "redis.result_queue_key".to_string(),
                constraint: "must not be empty".to_string(),
            });
        }
        if self.task_queue_key == self.result_queue_key {
            return Err(ValidationError::InvalidFieldValue {
                field: "redis.result_queue_key".to_string(),
                constraint: "must differ from redis.task_queue_key".to_string(),
            });
        }

        Ok(())
    }
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            username: None,
            password: None,
            task_queue_key: default_task_queue_key(),
            result_queue_key: default_result_queue_key(),
        }
    }
}

fn default_host() -> String {
    RedisConfig::DEFAULT_HOST.to_string()
}

fn default_port() -> u16 {
    RedisConfig::DEFAULT_PORT
}

fn default_task_queue_key() -> String {
    RedisConfig::DEFAULT_TASK_QUEUE_KEY.to_string()
}

fn default_result_queue_key() -> String {
    RedisConfig::DEFAULT_RESULT_QUEUE_KEY.to_string()
}
