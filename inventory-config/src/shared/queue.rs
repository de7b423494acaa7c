use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::shared::ValidationError;

/// Bounded queue configuration shared by all services.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct QueueConfig {
    /// Capacity of the task queue.
    #[serde(default = "default_tasks_maxsize")]
    pub tasks_maxsize: usize,
    /// Capacity of the result queue.
    #[serde(default = "default_results_maxsize")]
    pub results_maxsize: usize,
    /// Maximum time, in milliseconds, a single push attempt waits for
    /// capacity before reporting the queue full.
    #[serde(default = "default_put_timeout_ms")]
    pub put_timeout_ms: u64,
}

impl QueueConfig {
    pub const DEFAULT_TASKS_MAXSIZE: usize = 100;
    pub const DEFAULT_RESULTS_MAXSIZE: usize = 100;
    pub const DEFAULT_PUT_TIMEOUT_MS: u64 = 2000;

    /// The push timeout as a [`Duration`].
    pub fn put_timeout(&self) -> Duration {
        Duration::from_millis(self.put_timeout_ms)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.tasks_maxsize == 0 {
            return Err(ValidationError::InvalidFieldValue {
                field: "queue.tasks_maxsize".to_string(),
                constraint: "must be greater than 0".to_string(),
            });
        }
        if self.results_maxsize == 0 {
            return Err(ValidationError::InvalidFieldValue {
                field: "queue.results_maxsize".to_string(),
                constraint: "must be greater than 0".to_string(),
            });
        }
        if self.put_timeout_ms == 0 {
            return Err(ValidationError::InvalidFieldValue {
                field: "queue.put_timeout_ms".to_string(),
                constraint: "must be greater than 0".to_string(),
            });
        }

        Ok(())
    }
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            tasks_maxsize: default_tasks_maxsize(),
            results_maxsize: default_results_maxsize(),
            put_timeout_ms: default_put_timeout_ms(),
        }
    }
}

fn default_tasks_maxsize() -> usize {
    QueueConfig::DEFAULT_TASKS_MAXSIZE
}

fn default_results_maxsize() -> usize {
    QueueConfig::DEFAULT_RESULTS_MAXSIZE
}

fn default_put_timeout_ms() -> u64 {
    QueueConfig::DEFAULT_PUT_TIMEOUT_MS
}
