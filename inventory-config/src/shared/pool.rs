use serde::{Deserialize, Serialize};

use crate::shared::ValidationError;

/// Worker pool sizing.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct PoolConfig {
    /// Number of inventory workers to run.
    #[serde(default = "default_inventory_workers")]
    pub inventory_workers: usize,
}

impl PoolConfig {
    pub const DEFAULT_INVENTORY_WORKERS: usize = 1;

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.inventory_workers == 0 {
            return Err(ValidationError::InvalidFieldValue {
                field: "pool.inventory_workers".to_string(),
                constraint: "must be greater than 0".to_string(),
            });
        }

        Ok(())
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            inventory_workers: default_inventory_workers(),
        }
    }
}

fn default_inventory_workers() -> usize {
    PoolConfig::DEFAULT_INVENTORY_WORKERS
}
