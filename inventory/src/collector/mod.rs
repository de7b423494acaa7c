//! Inventory collection from the local machine.

use std::future::Future;

use crate::error::InvResult;
use crate::types::{InventoryPayload, TaskEnvelope};

pub mod os;

pub use os::OsCollector;

/// Gathers inventory data for a single task.
///
/// Implementations must be safe to call concurrently from multiple workers.
/// A returned error is contained by the worker and turned into an error
/// result; it never takes the pipeline down.
pub trait Collector: Send + Sync {
    fn collect(
        &self,
        task: &TaskEnvelope,
    ) -> impl Future<Output = InvResult<InventoryPayload>> + Send;
}
