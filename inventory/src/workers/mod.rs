//! Worker pool and result sink loops.

pub mod pool;
pub mod sink;

pub use pool::InventoryWorkerPool;
pub use sink::{SinkSummary, run_result_sink};
