//! Bounded FIFO queues connecting the pipeline stages.
//!
//! The [`BoundedQueue`] trait is the single contract both channel backings
//! implement: an in-memory queue for the single-process agent and a Redis
//! list shared by distributed services. Dispatcher, workers and sink are
//! written once against this trait and never know which backing they run on.

use std::future::Future;
use std::time::Duration;

use crate::error::InvResult;

pub mod memory;
pub mod redis;

pub use memory::MemoryQueue;
pub use redis::RedisQueue;

/// A bounded FIFO queue with blocking-with-timeout semantics.
///
/// Implementations must preserve insertion order and deliver each item to at
/// most one consumer, even with multiple producers and consumers attached.
pub trait BoundedQueue<T>: Send + Sync
where
    T: Send + 'static,
{
    /// Attempts to enqueue an item, waiting up to `timeout` for free capacity.
    ///
    /// Returns `Ok(true)` if the item was accepted and `Ok(false)` if the
    /// queue stayed full for the whole timeout. A `false` return means the
    /// item was NOT enqueued; the caller decides whether to retry or drop.
    fn push(&self, item: T, timeout: Duration) -> impl Future<Output = InvResult<bool>> + Send;

    /// Dequeues the oldest item.
    ///
    /// With `timeout = None` the call waits indefinitely for an item. With a
    /// timeout, `Ok(None)` signals that the queue stayed empty for the whole
    /// wait.
    fn pop(&self, timeout: Option<Duration>) -> impl Future<Output = InvResult<Option<T>>> + Send;

    /// Current number of queued items. Racy by nature; only useful for
    /// capacity heuristics and diagnostics.
    fn len(&self) -> impl Future<Output = InvResult<usize>> + Send;

    /// The configured capacity bound.
    fn capacity(&self) -> usize;
}

/// Pushes an item with a bounded number of full-timeout attempts.
///
/// Returns `Ok(true)` as soon as one attempt succeeds, `Ok(false)` when all
/// attempts see a full queue. Callers that drop on `false` are expected to
/// log the loss themselves with their own context.
pub async fn push_with_retries<T, Q>(
    queue: &Q,
    item: T,
    timeout: Duration,
    attempts: u32,
) -> InvResult<bool>
where
    T: Clone + Send + 'static,
    Q: BoundedQueue<T>,
{
    for _ in 0..attempts {
        if queue.push(item.clone(), timeout).await? {
            return Ok(true);
        }
    }

    Ok(false)
}
