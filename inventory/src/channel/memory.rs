//! In-memory bounded queue used by the single-process agent.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, Semaphore};

use crate::channel::BoundedQueue;
use crate::error::InvResult;

/// A bounded in-process FIFO queue.
///
/// Capacity accounting is done with two semaphores: `free_slots` starts at
/// the capacity and is consumed by producers, `available` starts at zero and
/// is consumed by consumers. Permits are forgotten on acquire and re-added on
/// the opposite side, so the two counters always sum to the capacity and
/// FIFO order falls out of the inner [`VecDeque`].
///
/// Cloning is cheap and every clone refers to the same queue.
#[derive(Debug)]
pub struct MemoryQueue<T> {
    inner: Arc<Inner<T>>,
}

#[derive(Debug)]
struct Inner<T> {
    items: Mutex<VecDeque<T>>,
    free_slots: Semaphore,
    available: Semaphore,
    capacity: usize,
}

impl<T> MemoryQueue<T> {
    /// Creates a queue holding at most `capacity` items.
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Arc::new(Inner {
                items: Mutex::new(VecDeque::with_capacity(capacity)),
                free_slots: Semaphore::new(capacity),
                available: Semaphore::new(0),
                capacity,
            }),
        }
    }
}

impl<T> Clone for MemoryQueue<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T> BoundedQueue<T> for MemoryQueue<T>
where
    T: Send + 'static,
{
    async fn push(&self, item: T, timeout: Duration) -> InvResult<bool> {
        // The semaphores are never closed, so acquire can only fail with a
        // timeout here.
        let Ok(Ok(permit)) =
            tokio::time::timeout(timeout, self.inner.free_slots.acquire()).await
        else {
            return Ok(false);
        };
        permit.forget();

        self.inner.items.lock().await.push_back(item);
        self.inner.available.add_permits(1);

        Ok(true)
    }

    async fn pop(&self, timeout: Option<Duration>) -> InvResult<Option<T>> {
        let permit = match timeout {
            Some(timeout) => {
                match tokio::time::timeout(timeout, self.inner.available.acquire()).await {
                    Ok(Ok(permit)) => permit,
                    // The semaphore is never closed; only the timer fires.
                    _ => return Ok(None),
                }
            }
            None => match self.inner.available.acquire().await {
                Ok(permit) => permit,
                Err(_) => return Ok(None),
            },
        };
        permit.forget();

        let item = self.inner.items.lock().await.pop_front();
        self.inner.free_slots.add_permits(1);

        Ok(item)
    }

    async fn len(&self) -> InvResult<usize> {
        Ok(self.inner.items.lock().await.len())
    }

    fn capacity(&self) -> usize {
        self.inner.capacity
    }
}
