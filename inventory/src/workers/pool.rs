//! Pool of inventory workers draining the task queue.

use std::time::Duration;

use chrono::Utc;
use tokio::task::JoinSet;
use tracing::{debug, error, warn};

use crate::channel::{BoundedQueue, push_with_retries};
use crate::collector::Collector;
use crate::error::ErrorKind;
use crate::types::{CollectionOutcome, ResultEnvelope, ResultItem, TaskItem};

/// Number of bounded push attempts before a result is dropped.
const RESULT_PUSH_ATTEMPTS: u32 = 3;

/// Pause before retrying after a queue-level failure, so a broken backing
/// does not turn the worker loop into a busy spin.
const QUEUE_RETRY_PAUSE: Duration = Duration::from_secs(1);

/// A fixed-size pool of worker loops.
///
/// Each worker independently pops tasks (unbounded wait), runs the collector
/// and pushes the tagged result. Workers only exit when they consume a stop
/// sentinel; collector failures are converted into error results and queue
/// hiccups are logged and retried.
pub struct InventoryWorkerPool {
    workers: JoinSet<()>,
    worker_count: usize,
}

impl InventoryWorkerPool {
    /// Spawns `worker_count` workers against the given queues.
    pub fn start<Q, R, C>(
        worker_count: usize,
        task_queue: Q,
        result_queue: R,
        collector: C,
        put_timeout: Duration,
    ) -> Self
    where
        Q: BoundedQueue<TaskItem> + Clone + Send + Sync + 'static,
        R: BoundedQueue<ResultItem> + Clone + Send + Sync + 'static,
        C: Collector + Clone + Send + Sync + 'static,
    {
        let mut workers = JoinSet::new();
        for worker_id in 1..=worker_count {
            let task_queue = task_queue.clone();
            let result_queue = result_queue.clone();
            let collector = collector.clone();
            workers.spawn(run_worker(
                worker_id,
                task_queue,
                result_queue,
                collector,
                put_timeout,
            ));
        }

        Self {
            workers,
            worker_count,
        }
    }

    pub fn worker_count(&self) -> usize {
        self.worker_count
    }

    /// Waits up to `timeout` for every worker to finish.
    ///
    /// A worker that fails to finish in time is aborted and reported as a
    /// warning; shutdown proceeds regardless.
    pub async fn join_with_timeout(mut self, timeout: Duration) {
        let join_all = async {
            while let Some(joined) = self.workers.join_next().await {
                if let Err(err) = joined {
                    error!("worker task failed: {err}");
                }
            }
        };

        if tokio::time::timeout(timeout, join_all).await.is_err() {
            warn!("workers did not finish within {timeout:?}, aborting the stragglers");
            self.workers.abort_all();
        }
    }
}

async fn run_worker<Q, R, C>(
    worker_id: usize,
    task_queue: Q,
    result_queue: R,
    collector: C,
    put_timeout: Duration,
) where
    Q: BoundedQueue<TaskItem>,
    R: BoundedQueue<ResultItem>,
    C: Collector,
{
    loop {
        let task = match task_queue.pop(None).await {
            Ok(Some(TaskItem::Stop(_))) => {
                debug!(worker_id, "worker received stop signal");
                return;
            }
            Ok(Some(TaskItem::Task(task))) => task,
            // Unbounded pops only return empty on a broken backing; retry.
            Ok(None) => continue,
            Err(err) if err.kind() == ErrorKind::MalformedItem => {
                warn!(worker_id, "worker skipping malformed task: {err}");
                continue;
            }
            Err(err) => {
                error!(worker_id, "worker failed to pop task: {err}");
                tokio::time::sleep(QUEUE_RETRY_PAUSE).await;
                continue;
            }
        };

        if !task.command.is_supported() {
            warn!(
                worker_id,
                command = task.command.as_str(),
                "worker got unknown task"
            );
            continue;
        }

        let task_id = task.task_id;
        let outcome = match collector.collect(&task).await {
            Ok(payload) => {
                let display_version = payload
                    .get("os")
                    .and_then(|fields| fields.get("DisplayVersion"));
                if display_version.is_none_or(|value| value.is_empty()) {
                    warn!(worker_id, "DisplayVersion missing; fallback value may be used");
                }

                CollectionOutcome::Ok { payload }
            }
            Err(err) => {
                error!(worker_id, %task_id, "worker failed to collect inventory: {err}");
                CollectionOutcome::Error {
                    error: err.to_string(),
                }
            }
        };

        let result = ResultItem::Result(ResultEnvelope {
            task_id,
            outcome,
            ts: Utc::now(),
        });
        match push_with_retries(&result_queue, result, put_timeout, RESULT_PUSH_ATTEMPTS).await {
            Ok(true) => {}
            Ok(false) => {
                error!(worker_id, %task_id, "result queue overflow, result dropped");
            }
            Err(err) => {
                error!(worker_id, %task_id, "failed to push result: {err}");
            }
        }
    }
}
