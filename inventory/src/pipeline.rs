//! Pipeline assembly and the ordered shutdown protocol.

use std::path::PathBuf;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::channel::{BoundedQueue, push_with_retries};
use crate::collector::Collector;
use crate::dispatcher::Dispatcher;
use crate::error::{ErrorKind, InvResult};
use crate::types::{ResultItem, TaskItem};
use crate::workers::{InventoryWorkerPool, SinkSummary, run_result_sink};
use crate::{bail, inv_error};

/// Stop sentinels must not be lost to transient capacity pressure, so they
/// get far more push attempts than regular items.
pub const STOP_PUSH_ATTEMPTS: u32 = 100;

/// Bounded join applied to the worker pool and the sink during shutdown.
pub const JOIN_TIMEOUT: Duration = Duration::from_secs(2);

/// Poll interval while waiting for a channel to drain.
const DRAIN_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Settings that shape a pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    pub worker_count: usize,
    pub put_timeout: Duration,
    pub payload_path: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PipelineState {
    NotStarted,
    Started,
    Terminated,
}

/// The full task-distribution pipeline over a pair of bounded queues.
///
/// The pipeline is written once against [`BoundedQueue`] and therefore runs
/// identically over in-memory queues (single process) and Redis-backed
/// queues. [`Pipeline::shutdown_and_wait`] implements the ordered protocol:
/// stop signals to the workers, task drain, worker join, stop signals to the
/// sink, result drain, sink join. Join timeouts are warnings, not errors.
pub struct Pipeline<Q, R, C> {
    task_queue: Q,
    result_queue: R,
    collector: C,
    settings: PipelineSettings,
    state: PipelineState,
    pool: Option<InventoryWorkerPool>,
    sink: Option<JoinHandle<SinkSummary>>,
}

impl<Q, R, C> Pipeline<Q, R, C>
where
    Q: BoundedQueue<TaskItem> + Clone + Send + Sync + 'static,
    R: BoundedQueue<ResultItem> + Clone + Send + Sync + 'static,
    C: Collector + Clone + Send + Sync + 'static,
{
    pub fn new(task_queue: Q, result_queue: R, collector: C, settings: PipelineSettings) -> Self {
        Self {
            task_queue,
            result_queue,
            collector,
            settings,
            state: PipelineState::NotStarted,
            pool: None,
            sink: None,
        }
    }

    /// Spawns the sink and the worker pool.
    pub fn start(&mut self) -> InvResult<()> {
        if self.state != PipelineState::NotStarted {
            bail!(ErrorKind::Unknown, "pipeline was already started");
        }

        self.sink = Some(tokio::spawn(run_result_sink(
            self.result_queue.clone(),
            self.settings.payload_path.clone(),
            self.settings.worker_count,
        )));
        self.pool = Some(InventoryWorkerPool::start(
            self.settings.worker_count,
            self.task_queue.clone(),
            self.result_queue.clone(),
            self.collector.clone(),
            self.settings.put_timeout,
        ));
        self.state = PipelineState::Started;

        info!(workers = self.settings.worker_count, "pipeline started");

        Ok(())
    }

    /// Dispatches the commands file into the task queue.
    ///
    /// Only a missing or unreadable file is an error; per-command drops are
    /// contained by the dispatcher.
    pub async fn dispatch_file(&self, path: &std::path::Path) -> InvResult<u64> {
        Dispatcher::new(self.task_queue.clone(), self.settings.put_timeout)
            .dispatch_file(path)
            .await
    }

    /// Runs the ordered shutdown protocol and waits for the sink summary.
    ///
    /// Returns `Ok(None)` when the sink failed to finish within the join
    /// timeout; everything the protocol could do has still been done.
    pub async fn shutdown_and_wait(mut self) -> InvResult<Option<SinkSummary>> {
        if self.state != PipelineState::Started {
            bail!(ErrorKind::Unknown, "pipeline is not running");
        }

        // Stop signals for the workers, then wait for every queued task to be
        // picked up before joining so no task is abandoned mid-flight.
        push_stop_signals(
            &self.task_queue,
            TaskItem::stop(),
            self.settings.worker_count,
            self.settings.put_timeout,
        )
        .await;
        wait_until_empty(&self.task_queue).await;

        if let Some(pool) = self.pool.take() {
            pool.join_with_timeout(JOIN_TIMEOUT).await;
        }

        // Same dance on the result side.
        push_stop_signals(
            &self.result_queue,
            ResultItem::stop(),
            self.settings.worker_count,
            self.settings.put_timeout,
        )
        .await;
        wait_until_empty(&self.result_queue).await;

        let summary = match self.sink.take() {
            Some(sink) => match tokio::time::timeout(JOIN_TIMEOUT, sink).await {
                Ok(Ok(summary)) => Some(summary),
                Ok(Err(err)) => {
                    return Err(inv_error!(
                        ErrorKind::WorkerPanic,
                        "result sink task failed",
                        source: err
                    ));
                }
                Err(_) => {
                    warn!("result sink did not finish within {JOIN_TIMEOUT:?}");
                    None
                }
            },
            None => None,
        };

        self.state = PipelineState::Terminated;
        info!("pipeline finished");

        Ok(summary)
    }
}

/// Pushes one stop sentinel per consumer, each with many bounded retries.
///
/// A sentinel that still cannot be enqueued is logged; losing one means a
/// consumer keeps waiting until its process is torn down.
pub async fn push_stop_signals<T, Q>(queue: &Q, stop: T, count: usize, put_timeout: Duration)
where
    T: Clone + Send + 'static,
    Q: BoundedQueue<T>,
{
    for _ in 0..count {
        match push_with_retries(queue, stop.clone(), put_timeout, STOP_PUSH_ATTEMPTS).await {
            Ok(true) => {}
            Ok(false) => {
                error!("failed to enqueue a stop signal");
            }
            Err(err) => {
                error!("failed to enqueue a stop signal: {err}");
            }
        }
    }
}

/// Polls a queue until it reports empty.
pub async fn wait_until_empty<T, Q>(queue: &Q)
where
    T: Send + 'static,
    Q: BoundedQueue<T>,
{
    loop {
        match queue.len().await {
            Ok(0) => return,
            Ok(_) => tokio::time::sleep(DRAIN_POLL_INTERVAL).await,
            Err(err) => {
                error!("failed to read queue length while draining: {err}");
                tokio::time::sleep(Duration::from_secs(1)).await;
            }
        }
    }
}
