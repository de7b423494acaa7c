use inventory::channel::RedisQueue;
use inventory::channel::redis::connect_pool;
use inventory::collector::OsCollector;
use inventory::pipeline::{JOIN_TIMEOUT, push_stop_signals, wait_until_empty};
use inventory::types::{ResultItem, TaskItem};
use inventory::workers::InventoryWorkerPool;
use inventory_config::shared::WorkerConfig;
use tracing::info;

/// Runs the worker pool against the shared Redis queues until a termination
/// signal arrives, then performs the worker side of the shutdown protocol:
/// stop signals onto the task queue, task drain, pool join, and one
/// completion signal per worker onto the result queue for the writer.
pub async fn run(config: WorkerConfig) -> anyhow::Result<()> {
    let pool = connect_pool(&config.redis).await?;
    let task_queue = RedisQueue::<TaskItem>::new(
        pool.clone(),
        config.redis.task_queue_key.clone(),
        config.queue.tasks_maxsize,
    );
    let result_queue = RedisQueue::<ResultItem>::new(
        pool,
        config.redis.result_queue_key.clone(),
        config.queue.results_maxsize,
    );

    let worker_count = config.pool.inventory_workers;
    let put_timeout = config.queue.put_timeout();
    let worker_pool = InventoryWorkerPool::start(
        worker_count,
        task_queue.clone(),
        result_queue.clone(),
        OsCollector::new(),
        put_timeout,
    );
    info!(worker_count, "worker service started");

    shutdown_signal().await;
    info!("termination signal received, stopping workers");

    push_stop_signals(&task_queue, TaskItem::stop(), worker_count, put_timeout).await;
    wait_until_empty(&task_queue).await;
    worker_pool.join_with_timeout(JOIN_TIMEOUT).await;

    push_stop_signals(&result_queue, ResultItem::stop(), worker_count, put_timeout).await;
    info!("worker service finished");

    Ok(())
}

#[cfg(unix)]
async fn shutdown_signal() {
    use tokio::signal::unix::{SignalKind, signal};

    let mut sigterm = match signal(SignalKind::terminate()) {
        Ok(sigterm) => sigterm,
        Err(err) => {
            tracing::error!("failed to install SIGTERM handler: {err}");
            let _ = tokio::signal::ctrl_c().await;
            return;
        }
    };

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {}
        _ = sigterm.recv() => {}
    }
}

#[cfg(not(unix))]
async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
