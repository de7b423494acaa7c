use std::path::PathBuf;
use std::process::ExitCode;

use inventory::channel::MemoryQueue;
use inventory::collector::OsCollector;
use inventory::pipeline::{Pipeline, PipelineSettings};
use inventory_config::shared::AgentConfig;
use tracing::{error, info};

/// Runs one dispatch cycle over in-memory queues.
///
/// The exit code reflects only whether dispatch itself succeeded; worker and
/// persistence failures are logged and contained by the pipeline.
pub async fn run(config: AgentConfig, commands: PathBuf) -> anyhow::Result<ExitCode> {
    info!("agent started");

    let task_queue = MemoryQueue::new(config.queue.tasks_maxsize);
    let result_queue = MemoryQueue::new(config.queue.results_maxsize);

    let mut pipeline = Pipeline::new(
        task_queue,
        result_queue,
        OsCollector::new(),
        PipelineSettings {
            worker_count: config.pool.inventory_workers,
            put_timeout: config.queue.put_timeout(),
            payload_path: config.payload_path.clone(),
        },
    );
    pipeline.start()?;

    let exit_code = match pipeline.dispatch_file(&commands).await {
        Ok(accepted) => {
            info!(accepted, "dispatch finished");
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("dispatch failed: {err}");
            ExitCode::FAILURE
        }
    };

    if let Some(summary) = pipeline.shutdown_and_wait().await? {
        info!(
            persisted = summary.persisted,
            discarded = summary.discarded,
            stopped_workers = summary.stopped_workers,
            "agent finished"
        );
    }

    Ok(exit_code)
}
