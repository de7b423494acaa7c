//! Command intake: turns a command file into queued tasks.

use std::path::Path;
use std::time::Duration;

use tracing::{error, info};

use crate::channel::BoundedQueue;
use crate::error::{ErrorKind, InvResult};
use crate::inv_error;
use crate::types::{Command, TaskEnvelope, TaskItem};

/// Reads newline-separated commands and enqueues a task per supported one.
///
/// The dispatcher is deliberately strict about what enters the pipeline:
/// blank lines are skipped silently, unsupported commands are logged and
/// skipped, and a task that cannot be enqueued within the configured timeout
/// is dropped after a single attempt. Work admitted under backpressure is
/// work the pipeline has promised to finish; refusing at the door is the
/// cheaper failure.
#[derive(Debug, Clone)]
pub struct Dispatcher<Q> {
    task_queue: Q,
    put_timeout: Duration,
}

impl<Q> Dispatcher<Q>
where
    Q: BoundedQueue<TaskItem>,
{
    pub fn new(task_queue: Q, put_timeout: Duration) -> Self {
        Self {
            task_queue,
            put_timeout,
        }
    }

    /// Dispatches every supported command in `path`.
    ///
    /// Returns the number of tasks actually accepted by the queue. Fails only
    /// when the file itself is missing or unreadable; per-command problems
    /// are contained and logged.
    pub async fn dispatch_file(&self, path: &Path) -> InvResult<u64> {
        let contents = tokio::fs::read_to_string(path).await.map_err(|err| {
            let kind = if err.kind() == std::io::ErrorKind::NotFound {
                ErrorKind::CommandSourceMissing
            } else {
                ErrorKind::CommandSourceUnreadable
            };

            inv_error!(
                kind,
                "failed to read commands file",
                detail = path.display().to_string(),
                source: err
            )
        })?;

        let mut accepted = 0u64;
        for line in contents.lines() {
            let Some(command) = Command::parse(line) else {
                continue;
            };

            if !command.is_supported() {
                info!(command = command.as_str(), "skipping unsupported command");
                continue;
            }

            let task = TaskEnvelope::new(command);
            let task_id = task.task_id;
            if self
                .task_queue
                .push(TaskItem::Task(task), self.put_timeout)
                .await?
            {
                accepted += 1;
            } else {
                error!(%task_id, "task queue full, dropping task");
            }
        }

        info!(accepted, "dispatch finished");

        Ok(accepted)
    }
}
