//! Result sink: drains the result queue into the durable payload file.

use std::path::PathBuf;
use std::time::Duration;

use tracing::{error, info};

use crate::channel::BoundedQueue;
use crate::error::ErrorKind;
use crate::persist::write_record_atomic;
use crate::types::{CollectionOutcome, ResultItem};

/// Bounded wait per pop, so the stop counter is re-checked periodically.
const POP_TIMEOUT: Duration = Duration::from_millis(500);

/// What the sink saw before it terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SinkSummary {
    /// Successful payloads written to the durable store.
    pub persisted: u64,
    /// Error-tagged, invalid or malformed results that were logged and
    /// dropped, plus results whose write failed.
    pub discarded: u64,
    /// Stop sentinels consumed. Equals the worker count on a clean shutdown.
    pub stopped_workers: usize,
}

/// Consumes results until every worker has signaled completion.
///
/// Success payloads are atomically written over the single destination file.
/// Error results, empty payloads and malformed items are logged and dropped;
/// a failed write is contained per-result and never stops the loop. The
/// termination condition is exclusively the stop counter reaching
/// `worker_count` -- an idle queue alone keeps the sink waiting.
pub async fn run_result_sink<Q>(
    result_queue: Q,
    payload_path: PathBuf,
    worker_count: usize,
) -> SinkSummary
where
    Q: BoundedQueue<ResultItem>,
{
    let mut summary = SinkSummary {
        persisted: 0,
        discarded: 0,
        stopped_workers: 0,
    };

    while summary.stopped_workers < worker_count {
        let result = match result_queue.pop(Some(POP_TIMEOUT)).await {
            Ok(Some(ResultItem::Stop(_))) => {
                summary.stopped_workers += 1;
                continue;
            }
            Ok(Some(ResultItem::Result(result))) => result,
            Ok(None) => continue,
            Err(err) if err.kind() == ErrorKind::MalformedItem => {
                error!("result sink got malformed result: {err}");
                summary.discarded += 1;
                continue;
            }
            Err(err) => {
                error!("result sink failed to pop result: {err}");
                tokio::time::sleep(Duration::from_secs(1)).await;
                continue;
            }
        };

        let task_id = result.task_id;
        let payload = match result.outcome {
            CollectionOutcome::Ok { payload } if !payload.is_empty() => payload,
            CollectionOutcome::Ok { .. } => {
                error!(%task_id, "result sink got empty payload, discarding");
                summary.discarded += 1;
                continue;
            }
            CollectionOutcome::Error { error } => {
                error!(%task_id, "result sink got error payload: {error}");
                summary.discarded += 1;
                continue;
            }
        };

        match write_record_atomic(&payload_path, &payload) {
            Ok(()) => {
                info!(%task_id, path = %payload_path.display(), "payload file updated");
                summary.persisted += 1;
            }
            Err(err) => {
                error!(%task_id, "result sink failed to write payload: {err}");
                summary.discarded += 1;
            }
        }
    }

    info!(
        persisted = summary.persisted,
        discarded = summary.discarded,
        "result sink finished"
    );

    summary
}
