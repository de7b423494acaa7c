//! End-to-end pipeline runs over the in-memory backing.

use std::fs;
use std::time::Duration;

use inventory::channel::{BoundedQueue, MemoryQueue};
use inventory::error::ErrorKind;
use inventory::pipeline::{Pipeline, PipelineSettings};
use inventory::test_utils::{FailingCollector, StaticCollector, inventory_task, sample_payload};
use inventory::types::{Command, InventoryPayload, ResultItem, TaskEnvelope, TaskItem};
use inventory::workers::InventoryWorkerPool;
use inventory_telemetry::tracing::init_test_tracing;
use tempfile::TempDir;

const PUT_TIMEOUT: Duration = Duration::from_millis(200);

struct Harness {
    dir: TempDir,
    task_queue: MemoryQueue<TaskItem>,
    result_queue: MemoryQueue<ResultItem>,
}

impl Harness {
    fn new() -> Self {
        init_test_tracing();

        Self {
            dir: TempDir::new().unwrap(),
            task_queue: MemoryQueue::new(10),
            result_queue: MemoryQueue::new(10),
        }
    }

    fn payload_path(&self) -> std::path::PathBuf {
        self.dir.path().join("payload.json")
    }

    fn settings(&self, worker_count: usize) -> PipelineSettings {
        PipelineSettings {
            worker_count,
            put_timeout: PUT_TIMEOUT,
            payload_path: self.payload_path(),
        }
    }

    fn commands_file(&self, contents: &str) -> std::path::PathBuf {
        let path = self.dir.path().join("commands.txt");
        fs::write(&path, contents).unwrap();

        path
    }
}

#[tokio::test]
async fn full_run_persists_every_successful_result() {
    let harness = Harness::new();
    let collector = StaticCollector::new(sample_payload());
    let mut pipeline = Pipeline::new(
        harness.task_queue.clone(),
        harness.result_queue.clone(),
        collector.clone(),
        harness.settings(2),
    );

    pipeline.start().unwrap();
    let commands = harness.commands_file("inventory\nreboot\ninventory\ninventory\n");
    let accepted = pipeline.dispatch_file(&commands).await.unwrap();
    let summary = pipeline.shutdown_and_wait().await.unwrap().unwrap();

    assert_eq!(accepted, 3);
    assert_eq!(summary.stopped_workers, 2);
    assert_eq!(summary.persisted, 3);
    assert_eq!(summary.discarded, 0);
    assert_eq!(collector.collected(), 3);

    let decoded: InventoryPayload =
        serde_json::from_str(&fs::read_to_string(harness.payload_path()).unwrap()).unwrap();
    assert_eq!(decoded, sample_payload());

    // Shutdown completeness: nothing left in either channel.
    assert_eq!(harness.task_queue.len().await.unwrap(), 0);
    assert_eq!(harness.result_queue.len().await.unwrap(), 0);
}

#[tokio::test]
async fn collector_failures_are_discarded_not_persisted() {
    let harness = Harness::new();
    let mut pipeline = Pipeline::new(
        harness.task_queue.clone(),
        harness.result_queue.clone(),
        FailingCollector::new("registry unavailable"),
        harness.settings(1),
    );

    pipeline.start().unwrap();
    let commands = harness.commands_file("inventory\ninventory\n");
    let accepted = pipeline.dispatch_file(&commands).await.unwrap();
    let summary = pipeline.shutdown_and_wait().await.unwrap().unwrap();

    assert_eq!(accepted, 2);
    assert_eq!(summary.stopped_workers, 1);
    assert_eq!(summary.persisted, 0);
    assert_eq!(summary.discarded, 2);
    assert!(!harness.payload_path().exists());
}

#[tokio::test]
async fn missing_commands_file_fails_dispatch_but_not_shutdown() {
    let harness = Harness::new();
    let mut pipeline = Pipeline::new(
        harness.task_queue.clone(),
        harness.result_queue.clone(),
        StaticCollector::new(sample_payload()),
        harness.settings(2),
    );

    pipeline.start().unwrap();
    let err = pipeline
        .dispatch_file(&harness.dir.path().join("missing.txt"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::CommandSourceMissing);

    let summary = pipeline.shutdown_and_wait().await.unwrap().unwrap();
    assert_eq!(summary.stopped_workers, 2);
    assert_eq!(summary.persisted, 0);
}

#[tokio::test]
async fn shutdown_without_dispatch_terminates_cleanly() {
    let harness = Harness::new();
    let mut pipeline = Pipeline::new(
        harness.task_queue.clone(),
        harness.result_queue.clone(),
        StaticCollector::new(sample_payload()),
        harness.settings(3),
    );

    pipeline.start().unwrap();
    let summary = pipeline.shutdown_and_wait().await.unwrap().unwrap();

    assert_eq!(summary.stopped_workers, 3);
    assert_eq!(summary.persisted, 0);
    assert_eq!(summary.discarded, 0);
}

#[tokio::test]
async fn workers_skip_unknown_commands() {
    let harness = Harness::new();
    let collector = StaticCollector::new(sample_payload());
    let mut pipeline = Pipeline::new(
        harness.task_queue.clone(),
        harness.result_queue.clone(),
        collector.clone(),
        harness.settings(1),
    );

    // An unsupported command can only reach the queue by bypassing the
    // dispatcher; the worker must still contain it.
    let rogue = TaskEnvelope::new(Command::parse("reboot").unwrap());
    assert!(
        harness
            .task_queue
            .push(TaskItem::Task(rogue), PUT_TIMEOUT)
            .await
            .unwrap()
    );

    pipeline.start().unwrap();
    let summary = pipeline.shutdown_and_wait().await.unwrap().unwrap();

    assert_eq!(summary.stopped_workers, 1);
    assert_eq!(summary.persisted, 0);
    assert_eq!(collector.collected(), 0);
}

#[tokio::test]
async fn result_overflow_is_dropped_and_the_worker_keeps_going() {
    init_test_tracing();
    let task_queue = MemoryQueue::<TaskItem>::new(10);
    // A stalled sink: the result queue holds a single item and nothing
    // consumes it, so every push after the first overflows.
    let result_queue = MemoryQueue::<ResultItem>::new(1);
    let collector = StaticCollector::new(sample_payload());

    let pool = InventoryWorkerPool::start(
        1,
        task_queue.clone(),
        result_queue.clone(),
        collector.clone(),
        Duration::from_millis(30),
    );

    for _ in 0..3 {
        assert!(
            task_queue
                .push(TaskItem::Task(inventory_task()), PUT_TIMEOUT)
                .await
                .unwrap()
        );
    }
    assert!(task_queue.push(TaskItem::stop(), PUT_TIMEOUT).await.unwrap());

    pool.join_with_timeout(Duration::from_secs(2)).await;

    // Every task was processed; the overflowing results were dropped after
    // their bounded retries rather than wedging the worker.
    assert_eq!(collector.collected(), 3);
    assert_eq!(result_queue.len().await.unwrap(), 1);
    assert_eq!(task_queue.len().await.unwrap(), 0);
}

#[tokio::test]
async fn starting_twice_is_rejected() {
    let harness = Harness::new();
    let mut pipeline = Pipeline::new(
        harness.task_queue.clone(),
        harness.result_queue.clone(),
        StaticCollector::new(sample_payload()),
        harness.settings(1),
    );

    pipeline.start().unwrap();
    assert!(pipeline.start().is_err());

    pipeline.shutdown_and_wait().await.unwrap();
}
