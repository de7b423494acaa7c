//! Core data types flowing through the pipeline.
//!
//! Defines the command vocabulary, the task and result envelopes exchanged
//! over the bounded queues, and the stop sentinels used by the shutdown
//! protocol. The sentinels are explicit enum variants so that they can never
//! be confused with real payload data, and their serialized form
//! (`{"control":"stop"}`) is unambiguous against both wire envelopes.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The single command the dispatcher recognizes.
pub const INVENTORY_COMMAND: &str = "inventory";

/// A normalized command string (trimmed and lower-cased).
///
/// Commands have no identity beyond their text and are never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Command(String);

impl Command {
    /// Normalizes a raw input line into a command.
    ///
    /// Returns [`None`] for blank lines, which the dispatcher skips silently.
    pub fn parse(line: &str) -> Option<Command> {
        let normalized = line.trim().to_lowercase();
        if normalized.is_empty() {
            return None;
        }

        Some(Command(normalized))
    }

    /// Whether this is the single recognized command.
    pub fn is_supported(&self) -> bool {
        self.0 == INVENTORY_COMMAND
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Collected inventory data: category name → field name → string value.
///
/// [`BTreeMap`] keeps key ordering stable, which the persisted record format
/// relies on.
pub type InventoryPayload = BTreeMap<String, BTreeMap<String, String>>;

/// A task as it travels from dispatch to a worker.
///
/// Wire shape on the durable backing:
/// `{"task_id": "...", "command": "inventory", "created_at": "<ISO-8601 UTC>"}`.
/// The in-memory backing carries the same envelope without ever serializing it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskEnvelope {
    pub task_id: Uuid,
    pub command: Command,
    pub created_at: DateTime<Utc>,
}

impl TaskEnvelope {
    /// Wraps a command in a fresh envelope with a generated id and the
    /// current enqueue time.
    pub fn new(command: Command) -> Self {
        Self {
            task_id: Uuid::new_v4(),
            command,
            created_at: Utc::now(),
        }
    }
}

/// Outcome of a single collection attempt, tagged by `status` on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum CollectionOutcome {
    Ok { payload: InventoryPayload },
    Error { error: String },
}

/// A tagged result as it travels from a worker to the sink.
///
/// Wire shape: `{"task_id": "...", "status": "ok"|"error",
/// "payload"|"error": ..., "ts": "<ISO-8601 UTC>"}`. The `task_id` correlates
/// the result with the task that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultEnvelope {
    pub task_id: Uuid,
    #[serde(flatten)]
    pub outcome: CollectionOutcome,
    pub ts: DateTime<Utc>,
}

/// The serialized form of a stop sentinel: `{"control":"stop"}`.
///
/// Distinct from any valid task or result envelope, so consumers on the
/// durable backing can always tell control flow from payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StopMessage {
    control: StopTag,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
enum StopTag {
    Stop,
}

impl StopMessage {
    fn new() -> Self {
        Self {
            control: StopTag::Stop,
        }
    }
}

/// Item conveyed by the task queue: either a task or a per-worker stop signal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TaskItem {
    Stop(StopMessage),
    Task(TaskEnvelope),
}

impl TaskItem {
    pub fn stop() -> Self {
        TaskItem::Stop(StopMessage::new())
    }
}

/// Item conveyed by the result queue: either a tagged result or a per-worker
/// stop signal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResultItem {
    Stop(StopMessage),
    Result(ResultEnvelope),
}

impl ResultItem {
    pub fn stop() -> Self {
        ResultItem::Stop(StopMessage::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_parse_normalizes() {
        let command = Command::parse("  INVENTORY \n").unwrap();
        assert_eq!(command.as_str(), "inventory");
        assert!(command.is_supported());
    }

    #[test]
    fn command_parse_rejects_blank_lines() {
        assert_eq!(Command::parse(""), None);
        assert_eq!(Command::parse("   "), None);
        assert_eq!(Command::parse("\t\n"), None);
    }

    #[test]
    fn unsupported_command_is_not_recognized() {
        let command = Command::parse("reboot").unwrap();
        assert!(!command.is_supported());
    }

    #[test]
    fn task_envelope_wire_shape() {
        let task = TaskEnvelope::new(Command::parse("inventory").unwrap());
        let encoded = serde_json::to_value(TaskItem::Task(task.clone())).unwrap();

        assert_eq!(encoded["command"], "inventory");
        assert_eq!(encoded["task_id"], task.task_id.to_string());
        assert!(encoded["created_at"].is_string());
    }

    #[test]
    fn stop_sentinel_wire_shape() {
        let encoded = serde_json::to_string(&TaskItem::stop()).unwrap();
        assert_eq!(encoded, r#"{"control":"stop"}"#);
    }

    #[test]
    fn stop_sentinel_never_decodes_as_task() {
        let decoded: TaskItem = serde_json::from_str(r#"{"control":"stop"}"#).unwrap();
        assert!(matches!(decoded, TaskItem::Stop(_)));

        let task = TaskEnvelope::new(Command::parse("inventory").unwrap());
        let raw = serde_json::to_string(&TaskItem::Task(task)).unwrap();
        let decoded: TaskItem = serde_json::from_str(&raw).unwrap();
        assert!(matches!(decoded, TaskItem::Task(_)));
    }

    #[test]
    fn result_envelope_status_tagging() {
        let mut payload = InventoryPayload::new();
        payload.insert(
            "os".to_string(),
            BTreeMap::from([("ProductName".to_string(), "Windows 11".to_string())]),
        );

        let ok = ResultEnvelope {
            task_id: Uuid::new_v4(),
            outcome: CollectionOutcome::Ok { payload },
            ts: Utc::now(),
        };
        let encoded = serde_json::to_value(ResultItem::Result(ok)).unwrap();
        assert_eq!(encoded["status"], "ok");
        assert_eq!(encoded["payload"]["os"]["ProductName"], "Windows 11");

        let failed = ResultEnvelope {
            task_id: Uuid::new_v4(),
            outcome: CollectionOutcome::Error {
                error: "registry unavailable".to_string(),
            },
            ts: Utc::now(),
        };
        let encoded = serde_json::to_value(ResultItem::Result(failed)).unwrap();
        assert_eq!(encoded["status"], "error");
        assert_eq!(encoded["error"], "registry unavailable");
    }
}
