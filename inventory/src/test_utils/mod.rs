//! Test helpers shared by unit and integration tests.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::collector::Collector;
use crate::error::{ErrorKind, InvResult};
use crate::inv_error;
use crate::types::{Command, InventoryPayload, TaskEnvelope};

/// A payload with the standard `os` category fields filled in.
pub fn sample_payload() -> InventoryPayload {
    let fields = BTreeMap::from([
        ("ProductName".to_string(), "Windows 10 Pro".to_string()),
        ("DisplayVersion".to_string(), "22H2".to_string()),
        ("CurrentBuild".to_string(), "19045".to_string()),
        ("UBR".to_string(), "3930".to_string()),
        ("InstallDate".to_string(), "1620000000".to_string()),
        ("EditionID".to_string(), "Professional".to_string()),
    ]);

    InventoryPayload::from([("os".to_string(), fields)])
}

/// A task carrying the supported command.
pub fn inventory_task() -> TaskEnvelope {
    let command = Command::parse("inventory").expect("the literal is non-blank");

    TaskEnvelope::new(command)
}

/// Collector returning a fixed payload and counting invocations.
#[derive(Debug, Clone)]
pub struct StaticCollector {
    payload: InventoryPayload,
    collected: Arc<AtomicU64>,
}

impl StaticCollector {
    pub fn new(payload: InventoryPayload) -> Self {
        Self {
            payload,
            collected: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Number of completed collect calls across all clones.
    pub fn collected(&self) -> u64 {
        self.collected.load(Ordering::SeqCst)
    }
}

impl Collector for StaticCollector {
    async fn collect(&self, _task: &TaskEnvelope) -> InvResult<InventoryPayload> {
        self.collected.fetch_add(1, Ordering::SeqCst);

        Ok(self.payload.clone())
    }
}

/// Collector that always fails with the given message.
#[derive(Debug, Clone)]
pub struct FailingCollector {
    message: String,
}

impl FailingCollector {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Collector for FailingCollector {
    async fn collect(&self, _task: &TaskEnvelope) -> InvResult<InventoryPayload> {
        Err(inv_error!(
            ErrorKind::CollectionFailed,
            "collection failed",
            detail = self.message.clone()
        ))
    }
}
