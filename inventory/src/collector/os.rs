//! Operating system inventory sourced from the platform.
//!
//! On Windows the collector reads the `CurrentVersion` registry key, which is
//! where product name, build and install information live. Missing registry
//! values map to empty strings rather than errors, so a partially populated
//! machine still yields a usable record. Other platforms fill in what the
//! standard library exposes and leave the remaining fields empty.

use std::collections::BTreeMap;

use crate::collector::Collector;
use crate::error::InvResult;
use crate::types::{InventoryPayload, TaskEnvelope};

/// The category name under which OS fields are reported.
pub const OS_CATEGORY: &str = "os";

/// Collects operating system information from the local machine.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsCollector;

impl OsCollector {
    pub fn new() -> Self {
        Self
    }
}

impl Collector for OsCollector {
    async fn collect(&self, _task: &TaskEnvelope) -> InvResult<InventoryPayload> {
        let mut payload = InventoryPayload::new();
        payload.insert(OS_CATEGORY.to_string(), read_os_fields()?);

        Ok(payload)
    }
}

#[cfg(windows)]
fn read_os_fields() -> InvResult<BTreeMap<String, String>> {
    use winreg::RegKey;
    use winreg::enums::HKEY_LOCAL_MACHINE;

    use crate::error::ErrorKind;
    use crate::inv_error;

    const CURRENT_VERSION_KEY: &str = r"Software\Microsoft\Windows NT\CurrentVersion";

    let key = RegKey::predef(HKEY_LOCAL_MACHINE)
        .open_subkey(CURRENT_VERSION_KEY)
        .map_err(|err| {
            inv_error!(
                ErrorKind::CollectionFailed,
                "failed to open the windows version registry key",
                detail = CURRENT_VERSION_KEY,
                source: err
            )
        })?;

    let mut display_version = read_registry_value(&key, "DisplayVersion");
    if display_version.is_empty() {
        // Pre-20H2 systems carry the release only under the older name.
        display_version = read_registry_value(&key, "ReleaseId");
    }

    Ok(BTreeMap::from([
        (
            "ProductName".to_string(),
            read_registry_value(&key, "ProductName"),
        ),
        ("DisplayVersion".to_string(), display_version),
        (
            "CurrentBuild".to_string(),
            read_registry_value(&key, "CurrentBuild"),
        ),
        ("UBR".to_string(), read_registry_value(&key, "UBR")),
        (
            "InstallDate".to_string(),
            read_registry_value(&key, "InstallDate"),
        ),
        (
            "EditionID".to_string(),
            read_registry_value(&key, "EditionID"),
        ),
    ]))
}

/// Reads a registry value as a string, accepting both `REG_SZ` and
/// `REG_DWORD` values. A missing or unreadable value becomes an empty string.
#[cfg(windows)]
fn read_registry_value(key: &winreg::RegKey, name: &str) -> String {
    if let Ok(value) = key.get_value::<String, _>(name) {
        return value;
    }
    if let Ok(value) = key.get_value::<u32, _>(name) {
        return value.to_string();
    }

    String::new()
}

#[cfg(not(windows))]
fn read_os_fields() -> InvResult<BTreeMap<String, String>> {
    Ok(BTreeMap::from([
        ("ProductName".to_string(), std::env::consts::OS.to_string()),
        ("DisplayVersion".to_string(), String::new()),
        ("CurrentBuild".to_string(), String::new()),
        ("UBR".to_string(), String::new()),
        ("InstallDate".to_string(), String::new()),
        (
            "EditionID".to_string(),
            std::env::consts::ARCH.to_string(),
        ),
    ]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Command;

    #[tokio::test]
    async fn os_category_is_always_present() {
        let task = TaskEnvelope::new(Command::parse("inventory").unwrap());
        let payload = OsCollector::new().collect(&task).await.unwrap();

        let fields = payload.get(OS_CATEGORY).unwrap();
        for field in [
            "ProductName",
            "DisplayVersion",
            "CurrentBuild",
            "UBR",
            "InstallDate",
            "EditionID",
        ] {
            assert!(fields.contains_key(field), "missing field {field}");
        }
    }
}
