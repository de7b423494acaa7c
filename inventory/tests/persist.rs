//! Atomic persistence of payload records.

use std::fs;

use inventory::persist::write_record_atomic;
use inventory::test_utils::sample_payload;
use inventory::types::InventoryPayload;
use tempfile::TempDir;

#[test]
fn writes_pretty_json_with_trailing_newline() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("payload.json");

    write_record_atomic(&path, &sample_payload()).unwrap();

    let contents = fs::read_to_string(&path).unwrap();
    assert!(contents.ends_with('\n'));
    // Pretty-printed output is indented with two spaces.
    assert!(contents.contains("  \"os\""));

    let decoded: InventoryPayload = serde_json::from_str(&contents).unwrap();
    assert_eq!(decoded, sample_payload());
}

#[test]
fn creates_missing_parent_directories() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("deeper").join("payload.json");

    write_record_atomic(&path, &sample_payload()).unwrap();

    assert!(path.is_file());
}

#[test]
fn replaces_previous_record() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("payload.json");

    let mut first = sample_payload();
    first
        .get_mut("os")
        .unwrap()
        .insert("DisplayVersion".to_string(), "21H2".to_string());
    write_record_atomic(&path, &first).unwrap();
    write_record_atomic(&path, &sample_payload()).unwrap();

    let decoded: InventoryPayload =
        serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(decoded, sample_payload());
}

#[test]
fn no_temporary_files_remain() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("payload.json");

    write_record_atomic(&path, &sample_payload()).unwrap();

    let entries: Vec<_> = fs::read_dir(dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name())
        .collect();
    assert_eq!(entries, vec!["payload.json"]);
}

#[test]
fn concurrent_writers_leave_a_complete_record() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("payload.json");

    std::thread::scope(|scope| {
        for worker in 0..4 {
            let path = &path;
            scope.spawn(move || {
                for round in 0..25 {
                    let mut payload = sample_payload();
                    payload
                        .get_mut("os")
                        .unwrap()
                        .insert("UBR".to_string(), format!("{worker}-{round}"));
                    write_record_atomic(path, &payload).unwrap();
                }
            });
        }
    });

    // Whichever write finished last, the file parses as one full record.
    let decoded: InventoryPayload =
        serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert!(decoded.contains_key("os"));
}
