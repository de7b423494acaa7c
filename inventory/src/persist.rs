//! Atomic persistence for collection results.

use std::io::Write;
use std::path::Path;

use serde::Serialize;
use tempfile::NamedTempFile;

use crate::error::{ErrorKind, InvResult};
use crate::inv_error;

/// Atomically replaces the file at `path` with the serialized `record`.
///
/// The record is written as pretty-printed JSON with a trailing newline to a
/// temporary file created in the destination directory, then renamed over the
/// destination. Readers of `path` observe either the previous record or the
/// new one, never a partial write. A crash at any point leaves one complete
/// record in place.
pub fn write_record_atomic<R>(path: &Path, record: &R) -> InvResult<()>
where
    R: Serialize,
{
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent).map_err(|err| {
        inv_error!(
            ErrorKind::PersistenceFailed,
            "failed to create output directory",
            detail = parent.display().to_string(),
            source: err
        )
    })?;

    let mut encoded = serde_json::to_vec_pretty(record).map_err(|err| {
        inv_error!(ErrorKind::SerializationError, "failed to encode record", source: err)
    })?;
    encoded.push(b'\n');

    // The temporary file must live in the destination directory so the final
    // rename stays on one filesystem.
    let mut temp = NamedTempFile::new_in(parent).map_err(|err| {
        inv_error!(
            ErrorKind::PersistenceFailed,
            "failed to create temporary file",
            detail = parent.display().to_string(),
            source: err
        )
    })?;
    temp.write_all(&encoded).map_err(|err| {
        inv_error!(ErrorKind::PersistenceFailed, "failed to write record", source: err)
    })?;
    temp.flush().map_err(|err| {
        inv_error!(ErrorKind::PersistenceFailed, "failed to flush record", source: err)
    })?;

    temp.persist(path).map_err(|err| {
        inv_error!(
            ErrorKind::PersistenceFailed,
            "failed to replace destination file",
            detail = path.display().to_string(),
            source: err.error
        )
    })?;

    Ok(())
}
