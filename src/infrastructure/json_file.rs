//! Whole-document JSON files shared by the file-backed stores

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::domain::DomainError;

/// Read a file, treating a missing one as `None`
pub(crate) async fn read_optional(path: &Path) -> Result<Option<String>, DomainError> {
    match tokio::fs::read_to_string(path).await {
        Ok(raw) => Ok(Some(raw)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(DomainError::storage(format!(
            "Failed to read {}: {}",
            path.display(),
            e
        ))),
    }
}

/// Serialize `value` to a sibling temp file, then rename it over `path`.
///
/// Readers see either the previous document or the new one, never a
/// truncated file.
pub(crate) async fn write_atomic<T>(path: &Path, value: &T) -> Result<(), DomainError>
where
    T: Serialize + ?Sized,
{
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to create data dir: {}", e)))?;
    }

    let json = serde_json::to_string_pretty(value).map_err(|e| {
        DomainError::storage(format!("Failed to serialize {}: {}", path.display(), e))
    })?;

    let tmp_path = temp_path(path);
    tokio::fs::write(&tmp_path, json).await.map_err(|e| {
        DomainError::storage(format!("Failed to write {}: {}", tmp_path.display(), e))
    })?;

    tokio::fs::rename(&tmp_path, path).await.map_err(|e| {
        DomainError::storage(format!("Failed to replace {}: {}", path.display(), e))
    })
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}
