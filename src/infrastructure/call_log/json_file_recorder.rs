//! Call log persisted as a bounded JSON document

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::warn;

use crate::domain::{CallLogEntry, CallOutcome, CallRecorder, DomainError};
use crate::infrastructure::json_file::{read_optional, write_atomic};

/// File name used inside the data directory
pub const CALL_LOG_FILE: &str = "api-logs.json";

/// Default number of retained entries
pub const DEFAULT_MAX_ENTRIES: usize = 1000;

#[derive(Debug, Default, Serialize, Deserialize)]
struct CallLogDocument {
    #[serde(default)]
    logs: Vec<CallLogEntry>,
}

/// Appends call outcomes to `{ "logs": [...] }` on disk, keeping only the
/// newest `max_entries`. Appends are serialized so concurrent records are
/// never lost.
#[derive(Debug)]
pub struct JsonFileCallRecorder {
    path: PathBuf,
    max_entries: usize,
    lock: Mutex<()>,
}

impl JsonFileCallRecorder {
    pub fn new(path: impl Into<PathBuf>, max_entries: usize) -> Self {
        Self {
            path: path.into(),
            max_entries: max_entries.max(1),
            lock: Mutex::new(()),
        }
    }

    pub fn in_dir(data_dir: impl AsRef<Path>, max_entries: usize) -> Self {
        Self::new(data_dir.as_ref().join(CALL_LOG_FILE), max_entries)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<Vec<CallLogEntry>, DomainError> {
        let Some(raw) = read_optional(&self.path).await? else {
            return Ok(Vec::new());
        };

        if raw.trim().is_empty() {
            return Ok(Vec::new());
        }

        // A damaged log is not worth failing requests over
        match serde_json::from_str::<CallLogDocument>(&raw) {
            Ok(document) => Ok(document.logs),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Call log unreadable, starting fresh");
                Ok(Vec::new())
            }
        }
    }

    async fn save(&self, logs: Vec<CallLogEntry>) -> Result<(), DomainError> {
        write_atomic(&self.path, &CallLogDocument { logs }).await
    }
}

#[async_trait]
impl CallRecorder for JsonFileCallRecorder {
    async fn record(&self, outcome: CallOutcome) -> Result<(), DomainError> {
        let _guard = self.lock.lock().await;
        let mut entries = self.load().await?;

        entries.push(CallLogEntry::from_outcome(outcome));
        if entries.len() > self.max_entries {
            let excess = entries.len() - self.max_entries;
            entries.drain(..excess);
        }

        self.save(entries).await
    }

    async fn entries(&self) -> Result<Vec<CallLogEntry>, DomainError> {
        self.load().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_record_appends() {
        let dir = TempDir::new().unwrap();
        let recorder = JsonFileCallRecorder::in_dir(dir.path(), DEFAULT_MAX_ENTRIES);

        recorder.record(CallOutcome::workflow_success(12)).await.unwrap();
        recorder
            .record(CallOutcome::workflow_failure("Workflow API error: 500", 7))
            .await
            .unwrap();

        let entries = recorder.entries().await.unwrap();
        assert_eq!(entries.len(), 2);
        assert!(entries[0].success);
        assert_eq!(entries[1].error.as_deref(), Some("Workflow API error: 500"));
        assert_eq!(entries[1].duration, Some(7));
    }

    #[tokio::test]
    async fn test_keeps_newest_entries() {
        let dir = TempDir::new().unwrap();
        let recorder = JsonFileCallRecorder::in_dir(dir.path(), 3);

        for ms in 0..5 {
            recorder.record(CallOutcome::workflow_success(ms)).await.unwrap();
        }

        let durations: Vec<Option<u64>> = recorder
            .entries()
            .await
            .unwrap()
            .iter()
            .map(|e| e.duration)
            .collect();
        assert_eq!(durations, vec![Some(2), Some(3), Some(4)]);
    }

    #[tokio::test]
    async fn test_recent_is_newest_first() {
        let dir = TempDir::new().unwrap();
        let recorder = JsonFileCallRecorder::in_dir(dir.path(), 10);

        for ms in 0..4 {
            recorder.record(CallOutcome::workflow_success(ms)).await.unwrap();
        }

        let recent = recorder.recent(2).await.unwrap();
        assert_eq!(recent[0].duration, Some(3));
        assert_eq!(recent[1].duration, Some(2));
    }

    #[tokio::test]
    async fn test_concurrent_records_are_not_lost() {
        let dir = TempDir::new().unwrap();
        let recorder = Arc::new(JsonFileCallRecorder::in_dir(dir.path(), 100));

        let handles: Vec<_> = (0..20)
            .map(|ms| {
                let recorder = recorder.clone();
                tokio::spawn(async move {
                    recorder.record(CallOutcome::workflow_success(ms)).await.unwrap();
                })
            })
            .collect();

        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(recorder.entries().await.unwrap().len(), 20);
    }

    #[tokio::test]
    async fn test_appends_to_existing_log_document() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CALL_LOG_FILE);
        std::fs::write(
            &path,
            r#"{
  "logs": [
    {
      "id": "1714557600000-a1b2c3",
      "timestamp": "2024-05-01T10:00:00.000Z",
      "type": "coze",
      "action": "workflow-generate",
      "success": true,
      "duration": 5400
    },
    {
      "id": "1714557660000-d4e5f6",
      "timestamp": "2024-05-01T10:01:00.000Z",
      "type": "deepseek",
      "action": "guide-questions",
      "success": false,
      "error": "timeout"
    }
  ]
}"#,
        )
        .unwrap();

        let recorder = JsonFileCallRecorder::new(&path, 10);
        assert_eq!(recorder.entries().await.unwrap().len(), 2);

        recorder.record(CallOutcome::workflow_success(9)).await.unwrap();

        let entries = recorder.entries().await.unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].backend_kind, "coze");
        assert_eq!(entries[1].error.as_deref(), Some("timeout"));
        assert_eq!(entries[2].backend_kind, "workflow");

        let raw = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["logs"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_corrupt_log_starts_fresh() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CALL_LOG_FILE);
        std::fs::write(&path, "{ \"logs\": [ broken").unwrap();

        let recorder = JsonFileCallRecorder::new(&path, 10);
        assert!(recorder.entries().await.unwrap().is_empty());

        recorder.record(CallOutcome::workflow_success(1)).await.unwrap();
        assert_eq!(recorder.entries().await.unwrap().len(), 1);
    }
}
