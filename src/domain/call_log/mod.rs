//! Call accounting: one append-only record per upstream invocation

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// Backend kind reported for every workflow call
pub const WORKFLOW_BACKEND: &str = "workflow";

/// Action reported for content generation calls
pub const GENERATE_ACTION: &str = "workflow-generate";

/// Outcome of one upstream call, as reported by the relay
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallOutcome {
    pub backend_kind: String,
    pub action: String,
    pub success: bool,
    pub error: Option<String>,
    pub duration_ms: Option<u64>,
}

impl CallOutcome {
    pub fn workflow_success(duration_ms: u64) -> Self {
        Self {
            backend_kind: WORKFLOW_BACKEND.to_string(),
            action: GENERATE_ACTION.to_string(),
            success: true,
            error: None,
            duration_ms: Some(duration_ms),
        }
    }

    pub fn workflow_failure(error: impl Into<String>, duration_ms: u64) -> Self {
        Self {
            backend_kind: WORKFLOW_BACKEND.to_string(),
            action: GENERATE_ACTION.to_string(),
            success: false,
            error: Some(error.into()),
            duration_ms: Some(duration_ms),
        }
    }
}

/// Stored call record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallLogEntry {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "type")]
    pub backend_kind: String,
    pub action: String,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u64>,
}

impl CallLogEntry {
    pub fn from_outcome(outcome: CallOutcome) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            backend_kind: outcome.backend_kind,
            action: outcome.action,
            success: outcome.success,
            error: outcome.error,
            duration: outcome.duration_ms,
        }
    }
}

/// Daily call statistics
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TodayStats {
    pub total_calls: usize,
    pub success_calls: usize,
    pub failed_calls: usize,
    pub workflow_calls: usize,
    /// Whole percent; 100 when nothing was called
    pub success_rate: u32,
}

impl TodayStats {
    pub fn from_entries(entries: &[CallLogEntry], day: NaiveDate) -> Self {
        let today: Vec<&CallLogEntry> = entries
            .iter()
            .filter(|entry| entry.timestamp.date_naive() == day)
            .collect();

        let total_calls = today.len();
        let success_calls = today.iter().filter(|entry| entry.success).count();
        let workflow_calls = today
            .iter()
            .filter(|entry| entry.backend_kind == WORKFLOW_BACKEND)
            .count();

        let success_rate = if total_calls == 0 {
            100
        } else {
            ((success_calls as f64 / total_calls as f64) * 100.0).round() as u32
        };

        Self {
            total_calls,
            success_calls,
            failed_calls: total_calls - success_calls,
            workflow_calls,
            success_rate,
        }
    }
}

/// Sink for call outcomes.
///
/// `record` may be invoked concurrently from many requests; each call
/// appends exactly one entry.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait CallRecorder: Send + Sync {
    /// Append one outcome
    async fn record(&self, outcome: CallOutcome) -> Result<(), DomainError>;

    /// All retained entries, oldest first
    async fn entries(&self) -> Result<Vec<CallLogEntry>, DomainError>;

    /// The newest `limit` entries, newest first
    async fn recent(&self, limit: usize) -> Result<Vec<CallLogEntry>, DomainError> {
        let entries = self.entries().await?;
        Ok(entries.into_iter().rev().take(limit).collect())
    }
}
