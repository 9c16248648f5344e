//! In-memory call recorder

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::{CallLogEntry, CallOutcome, CallRecorder, DomainError};

/// Bounded in-memory call log
#[derive(Debug)]
pub struct InMemoryCallRecorder {
    entries: RwLock<Vec<CallLogEntry>>,
    max_entries: usize,
}

impl InMemoryCallRecorder {
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
            max_entries: max_entries.max(1),
        }
    }
}

#[cfg(test)]
impl InMemoryCallRecorder {
    /// Poll until at least `count` entries are stored or five seconds pass
    pub async fn wait_for_entries(&self, count: usize) -> Vec<CallLogEntry> {
        let deadline = tokio::time::Instant::now() + std::time::Duration::from_secs(5);

        loop {
            let entries = self.entries.read().await.clone();
            if entries.len() >= count || tokio::time::Instant::now() >= deadline {
                return entries;
            }
            tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        }
    }
}

impl Default for InMemoryCallRecorder {
    fn default() -> Self {
        Self::new(super::DEFAULT_MAX_ENTRIES)
    }
}

#[async_trait]
impl CallRecorder for InMemoryCallRecorder {
    async fn record(&self, outcome: CallOutcome) -> Result<(), DomainError> {
        let mut entries = self.entries.write().await;
        entries.push(CallLogEntry::from_outcome(outcome));

        if entries.len() > self.max_entries {
            let excess = entries.len() - self.max_entries;
            entries.drain(..excess);
        }

        Ok(())
    }

    async fn entries(&self) -> Result<Vec<CallLogEntry>, DomainError> {
        Ok(self.entries.read().await.clone())
    }
}
