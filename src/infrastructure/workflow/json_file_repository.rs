//! Workflow repository persisted as a single JSON document

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::debug;

use crate::domain::workflow::{apply_default, apply_remove, apply_replace, prepare_insert};
use crate::domain::{DomainError, WorkflowConfig, WorkflowRepository};
use crate::infrastructure::json_file::{read_optional, write_atomic};

/// File name used inside the data directory
pub const WORKFLOWS_FILE: &str = "workflows.json";

#[derive(Debug, Default, Serialize, Deserialize)]
struct WorkflowDocument {
    #[serde(default)]
    workflows: Vec<WorkflowConfig>,
}

/// Stores `{ "workflows": [...] }` on disk.
///
/// Every operation re-reads the file so edits made by other tools are
/// picked up. Writes are serialized through a mutex and land via rename; a
/// missing file is an empty collection.
#[derive(Debug)]
pub struct JsonFileWorkflowRepository {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileWorkflowRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Repository backed by `<data_dir>/workflows.json`
    pub fn in_dir(data_dir: impl AsRef<Path>) -> Self {
        Self::new(data_dir.as_ref().join(WORKFLOWS_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<WorkflowDocument, DomainError> {
        let Some(raw) = read_optional(&self.path).await? else {
            return Ok(WorkflowDocument::default());
        };

        if raw.trim().is_empty() {
            return Ok(WorkflowDocument::default());
        }

        serde_json::from_str(&raw).map_err(|e| {
            DomainError::storage(format!("Invalid workflow file {}: {}", self.path.display(), e))
        })
    }

    /// Load, mutate and save under the write lock
    async fn modify<T>(
        &self,
        change: impl FnOnce(&mut Vec<WorkflowConfig>) -> Result<T, DomainError>,
    ) -> Result<T, DomainError> {
        let _guard = self.lock.lock().await;
        let mut document = self.load().await?;

        let outcome = change(&mut document.workflows)?;
        write_atomic(&self.path, &document).await?;

        Ok(outcome)
    }
}

#[async_trait]
impl WorkflowRepository for JsonFileWorkflowRepository {
    async fn get(&self, id: &str) -> Result<Option<WorkflowConfig>, DomainError> {
        let document = self.load().await?;
        Ok(document
            .workflows
            .into_iter()
            .find(|w| w.id().as_str() == id))
    }

    async fn list(&self) -> Result<Vec<WorkflowConfig>, DomainError> {
        Ok(self.load().await?.workflows)
    }

    async fn create(&self, mut workflow: WorkflowConfig) -> Result<WorkflowConfig, DomainError> {
        let workflow = self
            .modify(move |workflows| {
                if workflows.iter().any(|w| w.id() == workflow.id()) {
                    return Err(DomainError::validation(format!(
                        "Workflow '{}' already exists",
                        workflow.id()
                    )));
                }

                prepare_insert(workflows, &mut workflow);
                workflows.push(workflow.clone());
                Ok(workflow)
            })
            .await?;

        debug!(workflow_id = %workflow.id(), path = %self.path.display(), "Workflow saved");
        Ok(workflow)
    }

    async fn update(&self, workflow: WorkflowConfig) -> Result<WorkflowConfig, DomainError> {
        self.modify(|workflows| apply_replace(workflows, &workflow)).await?;

        debug!(workflow_id = %workflow.id(), "Workflow updated");
        Ok(workflow)
    }

    async fn delete(&self, id: &str) -> Result<bool, DomainError> {
        // Unknown IDs leave the file untouched
        if self.get(id).await?.is_none() {
            return Ok(false);
        }

        self.modify(|workflows| Ok(apply_remove(workflows, id))).await
    }

    async fn set_default(&self, id: &str) -> Result<bool, DomainError> {
        if self.get(id).await?.is_none() {
            return Ok(false);
        }

        self.modify(|workflows| Ok(apply_default(workflows, id))).await
    }
}
