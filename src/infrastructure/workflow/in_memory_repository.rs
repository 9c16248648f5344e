//! In-memory workflow repository implementation

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::workflow::{apply_default, apply_remove, apply_replace, prepare_insert};
use crate::domain::{DomainError, WorkflowConfig, WorkflowRepository};

/// In-memory implementation of WorkflowRepository, preserving insertion order
#[derive(Debug)]
pub struct InMemoryWorkflowRepository {
    workflows: Arc<RwLock<Vec<WorkflowConfig>>>,
}

impl InMemoryWorkflowRepository {
    /// Create a new empty repository
    pub fn new() -> Self {
        Self {
            workflows: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Create a repository pre-populated with workflows, stored as given
    pub fn with_workflows(workflows: Vec<WorkflowConfig>) -> Self {
        Self {
            workflows: Arc::new(RwLock::new(workflows)),
        }
    }
}

impl Default for InMemoryWorkflowRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WorkflowRepository for InMemoryWorkflowRepository {
    async fn get(&self, id: &str) -> Result<Option<WorkflowConfig>, DomainError> {
        let workflows = self.workflows.read().await;
        Ok(workflows.iter().find(|w| w.id().as_str() == id).cloned())
    }

    async fn list(&self) -> Result<Vec<WorkflowConfig>, DomainError> {
        let workflows = self.workflows.read().await;
        Ok(workflows.clone())
    }

    async fn create(&self, mut workflow: WorkflowConfig) -> Result<WorkflowConfig, DomainError> {
        let mut workflows = self.workflows.write().await;

        if workflows.iter().any(|w| w.id() == workflow.id()) {
            return Err(DomainError::validation(format!(
                "Workflow '{}' already exists",
                workflow.id()
            )));
        }

        prepare_insert(&mut workflows, &mut workflow);
        workflows.push(workflow.clone());
        Ok(workflow)
    }

    async fn update(&self, workflow: WorkflowConfig) -> Result<WorkflowConfig, DomainError> {
        let mut workflows = self.workflows.write().await;
        apply_replace(&mut workflows, &workflow)?;
        Ok(workflow)
    }

    async fn delete(&self, id: &str) -> Result<bool, DomainError> {
        let mut workflows = self.workflows.write().await;
        Ok(apply_remove(&mut workflows, id))
    }

    async fn set_default(&self, id: &str) -> Result<bool, DomainError> {
        let mut workflows = self.workflows.write().await;
        Ok(apply_default(&mut workflows, id))
    }
}
