//! Workflow repository trait

use async_trait::async_trait;

use super::entity::WorkflowConfig;
use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// Stored workflows. Every mutation keeps at most one record flagged as
/// default.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait WorkflowRepository: Send + Sync {
    /// Get a workflow by ID
    async fn get(&self, id: &str) -> Result<Option<WorkflowConfig>, DomainError>;

    /// List all workflows in storage order
    async fn list(&self) -> Result<Vec<WorkflowConfig>, DomainError>;

    /// The workflow flagged as default, else the first one stored
    async fn get_default(&self) -> Result<Option<WorkflowConfig>, DomainError> {
        Ok(select_default(self.list().await?))
    }

    /// Store a new workflow, keeping at most one default in the collection
    async fn create(&self, workflow: WorkflowConfig) -> Result<WorkflowConfig, DomainError>;

    /// Replace the stored record with the same ID
    async fn update(&self, workflow: WorkflowConfig) -> Result<WorkflowConfig, DomainError>;

    /// Remove a workflow. Returns `false` when it did not exist.
    async fn delete(&self, id: &str) -> Result<bool, DomainError>;

    /// Flag one workflow as default and clear the rest. Returns `false`
    /// when it did not exist.
    async fn set_default(&self, id: &str) -> Result<bool, DomainError>;
}

/// Pick the default workflow out of a collection
pub fn select_default(workflows: Vec<WorkflowConfig>) -> Option<WorkflowConfig> {
    let index = workflows.iter().position(WorkflowConfig::is_default).unwrap_or(0);
    workflows.into_iter().nth(index)
}

/// Apply the single-default rule before appending `workflow` to `existing`
pub fn prepare_insert(existing: &mut [WorkflowConfig], workflow: &mut WorkflowConfig) {
    if existing.is_empty() {
        workflow.set_default(true);
    }

    if workflow.is_default() {
        for other in existing.iter_mut() {
            other.set_default(false);
        }
    }
}

/// Swap in `workflow` for the record with the same ID
pub fn apply_replace(
    existing: &mut [WorkflowConfig],
    workflow: &WorkflowConfig,
) -> Result<(), DomainError> {
    let index = existing
        .iter()
        .position(|w| w.id() == workflow.id())
        .ok_or_else(|| DomainError::not_found(format!("Workflow '{}' not found", workflow.id())))?;

    if workflow.is_default() {
        for other in existing.iter_mut() {
            other.set_default(false);
        }
    }

    existing[index] = workflow.clone();
    Ok(())
}

/// Remove the record with `id`, promoting the first survivor when the
/// default was removed
pub fn apply_remove(existing: &mut Vec<WorkflowConfig>, id: &str) -> bool {
    let Some(index) = existing.iter().position(|w| w.id().as_str() == id) else {
        return false;
    };

    let removed = existing.remove(index);
    if removed.is_default() {
        if let Some(first) = existing.first_mut() {
            first.set_default(true);
        }
    }

    true
}

/// Make `id` the only default
pub fn apply_default(existing: &mut [WorkflowConfig], id: &str) -> bool {
    if !existing.iter().any(|w| w.id().as_str() == id) {
        return false;
    }

    for workflow in existing.iter_mut() {
        let is_target = workflow.id().as_str() == id;
        workflow.set_default(is_target);
    }

    true
}
