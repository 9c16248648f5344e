//! Workflow records: the stored configuration of one upstream backend

mod entity;
mod repository;

pub use entity::{PublicWorkflow, WorkflowConfig, WorkflowId, MAX_ID_LENGTH};
pub use repository::{
    apply_default, apply_remove, apply_replace, prepare_insert, select_default, WorkflowRepository,
};

#[cfg(test)]
pub use repository::MockWorkflowRepository;
