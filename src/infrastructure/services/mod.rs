//! Infrastructure services

mod relay_service;
mod workflow_service;

pub use relay_service::{GenerateRequest, WorkflowRelayService, MESSAGE_REQUIRED};
pub use workflow_service::{
    CreateWorkflowRequest, ImportOutcome, ImportWorkflowRequest, UpdateWorkflowRequest,
    WorkflowService, PARSE_FAILURE,
};
