//! Request and response bodies

pub mod chat;
pub mod error;
pub mod json;
pub mod workflow;

pub use chat::{ChatRequest, ChatResponse};
pub use error::{ApiError, ApiErrorResponse};
pub use json::{Json, JsonRejection};
pub use workflow::{
    CreateWorkflowBody, ImportWorkflowBody, ParseCommandRequest, ParseCommandResponse,
    PublicWorkflowsResponse, StatsResponse, UpdateWorkflowBody, WorkflowResponse,
    WorkflowsResponse,
};
