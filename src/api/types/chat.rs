//! Chat request and response bodies

use serde::{Deserialize, Serialize};

use crate::domain::NormalizedResult;
use crate::infrastructure::services::GenerateRequest;

/// Body of both chat endpoints
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub workflow_id: Option<String>,
    #[serde(default)]
    pub image_count: Option<u32>,
}

impl From<ChatRequest> for GenerateRequest {
    fn from(request: ChatRequest) -> Self {
        Self {
            message: request.message,
            workflow_id: request.workflow_id,
            image_count: request.image_count,
        }
    }
}

/// Successful single-shot answer
#[derive(Debug, Clone, Serialize)]
pub struct ChatResponse {
    pub success: bool,
    pub data: NormalizedResult,
}

impl ChatResponse {
    pub fn new(data: NormalizedResult) -> Self {
        Self {
            success: true,
            data,
        }
    }
}
