//! Workflow listing, parsing and import bodies

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::{CallLogEntry, ParseResult, PublicWorkflow, TodayStats, WorkflowConfig};
use crate::infrastructure::services::{
    CreateWorkflowRequest, ImportWorkflowRequest, UpdateWorkflowRequest,
};

#[derive(Debug, Clone, Serialize)]
pub struct PublicWorkflowsResponse {
    pub workflows: Vec<PublicWorkflow>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WorkflowsResponse {
    pub workflows: Vec<WorkflowConfig>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WorkflowResponse {
    pub workflow: WorkflowConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ParseCommandRequest {
    #[serde(default)]
    pub command: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ParseCommandResponse {
    pub success: bool,
    pub result: ParseResult,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportWorkflowBody {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub command: String,
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub is_default: bool,
}

impl From<ImportWorkflowBody> for ImportWorkflowRequest {
    fn from(body: ImportWorkflowBody) -> Self {
        Self {
            name: body.name,
            description: body.description,
            command: body.command,
            endpoint: body.endpoint,
            token: body.token,
            is_default: body.is_default,
        }
    }
}

/// Manual workflow entry
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateWorkflowBody {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub endpoint: String,
    #[serde(default)]
    pub token: String,
    /// JSON object, or the same object serialized as a string
    #[serde(default, alias = "paramTemplate")]
    pub body_template: Option<Value>,
    #[serde(default)]
    pub input_field: Option<String>,
    #[serde(default)]
    pub is_default: bool,
}

impl From<CreateWorkflowBody> for CreateWorkflowRequest {
    fn from(body: CreateWorkflowBody) -> Self {
        Self {
            name: body.name,
            description: body.description,
            endpoint: body.endpoint,
            token: body.token,
            body_template: body.body_template.map(template_text),
            input_field: body.input_field,
            is_default: body.is_default,
        }
    }
}

/// Partial workflow update; absent fields are left as they are
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateWorkflowBody {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default, alias = "paramTemplate")]
    pub body_template: Option<Value>,
    #[serde(default)]
    pub input_field: Option<String>,
    #[serde(default)]
    pub is_default: Option<bool>,
}

impl From<UpdateWorkflowBody> for UpdateWorkflowRequest {
    fn from(body: UpdateWorkflowBody) -> Self {
        Self {
            name: body.name,
            description: body.description,
            endpoint: body.endpoint,
            token: body.token,
            body_template: body.body_template.map(template_text),
            input_field: body.input_field,
            is_default: body.is_default,
        }
    }
}

fn template_text(template: Value) -> String {
    match template {
        Value::String(text) => text,
        other => other.to_string(),
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub today: TodayStats,
    pub recent: Vec<CallLogEntry>,
}
