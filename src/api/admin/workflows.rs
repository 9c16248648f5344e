//! Workflow management admin endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
};
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::{
    ApiError, CreateWorkflowBody, ImportWorkflowBody, Json, ParseCommandRequest,
    ParseCommandResponse, UpdateWorkflowBody, WorkflowResponse, WorkflowsResponse,
};
use crate::infrastructure::services::{ImportOutcome, PARSE_FAILURE};

/// GET /api/admin/workflows
pub async fn list_workflows(
    State(state): State<AppState>,
) -> Result<Json<WorkflowsResponse>, ApiError> {
    debug!("Admin listing all workflows");

    let workflows = state.workflow_service.list().await?;
    Ok(Json(WorkflowsResponse { workflows }))
}

/// POST /api/admin/workflows
pub async fn create_workflow(
    State(state): State<AppState>,
    Json(body): Json<CreateWorkflowBody>,
) -> Result<(StatusCode, Json<WorkflowResponse>), ApiError> {
    debug!(name = %body.name, "Admin creating workflow");

    let workflow = state.workflow_service.create(body.into()).await?;
    Ok((StatusCode::CREATED, Json(WorkflowResponse { workflow })))
}

/// GET /api/admin/workflows/{workflow_id}
pub async fn get_workflow(
    State(state): State<AppState>,
    Path(workflow_id): Path<String>,
) -> Result<Json<WorkflowResponse>, ApiError> {
    let workflow = state
        .workflow_service
        .get(&workflow_id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Workflow '{}' not found", workflow_id)))?;

    Ok(Json(WorkflowResponse { workflow }))
}

/// POST /api/admin/workflows/parse
pub async fn parse_command(
    State(state): State<AppState>,
    Json(request): Json<ParseCommandRequest>,
) -> Result<Json<ParseCommandResponse>, ApiError> {
    let result = state
        .workflow_service
        .parse(&request.command)
        .ok_or_else(|| ApiError::unprocessable(PARSE_FAILURE))?;

    debug!(input_field = %result.input_field, "Command parsed");

    Ok(Json(ParseCommandResponse {
        success: true,
        result,
    }))
}

/// POST /api/admin/workflows/import
pub async fn import_workflow(
    State(state): State<AppState>,
    Json(body): Json<ImportWorkflowBody>,
) -> Result<(StatusCode, Json<WorkflowResponse>), ApiError> {
    match state.workflow_service.import(body.into()).await? {
        ImportOutcome::Imported(workflow) => {
            Ok((StatusCode::CREATED, Json(WorkflowResponse { workflow })))
        }
        ImportOutcome::Unparseable => Err(ApiError::unprocessable(PARSE_FAILURE)),
    }
}

/// PUT /api/admin/workflows/{workflow_id}
pub async fn update_workflow(
    State(state): State<AppState>,
    Path(workflow_id): Path<String>,
    Json(body): Json<UpdateWorkflowBody>,
) -> Result<Json<WorkflowResponse>, ApiError> {
    debug!(workflow_id = %workflow_id, "Admin updating workflow");

    let workflow = state
        .workflow_service
        .update(&workflow_id, body.into())
        .await?;

    Ok(Json(WorkflowResponse { workflow }))
}

/// DELETE /api/admin/workflows/{workflow_id}
pub async fn delete_workflow(
    State(state): State<AppState>,
    Path(workflow_id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    debug!(workflow_id = %workflow_id, "Admin deleting workflow");

    state.workflow_service.delete(&workflow_id).await?;

    Ok(Json(serde_json::json!({
        "deleted": true,
        "id": workflow_id
    })))
}

/// POST /api/admin/workflows/{workflow_id}/default
pub async fn set_default_workflow(
    State(state): State<AppState>,
    Path(workflow_id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.workflow_service.set_default(&workflow_id).await?;

    Ok(Json(serde_json::json!({
        "success": true,
        "id": workflow_id
    })))
}
