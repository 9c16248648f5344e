//! Public workflow listing

use axum::extract::State;

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json, PublicWorkflowsResponse};
use crate::domain::PublicWorkflow;

/// GET /api/workflows
pub async fn list_public_workflows(
    State(state): State<AppState>,
) -> Result<Json<PublicWorkflowsResponse>, ApiError> {
    let workflows = state.workflows.list().await?;

    Ok(Json(PublicWorkflowsResponse {
        workflows: workflows.iter().map(PublicWorkflow::from).collect(),
    }))
}
