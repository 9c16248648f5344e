//! Admin API endpoints for managing workflows
//!
//! Authentication is expected in front of these routes.

pub mod stats;
pub mod workflows;

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use super::state::AppState;

/// Create admin API router
pub fn create_admin_router() -> Router<AppState> {
    Router::new()
        .route("/workflows", get(workflows::list_workflows))
        .route("/workflows", post(workflows::create_workflow))
        .route("/workflows/parse", post(workflows::parse_command))
        .route("/workflows/import", post(workflows::import_workflow))
        .route("/workflows/{workflow_id}", get(workflows::get_workflow))
        .route("/workflows/{workflow_id}", put(workflows::update_workflow))
        .route("/workflows/{workflow_id}", delete(workflows::delete_workflow))
        .route(
            "/workflows/{workflow_id}/default",
            post(workflows::set_default_workflow),
        )
        .route("/stats", get(stats::get_stats))
}
