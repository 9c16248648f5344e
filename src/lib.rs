//! Workflow relay
//!
//! Adapts end-user chat requests to hosted workflow endpoints:
//! - Parses pasted HTTP-client commands into reusable body templates
//! - Builds per-request payloads and calls the workflow with bearer auth
//! - Normalizes heterogeneous responses into one result shape
//! - Relays the result to browsers as a paced event stream

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use api::state::AppState;
use domain::{CallRecorder, WorkflowInvoker, WorkflowRepository};
use infrastructure::{
    call_log::JsonFileCallRecorder, http::HttpWorkflowInvoker,
    workflow::JsonFileWorkflowRepository,
};
use tracing::info;

/// Create the application state with default configuration
pub fn create_app_state() -> anyhow::Result<AppState> {
    create_app_state_with_config(&AppConfig::default())
}

/// Create the application state with custom configuration
pub fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    let data_dir = &config.storage.data_dir;
    info!(data_dir = %data_dir.display(), "Using JSON file storage");

    let workflows: Arc<dyn WorkflowRepository> =
        Arc::new(JsonFileWorkflowRepository::in_dir(data_dir));
    let call_log: Arc<dyn CallRecorder> = Arc::new(JsonFileCallRecorder::in_dir(
        data_dir,
        config.call_log.max_entries,
    ));

    let invoker: Arc<dyn WorkflowInvoker> = match config.upstream.timeout() {
        Some(timeout) => {
            info!(timeout_secs = timeout.as_secs(), "Upstream timeout enabled");
            Arc::new(HttpWorkflowInvoker::with_timeout(timeout)?)
        }
        None => Arc::new(HttpWorkflowInvoker::new()),
    };

    Ok(AppState::new(
        workflows,
        invoker,
        call_log,
        config.relay.clone(),
        config.parser.clone(),
    ))
}
