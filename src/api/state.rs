//! Application state for shared services

use std::sync::Arc;

use crate::domain::{
    CallRecorder, CommandParser, ParserConfig, RelayConfig, WorkflowInvoker, WorkflowRepository,
};
use crate::infrastructure::services::{WorkflowRelayService, WorkflowService};

/// Shared services handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub relay: Arc<WorkflowRelayService>,
    pub workflow_service: Arc<WorkflowService>,
    pub workflows: Arc<dyn WorkflowRepository>,
    pub call_log: Arc<dyn CallRecorder>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState").finish_non_exhaustive()
    }
}

impl AppState {
    pub fn new(
        workflows: Arc<dyn WorkflowRepository>,
        invoker: Arc<dyn WorkflowInvoker>,
        call_log: Arc<dyn CallRecorder>,
        relay: RelayConfig,
        parser: ParserConfig,
    ) -> Self {
        let relay = Arc::new(WorkflowRelayService::new(
            workflows.clone(),
            invoker,
            call_log.clone(),
            relay,
        ));
        let workflow_service = Arc::new(WorkflowService::new(
            workflows.clone(),
            CommandParser::new(parser),
        ));

        Self {
            relay,
            workflow_service,
            workflows,
            call_log,
        }
    }
}
