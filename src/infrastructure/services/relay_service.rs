//! Relay service - resolves a workflow, calls it and relays the normalized result

use std::sync::Arc;

use serde_json::Value;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tracing::{debug, info, warn};

use crate::domain::invocation::duration_ms;
use crate::domain::relay::chunk_content;
use crate::domain::{
    build_payload, normalize, CallOutcome, CallRecorder, DomainError, NormalizedResult,
    PayloadExtras, RelayConfig, StreamEvent, WorkflowConfig, WorkflowInvoker, WorkflowRepository,
};

/// Error text for an empty message
pub const MESSAGE_REQUIRED: &str = "Message is required";

/// Capacity of the per-stream event channel
const STREAM_BUFFER: usize = 32;

/// One generation request from an end user
#[derive(Debug, Clone, Default)]
pub struct GenerateRequest {
    pub message: String,
    pub workflow_id: Option<String>,
    pub image_count: Option<u32>,
}

impl GenerateRequest {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Default::default()
        }
    }

    pub fn with_workflow_id(mut self, workflow_id: impl Into<String>) -> Self {
        self.workflow_id = Some(workflow_id.into());
        self
    }

    pub fn with_image_count(mut self, image_count: u32) -> Self {
        self.image_count = Some(image_count);
        self
    }
}

/// Runs the build, invoke and normalize pipeline for chat requests
pub struct WorkflowRelayService {
    workflows: Arc<dyn WorkflowRepository>,
    invoker: Arc<dyn WorkflowInvoker>,
    recorder: Arc<dyn CallRecorder>,
    relay: RelayConfig,
}

impl std::fmt::Debug for WorkflowRelayService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkflowRelayService")
            .field("relay", &self.relay)
            .finish()
    }
}

impl WorkflowRelayService {
    pub fn new(
        workflows: Arc<dyn WorkflowRepository>,
        invoker: Arc<dyn WorkflowInvoker>,
        recorder: Arc<dyn CallRecorder>,
        relay: RelayConfig,
    ) -> Self {
        Self {
            workflows,
            invoker,
            recorder,
            relay,
        }
    }

    pub fn relay_config(&self) -> &RelayConfig {
        &self.relay
    }

    /// The requested workflow if it exists, else the default one.
    ///
    /// Fails with `ConfigurationMissing` when nothing usable is stored.
    pub async fn resolve_workflow(
        &self,
        workflow_id: Option<&str>,
    ) -> Result<WorkflowConfig, DomainError> {
        let requested = match workflow_id.filter(|id| !id.is_empty()) {
            Some(id) => self.workflows.get(id).await?,
            None => None,
        };

        let workflow = match requested {
            Some(workflow) => Some(workflow),
            None => self.workflows.get_default().await?,
        };

        match workflow {
            Some(workflow) if workflow.is_configured() => Ok(workflow),
            Some(workflow) => {
                warn!(workflow_id = %workflow.id(), "Workflow has no endpoint or token");
                Err(DomainError::configuration_missing())
            }
            None => Err(DomainError::configuration_missing()),
        }
    }

    /// Single-shot generation. Image extras are sent only when the caller
    /// asked for them.
    pub async fn generate(&self, request: &GenerateRequest) -> Result<NormalizedResult, DomainError> {
        let extras = request
            .image_count
            .map(|image_count| PayloadExtras { image_count });

        self.run(request, extras.as_ref()).await
    }

    /// Streaming generation. The returned stream always starts with `start`,
    /// carries exactly one `complete` or `error`, and ends with `[DONE]`
    /// unless the receiver is dropped first.
    pub fn stream(self: Arc<Self>, request: GenerateRequest) -> ReceiverStream<StreamEvent> {
        let (tx, rx) = mpsc::channel::<StreamEvent>(STREAM_BUFFER);

        tokio::spawn(async move {
            self.relay_to(request, tx).await;
        });

        ReceiverStream::new(rx)
    }

    pub(crate) async fn relay_to(&self, request: GenerateRequest, tx: mpsc::Sender<StreamEvent>) {
        if tx.send(StreamEvent::Start).await.is_err() {
            return;
        }

        let extras = PayloadExtras {
            image_count: request.image_count.unwrap_or(0),
        };

        let terminal = match self.run(&request, Some(&extras)).await {
            Ok(result) => {
                if result.has_content() {
                    let content = result.content.as_deref().unwrap_or_default();
                    if !self.emit_chunks(content, &tx).await {
                        debug!("Client disconnected during stream");
                        return;
                    }
                }
                StreamEvent::complete(&result)
            }
            Err(error) => StreamEvent::error(error.public_message()),
        };

        if tx.send(terminal).await.is_err() {
            return;
        }

        let _ = tx.send(StreamEvent::Done).await;
    }

    /// Returns `false` once the receiver is gone
    async fn emit_chunks(&self, content: &str, tx: &mpsc::Sender<StreamEvent>) -> bool {
        let delay = self.relay.chunk_delay();
        let chunks = chunk_content(content, self.relay.chunk_size);
        let last = chunks.len().saturating_sub(1);

        for (index, chunk) in chunks.into_iter().enumerate() {
            if tx.send(StreamEvent::content(chunk)).await.is_err() {
                return false;
            }

            if index < last && !delay.is_zero() {
                tokio::select! {
                    _ = tokio::time::sleep(delay) => {}
                    _ = tx.closed() => return false,
                }
            }
        }

        true
    }

    async fn run(
        &self,
        request: &GenerateRequest,
        extras: Option<&PayloadExtras>,
    ) -> Result<NormalizedResult, DomainError> {
        if request.message.trim().is_empty() {
            return Err(DomainError::validation(MESSAGE_REQUIRED));
        }

        let workflow = self.resolve_workflow(request.workflow_id.as_deref()).await?;
        let payload = build_payload(&workflow, &request.message, extras);
        let response = self.invoke_workflow(&workflow, &payload).await?;

        Ok(normalize(&response))
    }

    async fn invoke_workflow(
        &self,
        workflow: &WorkflowConfig,
        payload: &Value,
    ) -> Result<Value, DomainError> {
        match self.invoker.invoke(workflow, payload).await {
            Ok(success) => {
                let elapsed = duration_ms(success.duration);
                info!(
                    workflow_id = %workflow.id(),
                    duration_ms = elapsed,
                    "Workflow call completed"
                );
                self.record(CallOutcome::workflow_success(elapsed));
                Ok(success.response)
            }
            Err(failure) => {
                let elapsed = duration_ms(failure.duration);
                warn!(
                    workflow_id = %workflow.id(),
                    duration_ms = elapsed,
                    error = %failure.error,
                    "Workflow call failed"
                );
                self.record(CallOutcome::workflow_failure(failure.error.to_string(), elapsed));
                Err(failure.error)
            }
        }
    }

    /// Hand the outcome to the recorder without holding up the caller
    fn record(&self, outcome: CallOutcome) {
        let recorder = self.recorder.clone();

        tokio::spawn(async move {
            if let Err(e) = recorder.record(outcome).await {
                warn!(error = %e, "Failed to record workflow call");
            }
        });
    }
}
