use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, error};

use crate::domain::invocation::{InvocationResult, UpstreamFailure, UpstreamSuccess, WorkflowInvoker};
use crate::domain::{DomainError, WorkflowConfig};

/// Workflow invoker backed by reqwest
#[derive(Debug, Clone)]
pub struct HttpWorkflowInvoker {
    client: reqwest::Client,
}

impl HttpWorkflowInvoker {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, DomainError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DomainError::internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

impl Default for HttpWorkflowInvoker {
    fn default() -> Self {
        Self::new()
    }
}

fn transport_error(error: &reqwest::Error) -> DomainError {
    DomainError::upstream_transport(error.to_string(), error.is_timeout())
}

#[async_trait]
impl WorkflowInvoker for HttpWorkflowInvoker {
    async fn invoke(&self, workflow: &WorkflowConfig, payload: &Value) -> InvocationResult {
        let started = Instant::now();

        let response = self
            .client
            .post(workflow.endpoint())
            .bearer_auth(workflow.token())
            .json(payload)
            .send()
            .await
            .map_err(|e| UpstreamFailure::new(transport_error(&e), started.elapsed()))?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let duration = started.elapsed();

            error!(
                workflow_id = %workflow.id(),
                status = status.as_u16(),
                body = %body,
                "Workflow API error"
            );

            return Err(UpstreamFailure::new(
                DomainError::upstream_http(status.as_u16(), body),
                duration,
            ));
        }

        let body = response.json::<Value>().await.map_err(|e| {
            UpstreamFailure::new(
                DomainError::upstream_transport(
                    format!("Invalid JSON response: {}", e),
                    e.is_timeout(),
                ),
                started.elapsed(),
            )
        })?;

        let duration = started.elapsed();
        debug!(
            workflow_id = %workflow.id(),
            duration_ms = duration.as_millis() as u64,
            "Workflow call succeeded"
        );

        Ok(UpstreamSuccess {
            response: body,
            duration,
        })
    }
}
