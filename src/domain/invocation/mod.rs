//! Upstream invocation contract

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::workflow::WorkflowConfig;
use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// A 2xx answer with a JSON body
#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamSuccess {
    pub response: Value,
    pub duration: Duration,
}

/// A failed call: non-2xx status or transport fault, with elapsed time
#[derive(Debug)]
pub struct UpstreamFailure {
    pub error: DomainError,
    pub duration: Duration,
}

impl UpstreamFailure {
    pub fn new(error: DomainError, duration: Duration) -> Self {
        Self { error, duration }
    }
}

pub type InvocationResult = Result<UpstreamSuccess, UpstreamFailure>;

/// Performs one POST of a payload to a workflow endpoint
#[cfg_attr(test, automock)]
#[async_trait]
pub trait WorkflowInvoker: Send + Sync {
    async fn invoke(&self, workflow: &WorkflowConfig, payload: &Value) -> InvocationResult;
}

/// Milliseconds as reported to call accounting
pub fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
