use thiserror::Error;

/// Core domain errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    /// No usable workflow could be resolved for a request
    #[error("{message}")]
    ConfigurationMissing { message: String },

    /// The workflow endpoint answered with a non-2xx status
    #[error("Workflow API error: {status}")]
    UpstreamHttp { status: u16, body: String },

    /// The workflow endpoint could not be reached or answered garbage
    #[error("Workflow request failed: {message}")]
    UpstreamTransport { message: String, timed_out: bool },

    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

/// Message shown to end users when no workflow is configured
pub const SERVICE_NOT_CONFIGURED: &str =
    "Service is not configured yet. Please ask an administrator to add a workflow.";

impl DomainError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn configuration_missing() -> Self {
        Self::ConfigurationMissing {
            message: SERVICE_NOT_CONFIGURED.to_string(),
        }
    }

    pub fn upstream_http(status: u16, body: impl Into<String>) -> Self {
        Self::UpstreamHttp {
            status,
            body: body.into(),
        }
    }

    pub fn upstream_transport(message: impl Into<String>, timed_out: bool) -> Self {
        Self::UpstreamTransport {
            message: message.into(),
            timed_out,
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Human-readable message that is safe to hand to a browser.
    ///
    /// Upstream bodies and storage internals stay in the logs.
    pub fn public_message(&self) -> String {
        match self {
            Self::NotFound { message }
            | Self::Validation { message }
            | Self::ConfigurationMissing { message } => message.clone(),
            Self::UpstreamHttp { .. } | Self::UpstreamTransport { .. } => self.to_string(),
            Self::Storage { .. } | Self::Internal { .. } => "Internal server error".to_string(),
        }
    }
}
