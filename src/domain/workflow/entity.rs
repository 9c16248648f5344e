//! Workflow configuration entity

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;

/// Maximum length for workflow IDs
pub const MAX_ID_LENGTH: usize = 64;

/// Workflow identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WorkflowId(String);

impl WorkflowId {
    /// Create a workflow ID from an existing value
    pub fn new(id: impl Into<String>) -> Result<Self, DomainError> {
        let id = id.into();

        if id.is_empty() {
            return Err(DomainError::validation("Workflow ID cannot be empty"));
        }

        if id.len() > MAX_ID_LENGTH {
            return Err(DomainError::validation(format!(
                "Workflow ID cannot exceed {} characters",
                MAX_ID_LENGTH
            )));
        }

        Ok(Self(id))
    }

    /// Generate a fresh identifier
    pub fn generate() -> Self {
        Self(format!("wf-{}", uuid::Uuid::new_v4().simple()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for WorkflowId {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<WorkflowId> for String {
    fn from(id: WorkflowId) -> Self {
        id.0
    }
}

impl fmt::Display for WorkflowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Persisted configuration for one upstream workflow backend.
///
/// The relay only ever reads these records; the admin surface edits them in
/// place. `body_template` is the serialized JSON object the upstream expects
/// and `input_field` is the dotted path inside it that receives the user's
/// message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowConfig {
    id: WorkflowId,

    #[serde(default)]
    name: String,

    #[serde(default)]
    description: String,

    #[serde(default)]
    endpoint: String,

    #[serde(default)]
    token: String,

    #[serde(default, alias = "paramTemplate", skip_serializing_if = "Option::is_none")]
    body_template: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    input_field: Option<String>,

    #[serde(default)]
    is_default: bool,

    #[serde(default = "Utc::now")]
    created_at: DateTime<Utc>,

    #[serde(default = "Utc::now")]
    updated_at: DateTime<Utc>,
}

impl WorkflowConfig {
    /// Create a new workflow configuration with a generated ID
    pub fn new(
        name: impl Into<String>,
        endpoint: impl Into<String>,
        token: impl Into<String>,
    ) -> Result<Self, DomainError> {
        let name = validate_name(name.into())?;
        let endpoint = validate_endpoint(endpoint.into())?;
        let token = validate_token(token.into())?;

        let now = Utc::now();

        Ok(Self {
            id: WorkflowId::generate(),
            name,
            description: String::new(),
            endpoint,
            token,
            body_template: None,
            input_field: None,
            is_default: false,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn with_id(mut self, id: WorkflowId) -> Self {
        self.id = id;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Attach a body template together with the field that receives user input
    pub fn with_template(
        mut self,
        template: &serde_json::Map<String, serde_json::Value>,
        input_field: impl Into<String>,
    ) -> Self {
        self.body_template = Some(serde_json::Value::Object(template.clone()).to_string());
        self.input_field = Some(input_field.into());
        self
    }

    pub fn with_default(mut self, is_default: bool) -> Self {
        self.is_default = is_default;
        self
    }

    pub fn id(&self) -> &WorkflowId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn body_template(&self) -> Option<&str> {
        self.body_template.as_deref()
    }

    pub fn input_field(&self) -> Option<&str> {
        self.input_field.as_deref()
    }

    /// Template and input field, only when both are present and non-empty
    pub fn template_binding(&self) -> Option<(&str, &str)> {
        match (self.body_template(), self.input_field()) {
            (Some(template), Some(field)) if !template.is_empty() && !field.is_empty() => {
                Some((template, field))
            }
            _ => None,
        }
    }

    pub fn is_default(&self) -> bool {
        self.is_default
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Whether the record carries enough to call the upstream
    pub fn is_configured(&self) -> bool {
        !self.endpoint.trim().is_empty() && !self.token.trim().is_empty()
    }

    pub fn set_default(&mut self, is_default: bool) {
        if self.is_default != is_default {
            self.is_default = is_default;
            self.updated_at = Utc::now();
        }
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> Result<(), DomainError> {
        self.name = validate_name(name.into())?;
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
        self.updated_at = Utc::now();
    }

    pub fn set_endpoint(&mut self, endpoint: impl Into<String>) -> Result<(), DomainError> {
        self.endpoint = validate_endpoint(endpoint.into())?;
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn set_token(&mut self, token: impl Into<String>) -> Result<(), DomainError> {
        self.token = validate_token(token.into())?;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Replace the serialized body template. An empty value clears it;
    /// anything else must be a JSON object.
    pub fn set_body_template(&mut self, template: Option<String>) -> Result<(), DomainError> {
        let template = template.filter(|t| !t.trim().is_empty());

        if let Some(text) = &template {
            let is_object = serde_json::from_str::<serde_json::Value>(text)
                .map(|value| value.is_object())
                .unwrap_or(false);
            if !is_object {
                return Err(DomainError::validation(
                    "Body template must be a JSON object",
                ));
            }
        }

        self.body_template = template;
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn set_input_field(&mut self, input_field: Option<String>) {
        self.input_field = input_field.filter(|f| !f.trim().is_empty());
        self.updated_at = Utc::now();
    }
}

fn validate_name(name: String) -> Result<String, DomainError> {
    if name.trim().is_empty() {
        return Err(DomainError::validation("Name cannot be empty"));
    }
    Ok(name)
}

fn validate_endpoint(endpoint: String) -> Result<String, DomainError> {
    if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
        return Err(DomainError::validation(
            "Endpoint must start with http:// or https://",
        ));
    }
    Ok(endpoint)
}

fn validate_token(token: String) -> Result<String, DomainError> {
    if token.trim().is_empty() {
        return Err(DomainError::validation("Token cannot be empty"));
    }
    Ok(token)
}

/// Workflow summary exposed to end users (no endpoint or token)
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicWorkflow {
    pub id: String,
    pub name: String,
    pub description: String,
    pub is_default: bool,
}

impl From<&WorkflowConfig> for PublicWorkflow {
    fn from(workflow: &WorkflowConfig) -> Self {
        Self {
            id: workflow.id.as_str().to_string(),
            name: workflow.name.clone(),
            description: workflow.description.clone(),
            is_default: workflow.is_default,
        }
    }
}
