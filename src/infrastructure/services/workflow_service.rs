//! Workflow service - imports pasted commands and manages stored workflows

use std::sync::Arc;

use tracing::info;

use crate::domain::{CommandParser, DomainError, ParseResult, WorkflowConfig, WorkflowRepository};

/// Message returned when a command cannot be understood
pub const PARSE_FAILURE: &str = "Could not parse the command, check its format";

/// Request to import a workflow from command text
#[derive(Debug, Clone, Default)]
pub struct ImportWorkflowRequest {
    pub name: String,
    pub description: Option<String>,
    pub command: String,
    /// Used instead of the parsed endpoint when present
    pub endpoint: Option<String>,
    /// Used instead of the parsed token when present
    pub token: Option<String>,
    pub is_default: bool,
}

/// Outcome of an import
#[derive(Debug, Clone, PartialEq)]
pub enum ImportOutcome {
    Imported(WorkflowConfig),
    Unparseable,
}

/// Request to create a workflow from individual fields
#[derive(Debug, Clone, Default)]
pub struct CreateWorkflowRequest {
    pub name: String,
    pub description: Option<String>,
    pub endpoint: String,
    pub token: String,
    /// Serialized JSON object sent as the request body
    pub body_template: Option<String>,
    pub input_field: Option<String>,
    pub is_default: bool,
}

/// Partial update; `None` leaves a field unchanged and an empty template or
/// input field clears it
#[derive(Debug, Clone, Default)]
pub struct UpdateWorkflowRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub endpoint: Option<String>,
    pub token: Option<String>,
    pub body_template: Option<String>,
    pub input_field: Option<String>,
    pub is_default: Option<bool>,
}

impl UpdateWorkflowRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    pub fn with_input_field(mut self, input_field: impl Into<String>) -> Self {
        self.input_field = Some(input_field.into());
        self
    }

    pub fn with_default(mut self, is_default: bool) -> Self {
        self.is_default = Some(is_default);
        self
    }
}

pub struct WorkflowService {
    workflows: Arc<dyn WorkflowRepository>,
    parser: CommandParser,
}

impl std::fmt::Debug for WorkflowService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkflowService").finish()
    }
}

impl WorkflowService {
    pub fn new(workflows: Arc<dyn WorkflowRepository>, parser: CommandParser) -> Self {
        Self { workflows, parser }
    }

    pub fn parse(&self, command: &str) -> Option<ParseResult> {
        self.parser.parse(command)
    }

    /// Parse and store. Nothing is written unless parsing and validation
    /// both succeed.
    pub async fn import(&self, request: ImportWorkflowRequest) -> Result<ImportOutcome, DomainError> {
        let Some(parsed) = self.parser.parse(&request.command) else {
            return Ok(ImportOutcome::Unparseable);
        };

        let endpoint = pick(request.endpoint, parsed.endpoint)
            .ok_or_else(|| DomainError::validation("Endpoint is required"))?;
        let token = pick(request.token, parsed.token)
            .ok_or_else(|| DomainError::validation("Token is required"))?;

        let mut workflow = WorkflowConfig::new(request.name, endpoint, token)?
            .with_template(&parsed.body_template, parsed.input_field)
            .with_default(request.is_default);

        if let Some(description) = request.description {
            workflow = workflow.with_description(description);
        }

        let workflow = self.workflows.create(workflow).await?;
        info!(
            workflow_id = %workflow.id(),
            input_field = workflow.input_field().unwrap_or_default(),
            "Workflow imported"
        );

        Ok(ImportOutcome::Imported(workflow))
    }

    /// Create a workflow from fields entered by hand
    pub async fn create(
        &self,
        request: CreateWorkflowRequest,
    ) -> Result<WorkflowConfig, DomainError> {
        if request.name.trim().is_empty()
            || request.endpoint.trim().is_empty()
            || request.token.trim().is_empty()
        {
            return Err(DomainError::validation(
                "Name, endpoint, and token are required",
            ));
        }

        let mut workflow = WorkflowConfig::new(request.name, request.endpoint, request.token)?
            .with_default(request.is_default);

        if let Some(description) = request.description {
            workflow = workflow.with_description(description);
        }
        workflow.set_body_template(request.body_template)?;
        workflow.set_input_field(request.input_field);

        let workflow = self.workflows.create(workflow).await?;
        info!(workflow_id = %workflow.id(), "Workflow created");

        Ok(workflow)
    }

    pub async fn get(&self, id: &str) -> Result<Option<WorkflowConfig>, DomainError> {
        self.workflows.get(id).await
    }

    pub async fn list(&self) -> Result<Vec<WorkflowConfig>, DomainError> {
        self.workflows.list().await
    }

    /// Update an existing workflow in place
    pub async fn update(
        &self,
        id: &str,
        request: UpdateWorkflowRequest,
    ) -> Result<WorkflowConfig, DomainError> {
        let mut workflow = self
            .workflows
            .get(id)
            .await?
            .ok_or_else(|| not_found(id))?;

        if let Some(name) = request.name {
            workflow.set_name(name)?;
        }

        if let Some(description) = request.description {
            workflow.set_description(description);
        }

        if let Some(endpoint) = request.endpoint {
            workflow.set_endpoint(endpoint)?;
        }

        if let Some(token) = request.token {
            workflow.set_token(token)?;
        }

        if let Some(template) = request.body_template {
            workflow.set_body_template(Some(template))?;
        }

        if let Some(input_field) = request.input_field {
            workflow.set_input_field(Some(input_field));
        }

        if let Some(is_default) = request.is_default {
            workflow.set_default(is_default);
        }

        let workflow = self.workflows.update(workflow).await?;
        info!(workflow_id = %workflow.id(), "Workflow updated");

        Ok(workflow)
    }

    /// Delete a workflow; the first remaining one inherits the default flag
    pub async fn delete(&self, id: &str) -> Result<(), DomainError> {
        if !self.workflows.delete(id).await? {
            return Err(not_found(id));
        }

        info!(workflow_id = %id, "Workflow deleted");
        Ok(())
    }

    pub async fn set_default(&self, id: &str) -> Result<(), DomainError> {
        if !self.workflows.set_default(id).await? {
            return Err(not_found(id));
        }

        info!(workflow_id = %id, "Default workflow changed");
        Ok(())
    }
}

fn not_found(id: &str) -> DomainError {
    DomainError::not_found(format!("Workflow '{}' not found", id))
}

fn pick(explicit: Option<String>, parsed: Option<String>) -> Option<String> {
    explicit
        .filter(|value| !value.trim().is_empty())
        .or(parsed)
}
