//! Workflow record storage

mod in_memory_repository;
mod json_file_repository;

pub use in_memory_repository::InMemoryWorkflowRepository;
pub use json_file_repository::{JsonFileWorkflowRepository, WORKFLOWS_FILE};
