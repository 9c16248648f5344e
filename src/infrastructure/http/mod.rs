//! Outbound HTTP to workflow endpoints

mod workflow_invoker;

pub use workflow_invoker::HttpWorkflowInvoker;
