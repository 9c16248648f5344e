//! Infrastructure layer - Storage, outbound HTTP and services

pub mod call_log;
pub mod http;
mod json_file;
pub mod logging;
pub mod services;
pub mod workflow;
