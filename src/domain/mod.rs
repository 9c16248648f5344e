//! Domain layer - Core adapter logic and entities

pub mod call_log;
pub mod command;
pub mod error;
pub mod invocation;
pub mod payload;
pub mod relay;
pub mod response;
pub mod workflow;

pub use call_log::{CallLogEntry, CallOutcome, CallRecorder, TodayStats};
pub use command::{CommandParser, ParseResult, ParserConfig};
pub use error::DomainError;
pub use invocation::{InvocationResult, UpstreamFailure, UpstreamSuccess, WorkflowInvoker};
pub use payload::{build_payload, PayloadExtras};
pub use relay::{RelayConfig, StreamEvent};
pub use response::{normalize, NormalizedResult};
pub use workflow::{PublicWorkflow, WorkflowConfig, WorkflowId, WorkflowRepository};
