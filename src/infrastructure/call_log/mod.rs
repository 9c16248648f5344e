//! Call log sinks

mod in_memory_recorder;
mod json_file_recorder;

pub use in_memory_recorder::InMemoryCallRecorder;
pub use json_file_recorder::{CALL_LOG_FILE, DEFAULT_MAX_ENTRIES, JsonFileCallRecorder};
