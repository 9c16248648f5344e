//! Streaming relay protocol
//!
//! A finished result is re-emitted as `start`, zero or more `content`
//! chunks, one `complete` (or `error`), then the `[DONE]` sentinel.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::response::NormalizedResult;

/// Literal data of the terminal event
pub const DONE_SENTINEL: &str = "[DONE]";

/// Pacing of the synthetic typing effect
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayConfig {
    /// Characters per content event
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    /// Pause between content events, in milliseconds
    #[serde(default = "default_chunk_delay_ms")]
    pub chunk_delay_ms: u64,
}

fn default_chunk_size() -> usize {
    20
}

fn default_chunk_delay_ms() -> u64 {
    30
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            chunk_delay_ms: default_chunk_delay_ms(),
        }
    }
}

impl RelayConfig {
    pub fn chunk_delay(&self) -> Duration {
        Duration::from_millis(self.chunk_delay_ms)
    }
}

/// One event on the wire
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StreamEvent {
    Start,
    Content {
        content: String,
    },
    Complete {
        title: Option<String>,
        content: Option<String>,
        images: Vec<String>,
    },
    Error {
        error: String,
    },
    #[serde(skip)]
    Done,
}

impl StreamEvent {
    pub fn content(chunk: impl Into<String>) -> Self {
        Self::Content {
            content: chunk.into(),
        }
    }

    /// Terminal event carrying the full result
    pub fn complete(result: &NormalizedResult) -> Self {
        Self::Complete {
            title: result.title.clone(),
            content: result.content.clone(),
            images: result.images.clone(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            error: message.into(),
        }
    }

    /// Payload of the `data:` line
    pub fn data(&self) -> String {
        match self {
            Self::Done => DONE_SENTINEL.to_string(),
            event => serde_json::to_string(event).unwrap_or_default(),
        }
    }

    /// Full wire frame, `data: <payload>` plus the blank separator line
    pub fn to_frame(&self) -> String {
        format!("data: {}\n\n", self.data())
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete { .. } | Self::Error { .. })
    }
}

/// Split text into chunks of `chunk_size` characters, in order
pub fn chunk_content(content: &str, chunk_size: usize) -> Vec<String> {
    let chunk_size = chunk_size.max(1);
    let chars: Vec<char> = content.chars().collect();

    chars
        .chunks(chunk_size)
        .map(|chunk| chunk.iter().collect())
        .collect()
}
