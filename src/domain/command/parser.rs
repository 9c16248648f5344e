//! Command parser: pasted HTTP-client invocation to reusable payload template

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::extract::{
    first_match, normalize, unescape_shell_quotes, BODY_STRATEGIES, ENDPOINT_STRATEGIES,
    TOKEN_STRATEGIES,
};
use super::inference::{infer_input_field, DEFAULT_INPUT_FIELD_PRIORITY};

/// Parser configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParserConfig {
    /// Field names tried when inferring the input field, highest priority first
    #[serde(default = "default_input_field_priority")]
    pub input_field_priority: Vec<String>,
}

fn default_input_field_priority() -> Vec<String> {
    DEFAULT_INPUT_FIELD_PRIORITY
        .iter()
        .map(|name| name.to_string())
        .collect()
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            input_field_priority: default_input_field_priority(),
        }
    }
}

/// Successful parse of a command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseResult {
    pub body_template: Map<String, Value>,
    pub input_field: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

/// Turns command text into a [`ParseResult`].
///
/// Parsing is pure. `None` means the text could not be understood; a body
/// that is not valid JSON is never partially accepted.
#[derive(Debug, Clone, Default)]
pub struct CommandParser {
    config: ParserConfig,
}

impl CommandParser {
    pub fn new(config: ParserConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    pub fn parse(&self, command: &str) -> Option<ParseResult> {
        let text = normalize(command);

        let raw_body = first_match(BODY_STRATEGIES, &text)?;
        let body_template = parse_body(&raw_body)?;
        let input_field = infer_input_field(&body_template, &self.config.input_field_priority)?;

        Some(ParseResult {
            body_template,
            input_field,
            endpoint: first_match(ENDPOINT_STRATEGIES, &text),
            token: first_match(TOKEN_STRATEGIES, &text),
        })
    }
}

/// Parse a body as a JSON object, shell-unescaped first, then verbatim
fn parse_body(raw: &str) -> Option<Map<String, Value>> {
    let unescaped = unescape_shell_quotes(raw);

    let value = serde_json::from_str::<Value>(&unescaped)
        .or_else(|_| serde_json::from_str::<Value>(raw))
        .ok()?;

    match value {
        Value::Object(object) => Some(object),
        _ => None,
    }
}
