//! Input field inference over a parsed body template

use serde_json::{Map, Value};

/// Field names that usually carry the end user's input, highest priority first
pub const DEFAULT_INPUT_FIELD_PRIORITY: &[&str] = &[
    "article_topic",
    "topic",
    "input",
    "message",
    "content",
    "query",
    "question",
    "prompt",
    "text",
    "user_input",
];

/// Find the dotted path of the field that should receive user input.
///
/// Each object level is searched by exact (case-insensitive) name first,
/// then by substring, before descending into nested objects. When nothing
/// matches at any depth the first string-valued top-level field is used,
/// then the first field of any kind. Returns `None` only for `{}`.
pub fn infer_input_field(body: &Map<String, Value>, priority: &[String]) -> Option<String> {
    find_by_priority(body, priority)
        .or_else(|| {
            body.iter()
                .find(|(_, value)| value.is_string())
                .map(|(key, _)| key.clone())
        })
        .or_else(|| body.keys().next().cloned())
}

fn find_by_priority(object: &Map<String, Value>, priority: &[String]) -> Option<String> {
    let exact = |field: &str, pattern: &str| field.eq_ignore_ascii_case(pattern);
    let contains = |field: &str, pattern: &str| {
        field
            .to_ascii_lowercase()
            .contains(&pattern.to_ascii_lowercase())
    };

    let passes: [&dyn Fn(&str, &str) -> bool; 2] = [&exact, &contains];

    for matches in passes {
        for pattern in priority {
            if let Some(key) = object.keys().find(|key| matches(key.as_str(), pattern.as_str())) {
                return Some(key.clone());
            }
        }
    }

    object.iter().find_map(|(key, value)| match value {
        Value::Object(child) => {
            find_by_priority(child, priority).map(|path| format!("{key}.{path}"))
        }
        _ => None,
    })
}
