//! Payload construction for workflow calls

use serde_json::{json, Map, Value};
use tracing::warn;

use crate::domain::workflow::WorkflowConfig;

/// Word count requested when no template tells us otherwise
pub const DEFAULT_WORD_COUNT: u32 = 800;

/// Optional request extras
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PayloadExtras {
    pub image_count: u32,
}

/// Build the JSON body sent to a workflow.
///
/// With a stored template the message is written at the template's input
/// field. Without one (or when the stored template is corrupt) a fixed
/// compatibility payload carries the message under every key name seen in
/// the wild.
pub fn build_payload(
    workflow: &WorkflowConfig,
    message: &str,
    extras: Option<&PayloadExtras>,
) -> Value {
    if let Some((template, input_field)) = workflow.template_binding() {
        match serde_json::from_str::<Value>(template) {
            Ok(Value::Object(mut body)) => {
                if !inject_at_path(&mut body, input_field, message) {
                    warn!(
                        workflow_id = %workflow.id(),
                        input_field = %input_field,
                        "Input field path not present in template, message not injected"
                    );
                }

                if let Some(extras) = extras {
                    body.insert("image_count".to_string(), json!(extras.image_count));
                    body.insert("generate_images".to_string(), json!(extras.image_count > 0));
                }

                return Value::Object(body);
            }
            Ok(_) | Err(_) => {
                warn!(
                    workflow_id = %workflow.id(),
                    "Stored body template is not a JSON object, using default payload"
                );
            }
        }
    }

    default_payload(message, extras)
}

/// Compatibility payload used when a workflow has no usable template
pub fn default_payload(message: &str, extras: Option<&PayloadExtras>) -> Value {
    let mut body = json!({
        "topic": message,
        "article_topic": message,
        "article_type": "blog",
        "article_title": "",
        "word_count": DEFAULT_WORD_COUNT,
        "expected_word_count": DEFAULT_WORD_COUNT.to_string(),
        "enable_web_search": false,
        "web_search_time_range": "",
        "search_time_range": "",
        "publish_to_wechat": false,
        "is_api_call": true,
    });

    if let (Some(extras), Some(object)) = (extras, body.as_object_mut()) {
        let wants_images = extras.image_count > 0;
        object.insert("image_count".to_string(), json!(extras.image_count));
        object.insert("generate_images".to_string(), json!(wants_images));
        object.insert("need_cover_image".to_string(), json!(wants_images));
        object.insert("illustration_count".to_string(), json!(extras.image_count));
    }

    body
}

/// Write `value` at a dotted path without creating missing branches.
///
/// A key equal to the whole path wins over a nested walk. Returns `false`
/// when some parent segment is absent or not an object.
fn inject_at_path(body: &mut Map<String, Value>, path: &str, value: &str) -> bool {
    if body.contains_key(path) {
        body.insert(path.to_string(), Value::String(value.to_string()));
        return true;
    }

    let segments: Vec<&str> = path.split('.').collect();
    let Some((leaf, parents)) = segments.split_last() else {
        return false;
    };

    let mut cursor = body;
    for segment in parents {
        match cursor.get_mut(*segment) {
            Some(Value::Object(child)) => cursor = child,
            _ => return false,
        }
    }

    cursor.insert(leaf.to_string(), Value::String(value.to_string()));
    true
}
