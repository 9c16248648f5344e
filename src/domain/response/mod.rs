//! Normalization of upstream workflow responses
//!
//! Upstreams return one of several undocumented shapes with no version
//! tag. Each canonical field is resolved from an ordered list of keys, so
//! supporting another family means appending keys here.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Keys holding the title, in resolution order
const TITLE_KEYS: &[&str] = &["title", "article_title"];

/// Keys holding the generated text, in resolution order
const CONTENT_KEYS: &[&str] = &["formatted_article", "article", "generated_article"];

/// Key holding a complete image list
const IMAGE_LIST_KEY: &str = "images";

/// Keys assembled into an image list when no complete list is present;
/// a single cover image always comes first
const COVER_IMAGE_KEY: &str = "cover_image_url";
const ILLUSTRATION_KEY: &str = "illustration_urls";

const IMAGE_POSITIONS_KEY: &str = "image_positions";

/// The only result shape the relay and the browser ever see
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedResult {
    pub title: Option<String>,
    pub content: Option<String>,
    pub images: Vec<String>,
    pub image_positions: Vec<Value>,
}

impl NormalizedResult {
    pub fn has_content(&self) -> bool {
        self.content.as_deref().is_some_and(|content| !content.is_empty())
    }
}

/// Map any upstream response to a [`NormalizedResult`]. Never fails.
pub fn normalize(response: &Value) -> NormalizedResult {
    let Some(object) = response.as_object() else {
        return NormalizedResult::default();
    };

    NormalizedResult {
        title: first_text(object, TITLE_KEYS),
        content: first_text(object, CONTENT_KEYS),
        images: resolve_images(object),
        image_positions: object
            .get(IMAGE_POSITIONS_KEY)
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default(),
    }
}

fn first_text(object: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| object.get(*key).and_then(Value::as_str))
        .find(|text| !text.is_empty())
        .map(str::to_string)
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn resolve_images(object: &Map<String, Value>) -> Vec<String> {
    let images = string_list(object.get(IMAGE_LIST_KEY));
    if !images.is_empty() {
        return images;
    }

    object
        .get(COVER_IMAGE_KEY)
        .and_then(Value::as_str)
        .filter(|cover| !cover.is_empty())
        .map(str::to_string)
        .into_iter()
        .chain(string_list(object.get(ILLUSTRATION_KEY)))
        .collect()
}
