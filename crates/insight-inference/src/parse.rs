//! Recover a task list from free-form model output.
//!
//! Models are asked for a bare JSON array but routinely wrap it in prose or
//! markdown fences, or return a `{"tasks": [...]}` object. Nothing here
//! fails: output that cannot be read becomes an empty list.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value as JsonValue;
use tracing::{debug, warn};

use insight_core::RawTask;

/// First array whose first element is an object, matched lazily.
static OBJECT_ARRAY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)\[\s*\{.*?\}\s*\]").expect("valid object-array pattern"));

/// Parse model output into raw task candidates.
///
/// Tried in order:
/// 1. the whole (trimmed) text as a JSON array, or an object with a
///    `tasks` array;
/// 2. the first `[ {...} ]` substring;
/// 3. the span from the first `[` to the last `]`.
pub fn parse_task_list(text: &str) -> Vec<RawTask> {
    let text = text.trim();

    if let Ok(value) = serde_json::from_str::<JsonValue>(text) {
        if let Some(items) = task_array(value) {
            return items;
        }
    }

    if let Some(m) = OBJECT_ARRAY.find(text) {
        if let Some(items) = parse_array(m.as_str()) {
            debug!(
                subsystem = "inference",
                component = "parse",
                op = "parse_task_list",
                strategy = "object_array",
                "Recovered task array from surrounding text"
            );
            return items;
        }
    }

    if let (Some(start), Some(end)) = (text.find('['), text.rfind(']')) {
        if start < end {
            if let Some(items) = parse_array(&text[start..=end]) {
                debug!(
                    subsystem = "inference",
                    component = "parse",
                    op = "parse_task_list",
                    strategy = "bracket_span",
                    "Recovered task array from surrounding text"
                );
                return items;
            }
        }
    }

    if !text.is_empty() {
        warn!(
            subsystem = "inference",
            component = "parse",
            op = "parse_task_list",
            response_len = text.len(),
            "Model output contained no parseable task array"
        );
    }
    Vec::new()
}

fn task_array(value: JsonValue) -> Option<Vec<RawTask>> {
    match value {
        JsonValue::Array(items) => Some(items.into_iter().map(RawTask).collect()),
        JsonValue::Object(mut obj) => match obj.remove("tasks") {
            Some(JsonValue::Array(items)) => Some(items.into_iter().map(RawTask).collect()),
            _ => None,
        },
        _ => None,
    }
}

fn parse_array(candidate: &str) -> Option<Vec<RawTask>> {
    match serde_json::from_str::<JsonValue>(candidate) {
        Ok(JsonValue::Array(items)) => Some(items.into_iter().map(RawTask).collect()),
        _ => None,
    }
}
