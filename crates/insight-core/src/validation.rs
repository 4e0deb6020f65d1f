//! Structural validation of extraction output.
//!
//! Extraction backends return loosely-typed JSON. Only items with a usable
//! `id`, `description`, and `priority` survive; everything else is dropped
//! without error.

use std::collections::HashSet;

use serde_json::Value as JsonValue;
use tracing::debug;

use crate::models::{CandidateTask, Priority, RawTask};

/// Keep the shape-valid candidates, in input order.
///
/// An item is kept when it is an object with a non-empty string `id`, a
/// string `description`, and a `priority` of `low`, `medium`, or `high`.
/// Non-string dependency entries are discarded, a missing or non-array
/// `dependencies` becomes empty, and any proposed `status` is ignored.
/// The first occurrence of a repeated id wins.
pub fn shape_filter(raw: Vec<RawTask>) -> Vec<CandidateTask> {
    let total = raw.len();
    let mut seen = HashSet::new();
    let tasks: Vec<CandidateTask> = raw
        .into_iter()
        .filter_map(|item| to_candidate(item.into_inner()))
        .filter(|task| seen.insert(task.id.clone()))
        .collect();

    if tasks.len() < total {
        debug!(
            subsystem = "core",
            component = "validation",
            op = "shape_filter",
            input_count = total,
            kept = tasks.len(),
            "Dropped malformed task candidates"
        );
    }
    tasks
}

fn to_candidate(value: JsonValue) -> Option<CandidateTask> {
    let JsonValue::Object(mut obj) = value else {
        return None;
    };

    let id = match obj.remove("id") {
        Some(JsonValue::String(id)) if !id.is_empty() => id,
        _ => return None,
    };
    let description = match obj.remove("description") {
        Some(JsonValue::String(description)) => description,
        _ => return None,
    };
    let priority = obj
        .get("priority")
        .and_then(JsonValue::as_str)
        .and_then(|p| p.parse::<Priority>().ok())?;
    let dependencies = match obj.remove("dependencies") {
        Some(JsonValue::Array(items)) => items
            .into_iter()
            .filter_map(|dep| match dep {
                JsonValue::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    };

    Some(CandidateTask {
        id,
        description,
        priority,
        dependencies,
    })
}
