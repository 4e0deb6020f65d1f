//! Deterministic extractor for tests and offline runs.

use async_trait::async_trait;
use serde_json::json;

use insight_core::defaults::{STUB_DANGLING_DEPENDENCY, STUB_DESCRIPTION_CHARS, STUB_MAX_TASKS};
use insight_core::{RawTask, Result, TaskExtractor};

/// Turns the first non-blank lines of a transcript into a dependency chain.
///
/// Each task depends on the one before it, and the first task also names a
/// dependency that does not exist so downstream sanitization always has
/// something to remove.
#[derive(Debug, Clone, Copy, Default)]
pub struct StubExtractor;

impl StubExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Build the candidate list synchronously.
    pub fn tasks_for(content: &str) -> Vec<RawTask> {
        let mut tasks: Vec<RawTask> = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .take(STUB_MAX_TASKS)
            .enumerate()
            .map(|(i, line)| {
                let dependencies: Vec<String> = if i > 0 {
                    vec![format!("t{}", i)]
                } else {
                    Vec::new()
                };
                RawTask(json!({
                    "id": format!("t{}", i + 1),
                    "description": line.chars().take(STUB_DESCRIPTION_CHARS).collect::<String>(),
                    "priority": if i % 2 == 0 { "medium" } else { "low" },
                    "dependencies": dependencies,
                    "status": "ready",
                }))
            })
            .collect();

        if let Some(deps) = tasks
            .first_mut()
            .and_then(|t| t.0.get_mut("dependencies"))
            .and_then(|d| d.as_array_mut())
        {
            deps.push(json!(STUB_DANGLING_DEPENDENCY));
        }
        tasks
    }
}

#[async_trait]
impl TaskExtractor for StubExtractor {
    async fn extract_tasks(&self, content: &str) -> Result<Vec<RawTask>> {
        Ok(Self::tasks_for(content))
    }

    fn name(&self) -> &str {
        "stub"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_three_lines_make_a_chain() {
        let tasks = StubExtractor::tasks_for("Buy milk\nCall Bob\nFinish report");
        assert_eq!(tasks.len(), 3);
        assert_eq!(
            tasks[0].0,
            json!({
                "id": "t1",
                "description": "Buy milk",
                "priority": "medium",
                "dependencies": ["unknown_task_id"],
                "status": "ready"
            })
        );
        assert_eq!(tasks[1].0["priority"], json!("low"));
        assert_eq!(tasks[1].0["dependencies"], json!(["t1"]));
        assert_eq!(tasks[2].0["priority"], json!("medium"));
        assert_eq!(tasks[2].0["dependencies"], json!(["t2"]));
    }

    #[test]
    fn test_blank_lines_skipped_and_trimmed() {
        let tasks = StubExtractor::tasks_for("\n   first  \n\n\t\nsecond\r\n");
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].0["description"], json!("first"));
        assert_eq!(tasks[1].0["description"], json!("second"));
    }

    #[test]
    fn test_caps_at_six_tasks() {
        let content = (1..=10).map(|i| format!("line {}", i)).collect::<Vec<_>>().join("\n");
        let tasks = StubExtractor::tasks_for(&content);
        assert_eq!(tasks.len(), 6);
        assert_eq!(tasks[5].0["id"], json!("t6"));
    }

    #[test]
    fn test_description_truncated_by_characters() {
        let long = "é".repeat(300);
        let tasks = StubExtractor::tasks_for(&long);
        let description = tasks[0].0["description"].as_str().unwrap();
        assert_eq!(description.chars().count(), 200);
    }

    #[test]
    fn test_empty_content_yields_nothing() {
        assert!(StubExtractor::tasks_for("   \n  ").is_empty());
    }

    #[tokio::test]
    async fn test_extract_is_deterministic() {
        let stub = StubExtractor::new();
        let a = stub.extract_tasks("one\ntwo").await.unwrap();
        let b = stub.extract_tasks("one\ntwo").await.unwrap();
        assert_eq!(a, b);
        assert_eq!(stub.name(), "stub");
    }
}
