//! Core data models for transcripts, tasks, and extraction jobs.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use uuid::Uuid;

use crate::error::{Error, Result};

// =============================================================================
// TRANSCRIPT TYPES
// =============================================================================

/// A submitted meeting transcript.
///
/// Created once per distinct trimmed content value and never modified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transcript {
    pub id: Uuid,
    pub content: String,
    /// Lowercase hex SHA-256 of `content`.
    pub content_hash: String,
    pub created_at: DateTime<Utc>,
}

/// A transcript together with its current task batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptView {
    pub id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub tasks: Vec<Task>,
}

impl TranscriptView {
    pub fn new(transcript: Transcript, tasks: Vec<Task>) -> Self {
        Self {
            id: transcript.id,
            content: transcript.content,
            created_at: transcript.created_at,
            tasks,
        }
    }
}

// =============================================================================
// TASK TYPES
// =============================================================================

/// Task priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            other => Err(Error::Serialization(format!("invalid priority: {}", other))),
        }
    }
}

/// Whether a task can be executed.
///
/// Always derived from the dependency graph, never taken from extraction output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Ready,
    /// Task participates in a dependency cycle.
    Blocked,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Ready => "ready",
            TaskStatus::Blocked => "blocked",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "ready" => Ok(TaskStatus::Ready),
            "blocked" => Ok(TaskStatus::Blocked),
            other => Err(Error::Serialization(format!("invalid task status: {}", other))),
        }
    }
}

/// An untrusted task candidate as produced by an extraction backend.
///
/// Field presence and types are not guaranteed; see
/// [`crate::validation::shape_filter`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawTask(pub JsonValue);

impl RawTask {
    pub fn into_inner(self) -> JsonValue {
        self.0
    }
}

impl From<JsonValue> for RawTask {
    fn from(value: JsonValue) -> Self {
        Self(value)
    }
}

/// A shape-valid task whose dependencies have not yet been sanitized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateTask {
    pub id: String,
    pub description: String,
    pub priority: Priority,
    pub dependencies: Vec<String>,
}

/// A validated task within one transcript's batch.
///
/// `id` is unique within the batch only. `dependencies` reference ids of
/// the same batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub description: String,
    pub priority: Priority,
    pub dependencies: Vec<String>,
    pub status: TaskStatus,
}

/// Output of a completed extraction: the validated batch plus detected cycles.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub tasks: Vec<Task>,
    pub cycles: Vec<Vec<String>>,
}

// =============================================================================
// JOB TYPES
// =============================================================================

/// Job status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Completed,
    Failed,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Pending => "pending",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, JobStatus::Pending)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "pending" => Ok(JobStatus::Pending),
            "completed" => Ok(JobStatus::Completed),
            "failed" => Ok(JobStatus::Failed),
            other => Err(Error::Serialization(format!("invalid job status: {}", other))),
        }
    }
}

/// Where a job is in its lifecycle, carrying the terminal payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOutcome {
    Pending,
    Completed(ExtractionResult),
    Failed { message: String },
}

impl JobOutcome {
    pub fn status(&self) -> JobStatus {
        match self {
            JobOutcome::Pending => JobStatus::Pending,
            JobOutcome::Completed(_) => JobStatus::Completed,
            JobOutcome::Failed { .. } => JobStatus::Failed,
        }
    }
}

/// One asynchronous extraction run against a transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub id: Uuid,
    pub transcript_id: Uuid,
    pub outcome: JobOutcome,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Job {
    pub fn status(&self) -> JobStatus {
        self.outcome.status()
    }
}

/// Client-facing job result: `{tasks, cycles}` when completed, the error
/// text when failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum JobResultView {
    Completed(ExtractionResult),
    Failed(String),
}

/// Client-facing job representation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobView {
    pub id: Uuid,
    pub status: JobStatus,
    pub transcript_id: Uuid,
    pub result: Option<JobResultView>,
}

impl From<Job> for JobView {
    fn from(job: Job) -> Self {
        let status = job.status();
        let result = match job.outcome {
            JobOutcome::Pending => None,
            JobOutcome::Completed(result) => Some(JobResultView::Completed(result)),
            JobOutcome::Failed { message } => Some(JobResultView::Failed(message)),
        };
        Self {
            id: job.id,
            status,
            transcript_id: job.transcript_id,
            result,
        }
    }
}

/// Response to a transcript submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub job_id: Uuid,
    pub transcript_id: Uuid,
    /// True when the result was served without running extraction.
    pub cached: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_task(id: &str, deps: &[&str], status: TaskStatus) -> Task {
        Task {
            id: id.to_string(),
            description: format!("do {}", id),
            priority: Priority::Medium,
            dependencies: deps.iter().map(|d| d.to_string()).collect(),
            status,
        }
    }

    #[test]
    fn test_priority_str_round_trip() {
        for p in [Priority::Low, Priority::Medium, Priority::High] {
            assert_eq!(p.as_str().parse::<Priority>().unwrap(), p);
        }
    }

    #[test]
    fn test_priority_rejects_unknown() {
        assert!("urgent".parse::<Priority>().is_err());
        assert!("High".parse::<Priority>().is_err());
    }

    #[test]
    fn test_task_status_rejects_unknown() {
        assert!("done".parse::<TaskStatus>().is_err());
    }

    #[test]
    fn test_job_status_terminal() {
        assert!(!JobStatus::Pending.is_terminal());
        assert!(JobStatus::Completed.is_terminal());
        assert!(JobStatus::Failed.is_terminal());
    }

    #[test]
    fn test_task_serializes_lowercase_enums() {
        let task = sample_task("t1", &[], TaskStatus::Blocked);
        let value = serde_json::to_value(&task).unwrap();
        assert_eq!(
            value,
            json!({
                "id": "t1",
                "description": "do t1",
                "priority": "medium",
                "dependencies": [],
                "status": "blocked"
            })
        );
    }

    #[test]
    fn test_submission_uses_camel_case() {
        let submission = Submission {
            job_id: Uuid::nil(),
            transcript_id: Uuid::nil(),
            cached: true,
        };
        let value = serde_json::to_value(&submission).unwrap();
        assert!(value.get("jobId").is_some());
        assert!(value.get("transcriptId").is_some());
        assert_eq!(value["cached"], json!(true));
    }

    #[test]
    fn test_pending_job_view_has_null_result() {
        let job = Job {
            id: Uuid::nil(),
            transcript_id: Uuid::nil(),
            outcome: JobOutcome::Pending,
            created_at: Utc::now(),
            completed_at: None,
        };
        let value = serde_json::to_value(JobView::from(job)).unwrap();
        assert_eq!(value["status"], json!("pending"));
        assert!(value["result"].is_null());
        assert!(value.get("transcript_id").is_some());
    }

    #[test]
    fn test_completed_job_view_carries_tasks_and_cycles() {
        let result = ExtractionResult {
            tasks: vec![sample_task("t1", &["t1"], TaskStatus::Blocked)],
            cycles: vec![vec!["t1".to_string(), "t1".to_string()]],
        };
        let job = Job {
            id: Uuid::nil(),
            transcript_id: Uuid::nil(),
            outcome: JobOutcome::Completed(result),
            created_at: Utc::now(),
            completed_at: Some(Utc::now()),
        };
        let value = serde_json::to_value(JobView::from(job)).unwrap();
        assert_eq!(value["status"], json!("completed"));
        assert_eq!(value["result"]["cycles"], json!([["t1", "t1"]]));
        assert_eq!(value["result"]["tasks"][0]["status"], json!("blocked"));
    }

    #[test]
    fn test_failed_job_view_carries_message() {
        let job = Job {
            id: Uuid::nil(),
            transcript_id: Uuid::nil(),
            outcome: JobOutcome::Failed {
                message: "Transcript not found".to_string(),
            },
            created_at: Utc::now(),
            completed_at: Some(Utc::now()),
        };
        let view = JobView::from(job);
        assert_eq!(view.status, JobStatus::Failed);
        let value = serde_json::to_value(&view).unwrap();
        assert_eq!(value["result"], json!("Transcript not found"));

        let parsed: JobView = serde_json::from_value(value).unwrap();
        assert_eq!(parsed, view);
    }
}
