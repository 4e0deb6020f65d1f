//! Structured logging schema and field name constants for InsightBoard.
//!
//! Every crate logs with these field names so log aggregation can query a
//! job from submission through extraction to completion.
//!
//! `tracing` macros take field keys as identifiers, so call sites spell the
//! names literally (`op = "submit"`, `%job_id`). The constants here are the
//! reference list those call sites must match.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Job state could not be recorded, requires operator attention |
//! | WARN  | Job failed, or model output degraded to an empty task list |
//! | INFO  | Lifecycle events (startup, shutdown), job completions |
//! | DEBUG | Decision points, dedup outcomes, config choices |
//! | TRACE | Per-item iteration |

// ─── Identity fields ───────────────────────────────────────────────────────

/// Correlation ID for an HTTP request. Format: UUIDv7.
pub const REQUEST_ID: &str = "request_id";

/// Subsystem originating the log event.
/// Values: "api", "core", "database", "inference", "jobs"
pub const SUBSYSTEM: &str = "subsystem";

/// Component within a subsystem.
/// Examples: "pool", "worker", "submission", "openai", "dependency"
pub const COMPONENT: &str = "component";

/// Logical operation name.
/// Examples: "submit", "process", "extract_tasks", "replace_batch"
pub const OPERATION: &str = "op";

// ─── Entity fields ─────────────────────────────────────────────────────────

/// Job UUID being processed.
pub const JOB_ID: &str = "job_id";

/// Transcript UUID being operated on.
pub const TRANSCRIPT_ID: &str = "transcript_id";

// ─── Measurement fields ────────────────────────────────────────────────────

/// Wall-clock duration in milliseconds.
pub const DURATION_MS: &str = "duration_ms";

/// Number of tasks in a batch.
pub const TASK_COUNT: &str = "task_count";

/// Number of dependency cycles detected.
pub const CYCLE_COUNT: &str = "cycle_count";

/// Byte length of a model response.
pub const RESPONSE_LEN: &str = "response_len";

// ─── Inference fields ──────────────────────────────────────────────────────

/// Extraction backend name ("stub", "openai").
pub const PROVIDER: &str = "provider";

/// Model name used for inference.
pub const MODEL: &str = "model";

// ─── Outcome fields ────────────────────────────────────────────────────────

/// Whether a submission was served from stored results.
pub const CACHED: &str = "cached";

/// Number of jobs touched by a batch operation.
pub const JOB_COUNT: &str = "job_count";

/// Error message when an operation fails.
pub const ERROR_MSG: &str = "error";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_names_are_snake_case_and_unique() {
        let fields = [
            REQUEST_ID,
            SUBSYSTEM,
            COMPONENT,
            OPERATION,
            JOB_ID,
            TRANSCRIPT_ID,
            DURATION_MS,
            TASK_COUNT,
            CYCLE_COUNT,
            RESPONSE_LEN,
            PROVIDER,
            MODEL,
            CACHED,
            JOB_COUNT,
            ERROR_MSG,
        ];
        let unique: std::collections::HashSet<_> = fields.iter().collect();
        assert_eq!(unique.len(), fields.len());
        for f in fields {
            assert!(f.chars().all(|c| c.is_ascii_lowercase() || c == '_'), "{}", f);
        }
    }

    #[test]
    fn test_call_site_keys_match_schema() {
        assert_eq!(SUBSYSTEM, "subsystem");
        assert_eq!(COMPONENT, "component");
        assert_eq!(OPERATION, "op");
        assert_eq!(JOB_ID, "job_id");
        assert_eq!(TRANSCRIPT_ID, "transcript_id");
        assert_eq!(DURATION_MS, "duration_ms");
        assert_eq!(JOB_COUNT, "job_count");
        assert_eq!(ERROR_MSG, "error");
    }
}
