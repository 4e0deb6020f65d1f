//! # insight-jobs
//!
//! Asynchronous extraction pipeline for InsightBoard.
//!
//! This crate provides:
//! - [`SubmissionGate`]: content-hash deduplication and job creation
//! - [`JobWorker`]: a queue-fed worker with bounded concurrency and events
//! - [`TranscriptProcessor`]: extract, validate, and persist one job
//! - [`QueryService`]: job and transcript views
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use insight_db::Database;
//! use insight_inference::ConfiguredExtractors;
//! use insight_jobs::{JobWorker, SubmissionGate, WorkerConfig};
//!
//! let db = Database::in_memory();
//! let extractors = Arc::new(ConfiguredExtractors::from_env()?);
//! let (worker, queue) = JobWorker::new(db.clone(), extractors, WorkerConfig::from_env());
//! let handle = worker.start();
//!
//! let gate = SubmissionGate::new(db, queue);
//! let submission = gate.submit("Buy milk\nCall Bob").await?;
//!
//! handle.shutdown().await?;
//! handle.join().await?;
//! ```

pub mod processor;
pub mod query;
pub mod submission;
pub mod worker;

// Re-export core types
pub use insight_core::*;

pub use processor::{TranscriptProcessor, TRANSCRIPT_NOT_FOUND};
pub use query::{QueryService, JOB_NOT_FOUND};
pub use submission::{SubmissionGate, EMPTY_TRANSCRIPT};
pub use worker::{
    JobQueue, JobWorker, QueuedJob, WorkerConfig, WorkerEvent, WorkerHandle, JOB_PANICKED,
    QUEUE_CLOSED,
};
