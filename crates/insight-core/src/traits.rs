//! Core traits for InsightBoard abstractions.
//!
//! These traits define the interfaces that storage and extraction backends
//! must satisfy, so the pipeline can run against Postgres, memory, a stub
//! extractor, or a live model.

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::models::*;

// =============================================================================
// STORE TRAITS
// =============================================================================

/// Repository for transcripts, keyed by id and deduplicated by content hash.
#[async_trait]
pub trait TranscriptRepository: Send + Sync {
    /// Insert a transcript, or return the existing one with the same hash.
    ///
    /// The boolean is `true` when a new row was created. Concurrent calls
    /// with identical hashes yield exactly one creation.
    async fn insert_or_get(&self, content: &str, content_hash: &str)
        -> Result<(Transcript, bool)>;

    /// Get transcript by ID.
    async fn get(&self, id: Uuid) -> Result<Option<Transcript>>;

    /// Look up a transcript by its content hash.
    async fn find_by_hash(&self, content_hash: &str) -> Result<Option<Transcript>>;
}

/// Repository for per-transcript task batches.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Atomically replace every task of a transcript with `tasks`.
    ///
    /// Readers observe either the previous batch or the new one, never a mix.
    async fn replace_for_transcript(&self, transcript_id: Uuid, tasks: &[Task]) -> Result<()>;

    /// List a transcript's tasks in batch order.
    async fn list_for_transcript(&self, transcript_id: Uuid) -> Result<Vec<Task>>;
}

/// Repository for extraction jobs.
#[async_trait]
pub trait JobRepository: Send + Sync {
    /// Create a pending job for a transcript.
    async fn create_pending(&self, transcript_id: Uuid) -> Result<Job>;

    /// Create a job that is already completed with `result`.
    async fn create_completed(&self, transcript_id: Uuid, result: ExtractionResult)
        -> Result<Job>;

    /// Transition a pending job to completed.
    ///
    /// Fails with [`crate::Error::Job`] if the job is already terminal.
    async fn complete(&self, job_id: Uuid, result: &ExtractionResult) -> Result<()>;

    /// Transition a pending job to failed.
    ///
    /// Fails with [`crate::Error::Job`] if the job is already terminal.
    async fn fail(&self, job_id: Uuid, message: &str) -> Result<()>;

    /// Get job by ID.
    async fn get(&self, job_id: Uuid) -> Result<Option<Job>>;

    /// Find the earliest completed job for a transcript, if any.
    async fn find_completed_for_transcript(&self, transcript_id: Uuid) -> Result<Option<Job>>;

    /// All jobs still pending, oldest first.
    ///
    /// Used at startup to pick up work a previous process left unfinished.
    async fn list_pending(&self) -> Result<Vec<Job>>;
}

// =============================================================================
// EXTRACTION TRAITS
// =============================================================================

/// Turns transcript text into untrusted task candidates.
///
/// Implementations must not fail on malformed model output; they return an
/// empty list instead. Errors are reserved for call failures and
/// misconfiguration.
#[async_trait]
pub trait TaskExtractor: Send + Sync {
    /// Propose tasks for the given transcript content.
    async fn extract_tasks(&self, content: &str) -> Result<Vec<RawTask>>;

    /// Short backend name for logging.
    fn name(&self) -> &str;
}

/// Resolves the extractor to use for one job.
pub trait ExtractorProvider: Send + Sync {
    /// Build or fetch the configured extractor.
    fn extractor(&self) -> Result<Arc<dyn TaskExtractor>>;
}
