//! Runs one extraction job end to end.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, error, info, warn};
use uuid::Uuid;

use insight_core::{
    sanitize_and_detect, shape_filter, Error, ExtractionResult, ExtractorProvider, Result,
};
use insight_db::Database;

/// Message recorded when a job's transcript no longer exists.
pub const TRANSCRIPT_NOT_FOUND: &str = "Transcript not found";

/// Extracts, validates, and persists the task batch for one transcript.
#[derive(Clone)]
pub struct TranscriptProcessor {
    db: Database,
    extractors: Arc<dyn ExtractorProvider>,
}

impl TranscriptProcessor {
    pub fn new(db: Database, extractors: Arc<dyn ExtractorProvider>) -> Self {
        Self { db, extractors }
    }

    /// Process a pending job, leaving it completed or failed.
    ///
    /// On error the job has already been marked failed (or the attempt to
    /// mark it was logged) when this returns.
    pub async fn process(&self, transcript_id: Uuid, job_id: Uuid) -> Result<ExtractionResult> {
        let start = Instant::now();

        match self.run(transcript_id, job_id).await {
            Ok(result) => {
                info!(
                    subsystem = "jobs",
                    component = "processor",
                    op = "process",
                    %job_id,
                    %transcript_id,
                    task_count = result.tasks.len(),
                    cycle_count = result.cycles.len(),
                    duration_ms = start.elapsed().as_millis() as u64,
                    "Extraction job completed"
                );
                Ok(result)
            }
            Err(e) => {
                let message = e.detail();
                warn!(
                    subsystem = "jobs",
                    component = "processor",
                    op = "process",
                    %job_id,
                    %transcript_id,
                    error = %message,
                    duration_ms = start.elapsed().as_millis() as u64,
                    "Extraction job failed"
                );
                self.record_failure(job_id, &message).await;
                Err(e)
            }
        }
    }

    async fn run(&self, transcript_id: Uuid, job_id: Uuid) -> Result<ExtractionResult> {
        let transcript = self
            .db
            .transcripts
            .get(transcript_id)
            .await?
            .ok_or_else(|| Error::NotFound(TRANSCRIPT_NOT_FOUND.to_string()))?;

        let extractor = self.extractors.extractor()?;
        let raw = extractor.extract_tasks(&transcript.content).await?;
        let proposed = raw.len();

        let candidates = shape_filter(raw);
        let result = sanitize_and_detect(candidates);

        debug!(
            subsystem = "jobs",
            component = "processor",
            op = "validate",
            %job_id,
            provider = extractor.name(),
            proposed,
            task_count = result.tasks.len(),
            cycle_count = result.cycles.len(),
            "Validated extraction output"
        );

        self.db
            .tasks
            .replace_for_transcript(transcript_id, &result.tasks)
            .await?;
        self.db.jobs.complete(job_id, &result).await?;
        Ok(result)
    }

    /// Mark a job failed. A store error here is logged and swallowed so the
    /// worker keeps running.
    pub async fn record_failure(&self, job_id: Uuid, message: &str) {
        if let Err(e) = self.db.jobs.fail(job_id, message).await {
            error!(
                subsystem = "jobs",
                component = "processor",
                op = "record_failure",
                %job_id,
                error = %e,
                "Failed to mark job as failed"
            );
        }
    }
}
