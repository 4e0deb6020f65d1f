//! Read side: job status and transcript views.

use uuid::Uuid;

use insight_core::{Error, JobView, Result, TranscriptView};
use insight_db::Database;

use crate::processor::TRANSCRIPT_NOT_FOUND;

/// Message used when a job id is unknown.
pub const JOB_NOT_FOUND: &str = "Job not found";

#[derive(Clone)]
pub struct QueryService {
    db: Database,
}

impl QueryService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Current state of a job.
    pub async fn job(&self, id: Uuid) -> Result<JobView> {
        self.db
            .jobs
            .get(id)
            .await?
            .map(JobView::from)
            .ok_or_else(|| Error::NotFound(JOB_NOT_FOUND.to_string()))
    }

    /// A transcript with its current task batch.
    pub async fn transcript(&self, id: Uuid) -> Result<TranscriptView> {
        let transcript = self
            .db
            .transcripts
            .get(id)
            .await?
            .ok_or_else(|| Error::NotFound(TRANSCRIPT_NOT_FOUND.to_string()))?;
        let tasks = self.db.tasks.list_for_transcript(id).await?;
        Ok(TranscriptView::new(transcript, tasks))
    }
}
