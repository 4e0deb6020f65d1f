//! Transcript intake: deduplication and job creation.

use tracing::{error, info};

use insight_core::{content_hash, Error, ExtractionResult, Result, Submission};
use insight_db::Database;

use crate::worker::{JobQueue, QUEUE_CLOSED};

/// Message used when submitted content is empty after trimming.
pub const EMPTY_TRANSCRIPT: &str = "Transcript content is empty";

/// Accepts transcripts and decides whether extraction has to run.
///
/// Identical content (after trimming) maps to one transcript. A transcript
/// that already has a result is answered from storage without queueing.
#[derive(Clone)]
pub struct SubmissionGate {
    db: Database,
    queue: JobQueue,
}

impl SubmissionGate {
    pub fn new(db: Database, queue: JobQueue) -> Self {
        Self { db, queue }
    }

    /// Submit transcript content.
    pub async fn submit(&self, content: &str) -> Result<Submission> {
        let content = content.trim();
        if content.is_empty() {
            return Err(Error::InvalidInput(EMPTY_TRANSCRIPT.to_string()));
        }

        let hash = content_hash(content);
        let (transcript, created) = self.db.transcripts.insert_or_get(content, &hash).await?;
        let transcript_id = transcript.id;

        if !created {
            if let Some(job) = self
                .db
                .jobs
                .find_completed_for_transcript(transcript_id)
                .await?
            {
                info!(
                    subsystem = "jobs",
                    component = "submission",
                    op = "submit",
                    %transcript_id,
                    job_id = %job.id,
                    cached = true,
                    "Returning completed job for duplicate transcript"
                );
                return Ok(Submission {
                    job_id: job.id,
                    transcript_id,
                    cached: true,
                });
            }

            let tasks = self.db.tasks.list_for_transcript(transcript_id).await?;
            if !tasks.is_empty() {
                let task_count = tasks.len();
                let job = self
                    .db
                    .jobs
                    .create_completed(
                        transcript_id,
                        ExtractionResult {
                            tasks,
                            cycles: Vec::new(),
                        },
                    )
                    .await?;
                info!(
                    subsystem = "jobs",
                    component = "submission",
                    op = "submit",
                    %transcript_id,
                    job_id = %job.id,
                    task_count,
                    cached = true,
                    "Synthesized completed job from stored tasks"
                );
                return Ok(Submission {
                    job_id: job.id,
                    transcript_id,
                    cached: true,
                });
            }
        }

        let job = self.db.jobs.create_pending(transcript_id).await?;
        if let Err(e) = self.queue.enqueue(transcript_id, job.id) {
            if let Err(fail_err) = self.db.jobs.fail(job.id, QUEUE_CLOSED).await {
                error!(
                    subsystem = "jobs",
                    component = "submission",
                    op = "submit",
                    job_id = %job.id,
                    error = %fail_err,
                    "Failed to mark unqueued job as failed"
                );
            }
            return Err(e);
        }

        info!(
            subsystem = "jobs",
            component = "submission",
            op = "submit",
            %transcript_id,
            job_id = %job.id,
            created,
            cached = false,
            "Queued extraction job"
        );
        Ok(Submission {
            job_id: job.id,
            transcript_id,
            cached: false,
        })
    }
}
