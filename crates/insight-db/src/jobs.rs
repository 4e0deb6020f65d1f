//! Job repository implementation.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value as JsonValue;
use sqlx::{Pool, Postgres, Row};
use uuid::Uuid;

use insight_core::{
    Error, ExtractionResult, Job, JobOutcome, JobRepository, JobStatus, Result,
};

const JOB_COLUMNS: &str =
    "id, transcript_id, status, result, error_message, created_at, completed_at";

/// PostgreSQL implementation of JobRepository.
pub struct PgJobRepository {
    pool: Pool<Postgres>,
}

impl PgJobRepository {
    /// Create a new PgJobRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Parse a job row, decoding the stored result for its status.
    fn parse_job_row(row: sqlx::postgres::PgRow) -> Result<Job> {
        let status: String = row.get("status");
        let outcome = match status.parse::<JobStatus>()? {
            JobStatus::Pending => JobOutcome::Pending,
            JobStatus::Completed => {
                let result: Option<JsonValue> = row.get("result");
                let result = match result {
                    Some(value) => serde_json::from_value::<ExtractionResult>(value)?,
                    None => ExtractionResult::default(),
                };
                JobOutcome::Completed(result)
            }
            JobStatus::Failed => {
                let message: Option<String> = row.get("error_message");
                JobOutcome::Failed {
                    message: message.unwrap_or_default(),
                }
            }
        };

        Ok(Job {
            id: row.get("id"),
            transcript_id: row.get("transcript_id"),
            outcome,
            created_at: row.get("created_at"),
            completed_at: row.get("completed_at"),
        })
    }

    /// Explain why a guarded `pending -> terminal` update touched no rows.
    async fn transition_error(&self, job_id: Uuid) -> Error {
        match self.get(job_id).await {
            Ok(Some(job)) => Error::Job(format!("job {} is already {}", job_id, job.status())),
            Ok(None) => Error::NotFound("Job not found".to_string()),
            Err(e) => e,
        }
    }
}

#[async_trait]
impl JobRepository for PgJobRepository {
    async fn create_pending(&self, transcript_id: Uuid) -> Result<Job> {
        let job = Job {
            id: Uuid::now_v7(),
            transcript_id,
            outcome: JobOutcome::Pending,
            created_at: Utc::now(),
            completed_at: None,
        };

        sqlx::query(
            "INSERT INTO jobs (id, transcript_id, status, created_at)
             VALUES ($1, $2, 'pending', $3)",
        )
        .bind(job.id)
        .bind(job.transcript_id)
        .bind(job.created_at)
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(job)
    }

    async fn create_completed(
        &self,
        transcript_id: Uuid,
        result: ExtractionResult,
    ) -> Result<Job> {
        let now = Utc::now();
        let payload = serde_json::to_value(&result)?;
        let job = Job {
            id: Uuid::now_v7(),
            transcript_id,
            outcome: JobOutcome::Completed(result),
            created_at: now,
            completed_at: Some(now),
        };

        sqlx::query(
            "INSERT INTO jobs (id, transcript_id, status, result, created_at, completed_at)
             VALUES ($1, $2, 'completed', $3, $4, $4)",
        )
        .bind(job.id)
        .bind(job.transcript_id)
        .bind(&payload)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(job)
    }

    async fn complete(&self, job_id: Uuid, result: &ExtractionResult) -> Result<()> {
        let payload = serde_json::to_value(result)?;

        let updated = sqlx::query(
            "UPDATE jobs
             SET status = 'completed', result = $1, completed_at = $2
             WHERE id = $3 AND status = 'pending'",
        )
        .bind(&payload)
        .bind(Utc::now())
        .bind(job_id)
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;

        if updated.rows_affected() == 0 {
            return Err(self.transition_error(job_id).await);
        }
        Ok(())
    }

    async fn fail(&self, job_id: Uuid, message: &str) -> Result<()> {
        let updated = sqlx::query(
            "UPDATE jobs
             SET status = 'failed', error_message = $1, completed_at = $2
             WHERE id = $3 AND status = 'pending'",
        )
        .bind(message)
        .bind(Utc::now())
        .bind(job_id)
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;

        if updated.rows_affected() == 0 {
            return Err(self.transition_error(job_id).await);
        }
        Ok(())
    }

    async fn get(&self, job_id: Uuid) -> Result<Option<Job>> {
        let row = sqlx::query(&format!("SELECT {} FROM jobs WHERE id = $1", JOB_COLUMNS))
            .bind(job_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?;

        row.map(Self::parse_job_row).transpose()
    }

    async fn find_completed_for_transcript(&self, transcript_id: Uuid) -> Result<Option<Job>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM jobs
             WHERE transcript_id = $1 AND status = 'completed'
             ORDER BY created_at, id
             LIMIT 1",
            JOB_COLUMNS
        ))
        .bind(transcript_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        row.map(Self::parse_job_row).transpose()
    }

    async fn list_pending(&self) -> Result<Vec<Job>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM jobs
             WHERE status = 'pending'
             ORDER BY created_at, id",
            JOB_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        rows.into_iter().map(Self::parse_job_row).collect()
    }
}
