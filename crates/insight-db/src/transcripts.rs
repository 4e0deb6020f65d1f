//! Transcript repository implementation.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Pool, Postgres, Row};
use uuid::Uuid;

use insight_core::{Error, Result, Transcript, TranscriptRepository};

/// PostgreSQL implementation of TranscriptRepository.
pub struct PgTranscriptRepository {
    pool: Pool<Postgres>,
}

impl PgTranscriptRepository {
    /// Create a new PgTranscriptRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    fn parse_row(row: sqlx::postgres::PgRow) -> Transcript {
        Transcript {
            id: row.get("id"),
            content: row.get("content"),
            content_hash: row.get("content_hash"),
            created_at: row.get("created_at"),
        }
    }
}

#[async_trait]
impl TranscriptRepository for PgTranscriptRepository {
    async fn insert_or_get(
        &self,
        content: &str,
        content_hash: &str,
    ) -> Result<(Transcript, bool)> {
        // The unique index on content_hash arbitrates concurrent inserts.
        let inserted = sqlx::query(
            "INSERT INTO transcripts (id, content, content_hash, created_at)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT (content_hash) DO NOTHING
             RETURNING id, content, content_hash, created_at",
        )
        .bind(Uuid::now_v7())
        .bind(content)
        .bind(content_hash)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        if let Some(row) = inserted {
            return Ok((Self::parse_row(row), true));
        }

        let existing = self.find_by_hash(content_hash).await?.ok_or_else(|| {
            Error::Internal(format!(
                "transcript with hash {} vanished after conflict",
                content_hash
            ))
        })?;
        Ok((existing, false))
    }

    async fn get(&self, id: Uuid) -> Result<Option<Transcript>> {
        let row = sqlx::query(
            "SELECT id, content, content_hash, created_at FROM transcripts WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(row.map(Self::parse_row))
    }

    async fn find_by_hash(&self, content_hash: &str) -> Result<Option<Transcript>> {
        let row = sqlx::query(
            "SELECT id, content, content_hash, created_at FROM transcripts WHERE content_hash = $1",
        )
        .bind(content_hash)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(row.map(Self::parse_row))
    }
}
