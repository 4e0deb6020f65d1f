//! Task batch repository implementation.

use std::time::Instant;

use async_trait::async_trait;
use sqlx::{Pool, Postgres, Row};
use tracing::debug;
use uuid::Uuid;

use insight_core::{Error, Priority, Result, Task, TaskRepository, TaskStatus};

/// PostgreSQL implementation of TaskRepository.
pub struct PgTaskRepository {
    pool: Pool<Postgres>,
}

impl PgTaskRepository {
    /// Create a new PgTaskRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    fn parse_row(row: sqlx::postgres::PgRow) -> Result<Task> {
        let priority: String = row.get("priority");
        let status: String = row.get("status");
        Ok(Task {
            id: row.get("id"),
            description: row.get("description"),
            priority: priority.parse::<Priority>()?,
            dependencies: row.get("dependencies"),
            status: status.parse::<TaskStatus>()?,
        })
    }
}

#[async_trait]
impl TaskRepository for PgTaskRepository {
    async fn replace_for_transcript(&self, transcript_id: Uuid, tasks: &[Task]) -> Result<()> {
        let start = Instant::now();
        let mut tx = self.pool.begin().await.map_err(Error::Database)?;

        sqlx::query("DELETE FROM tasks WHERE transcript_id = $1")
            .bind(transcript_id)
            .execute(&mut *tx)
            .await
            .map_err(Error::Database)?;

        for (position, task) in tasks.iter().enumerate() {
            sqlx::query(
                "INSERT INTO tasks (transcript_id, id, position, description, priority, dependencies, status)
                 VALUES ($1, $2, $3, $4, $5, $6, $7)",
            )
            .bind(transcript_id)
            .bind(&task.id)
            .bind(position as i32)
            .bind(&task.description)
            .bind(task.priority.as_str())
            .bind(&task.dependencies)
            .bind(task.status.as_str())
            .execute(&mut *tx)
            .await
            .map_err(Error::Database)?;
        }

        tx.commit().await.map_err(Error::Database)?;

        debug!(
            subsystem = "database",
            component = "tasks",
            op = "replace_batch",
            %transcript_id,
            task_count = tasks.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Replaced task batch"
        );
        Ok(())
    }

    async fn list_for_transcript(&self, transcript_id: Uuid) -> Result<Vec<Task>> {
        let rows = sqlx::query(
            "SELECT id, description, priority, dependencies, status
             FROM tasks WHERE transcript_id = $1
             ORDER BY position",
        )
        .bind(transcript_id)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        rows.into_iter().map(Self::parse_row).collect()
    }
}
