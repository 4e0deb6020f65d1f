//! # insight-db
//!
//! Storage layer for the InsightBoard dependency engine.
//!
//! This crate provides:
//! - Connection pool management
//! - PostgreSQL repositories for transcripts, task batches, and jobs
//! - An in-memory store with the same semantics for tests and offline use
//!
//! ## Example
//!
//! ```rust,ignore
//! use insight_db::{Database, TranscriptRepository};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::connect("postgres://localhost/insightboard").await?;
//!     let hash = insight_core::content_hash("Buy milk");
//!     let (transcript, created) = db.transcripts.insert_or_get("Buy milk", &hash).await?;
//!     println!("{} (new: {})", transcript.id, created);
//!     Ok(())
//! }
//! ```

use std::sync::Arc;

pub mod jobs;
pub mod memory;
pub mod pool;
pub mod tasks;
pub mod transcripts;

// Re-export core types
pub use insight_core::*;

pub use jobs::PgJobRepository;
pub use memory::MemoryStore;
pub use pool::{create_pool_with_config, PoolConfig};
pub use tasks::PgTaskRepository;
pub use transcripts::PgTranscriptRepository;

/// Combined store context with all repositories.
#[derive(Clone)]
pub struct Database {
    /// Transcript repository, deduplicated by content hash.
    pub transcripts: Arc<dyn TranscriptRepository>,
    /// Per-transcript task batches.
    pub tasks: Arc<dyn TaskRepository>,
    /// Extraction jobs.
    pub jobs: Arc<dyn JobRepository>,
    pool: Option<sqlx::Pool<sqlx::Postgres>>,
}

impl Database {
    /// Create a new Database instance from a connection pool.
    pub fn new(pool: sqlx::Pool<sqlx::Postgres>) -> Self {
        Self {
            transcripts: Arc::new(PgTranscriptRepository::new(pool.clone())),
            tasks: Arc::new(PgTaskRepository::new(pool.clone())),
            jobs: Arc::new(PgJobRepository::new(pool.clone())),
            pool: Some(pool),
        }
    }

    /// Create a Database backed by a fresh in-memory store.
    pub fn in_memory() -> Self {
        let store = MemoryStore::new();
        Self {
            transcripts: Arc::new(store.clone()),
            tasks: Arc::new(store.clone()),
            jobs: Arc::new(store),
            pool: None,
        }
    }

    /// Create a new Database instance by connecting to the given URL.
    pub async fn connect(url: &str) -> Result<Self> {
        Self::connect_with_config(url, PoolConfig::default()).await
    }

    /// Create with custom pool configuration.
    pub async fn connect_with_config(url: &str, config: PoolConfig) -> Result<Self> {
        let pool = create_pool_with_config(url, config).await?;
        Ok(Self::new(pool))
    }

    /// Run pending migrations. A no-op for the in-memory store.
    #[cfg(feature = "migrations")]
    pub async fn migrate(&self) -> Result<()> {
        if let Some(pool) = &self.pool {
            sqlx::migrate!("../../migrations")
                .run(pool)
                .await
                .map_err(|e| Error::Database(sqlx::Error::Migrate(Box::new(e))))?;
        }
        Ok(())
    }

    /// Get the underlying connection pool, if backed by Postgres.
    pub fn pool(&self) -> Option<&sqlx::Pool<sqlx::Postgres>> {
        self.pool.as_ref()
    }

    /// Whether this context uses the in-memory store.
    pub fn is_in_memory(&self) -> bool {
        self.pool.is_none()
    }
}
