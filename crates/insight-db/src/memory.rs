//! In-memory store for development, tests, and offline mode.
//!
//! One `MemoryStore` implements all three repositories over a single shared
//! state, so hash dedup and batch replacement are atomic under one lock.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use insight_core::{
    Error, ExtractionResult, Job, JobOutcome, JobRepository, JobStatus, Result, Task,
    TaskRepository, Transcript, TranscriptRepository,
};

#[derive(Default)]
struct MemoryState {
    transcripts: HashMap<Uuid, Transcript>,
    by_hash: HashMap<String, Uuid>,
    tasks: HashMap<Uuid, Vec<Task>>,
    jobs: HashMap<Uuid, Job>,
}

/// Shared in-memory implementation of every store repository.
#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<RwLock<MemoryState>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn finish(state: &mut MemoryState, job_id: Uuid, outcome: JobOutcome) -> Result<()> {
        let job = state
            .jobs
            .get_mut(&job_id)
            .ok_or_else(|| Error::NotFound("Job not found".to_string()))?;
        if job.status().is_terminal() {
            return Err(Error::Job(format!(
                "job {} is already {}",
                job_id,
                job.status()
            )));
        }
        job.outcome = outcome;
        job.completed_at = Some(Utc::now());
        Ok(())
    }
}

#[async_trait]
impl TranscriptRepository for MemoryStore {
    async fn insert_or_get(
        &self,
        content: &str,
        content_hash: &str,
    ) -> Result<(Transcript, bool)> {
        let mut state = self.state.write().await;

        if let Some(existing) = state
            .by_hash
            .get(content_hash)
            .and_then(|id| state.transcripts.get(id))
        {
            return Ok((existing.clone(), false));
        }

        let transcript = Transcript {
            id: Uuid::now_v7(),
            content: content.to_string(),
            content_hash: content_hash.to_string(),
            created_at: Utc::now(),
        };
        state
            .by_hash
            .insert(transcript.content_hash.clone(), transcript.id);
        state.transcripts.insert(transcript.id, transcript.clone());
        Ok((transcript, true))
    }

    async fn get(&self, id: Uuid) -> Result<Option<Transcript>> {
        Ok(self.state.read().await.transcripts.get(&id).cloned())
    }

    async fn find_by_hash(&self, content_hash: &str) -> Result<Option<Transcript>> {
        let state = self.state.read().await;
        Ok(state
            .by_hash
            .get(content_hash)
            .and_then(|id| state.transcripts.get(id))
            .cloned())
    }
}

#[async_trait]
impl TaskRepository for MemoryStore {
    async fn replace_for_transcript(&self, transcript_id: Uuid, tasks: &[Task]) -> Result<()> {
        let mut state = self.state.write().await;
        if !state.transcripts.contains_key(&transcript_id) {
            return Err(Error::NotFound("Transcript not found".to_string()));
        }
        state.tasks.insert(transcript_id, tasks.to_vec());
        Ok(())
    }

    async fn list_for_transcript(&self, transcript_id: Uuid) -> Result<Vec<Task>> {
        Ok(self
            .state
            .read()
            .await
            .tasks
            .get(&transcript_id)
            .cloned()
            .unwrap_or_default())
    }
}

#[async_trait]
impl JobRepository for MemoryStore {
    async fn create_pending(&self, transcript_id: Uuid) -> Result<Job> {
        let job = Job {
            id: Uuid::now_v7(),
            transcript_id,
            outcome: JobOutcome::Pending,
            created_at: Utc::now(),
            completed_at: None,
        };
        self.state.write().await.jobs.insert(job.id, job.clone());
        Ok(job)
    }

    async fn create_completed(
        &self,
        transcript_id: Uuid,
        result: ExtractionResult,
    ) -> Result<Job> {
        let now = Utc::now();
        let job = Job {
            id: Uuid::now_v7(),
            transcript_id,
            outcome: JobOutcome::Completed(result),
            created_at: now,
            completed_at: Some(now),
        };
        self.state.write().await.jobs.insert(job.id, job.clone());
        Ok(job)
    }

    async fn complete(&self, job_id: Uuid, result: &ExtractionResult) -> Result<()> {
        let mut state = self.state.write().await;
        Self::finish(&mut state, job_id, JobOutcome::Completed(result.clone()))
    }

    async fn fail(&self, job_id: Uuid, message: &str) -> Result<()> {
        let mut state = self.state.write().await;
        Self::finish(
            &mut state,
            job_id,
            JobOutcome::Failed {
                message: message.to_string(),
            },
        )
    }

    async fn get(&self, job_id: Uuid) -> Result<Option<Job>> {
        Ok(self.state.read().await.jobs.get(&job_id).cloned())
    }

    async fn find_completed_for_transcript(&self, transcript_id: Uuid) -> Result<Option<Job>> {
        let state = self.state.read().await;
        Ok(state
            .jobs
            .values()
            .filter(|j| j.transcript_id == transcript_id && j.status() == JobStatus::Completed)
            .min_by_key(|j| (j.created_at, j.id))
            .cloned())
    }

    async fn list_pending(&self) -> Result<Vec<Job>> {
        let state = self.state.read().await;
        let mut pending: Vec<Job> = state
            .jobs
            .values()
            .filter(|j| j.status() == JobStatus::Pending)
            .cloned()
            .collect();
        pending.sort_by_key(|j| (j.created_at, j.id));
        Ok(pending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use insight_core::{content_hash, Priority, TaskStatus};

    fn task(id: &str) -> Task {
        Task {
            id: id.to_string(),
            description: format!("task {}", id),
            priority: Priority::Low,
            dependencies: Vec::new(),
            status: TaskStatus::Ready,
        }
    }

    #[tokio::test]
    async fn test_insert_or_get_dedups_by_hash() {
        let store = MemoryStore::new();
        let hash = content_hash("Buy milk");

        let (first, created) = store.insert_or_get("Buy milk", &hash).await.unwrap();
        assert!(created);
        let (second, created) = store.insert_or_get("Buy milk", &hash).await.unwrap();
        assert!(!created);
        assert_eq!(first.id, second.id);

        let found = store.find_by_hash(&hash).await.unwrap().unwrap();
        assert_eq!(found.id, first.id);
    }

    #[tokio::test]
    async fn test_concurrent_identical_inserts_create_once() {
        let store = MemoryStore::new();
        let hash = content_hash("same content");

        let mut handles = Vec::new();
        for _ in 0..16 {
            let store = store.clone();
            let hash = hash.clone();
            handles.push(tokio::spawn(async move {
                store.insert_or_get("same content", &hash).await.unwrap()
            }));
        }

        let mut created = 0;
        let mut ids = std::collections::HashSet::new();
        for handle in handles {
            let (transcript, was_created) = handle.await.unwrap();
            if was_created {
                created += 1;
            }
            ids.insert(transcript.id);
        }
        assert_eq!(created, 1);
        assert_eq!(ids.len(), 1);
    }

    #[tokio::test]
    async fn test_replace_swaps_whole_batch() {
        let store = MemoryStore::new();
        let (t, _) = store.insert_or_get("x", &content_hash("x")).await.unwrap();

        store
            .replace_for_transcript(t.id, &[task("a"), task("b")])
            .await
            .unwrap();
        store.replace_for_transcript(t.id, &[task("c")]).await.unwrap();

        let tasks = store.list_for_transcript(t.id).await.unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].id, "c");
    }

    #[tokio::test]
    async fn test_replace_for_unknown_transcript_fails() {
        let store = MemoryStore::new();
        let err = store
            .replace_for_transcript(Uuid::now_v7(), &[task("a")])
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn test_job_transitions_exactly_once() {
        let store = MemoryStore::new();
        let (t, _) = store.insert_or_get("x", &content_hash("x")).await.unwrap();
        let job = store.create_pending(t.id).await.unwrap();

        store
            .complete(job.id, &ExtractionResult::default())
            .await
            .unwrap();
        let err = store.fail(job.id, "late failure").await.unwrap_err();
        assert!(matches!(err, Error::Job(_)));

        let stored = JobRepository::get(&store, job.id).await.unwrap().unwrap();
        assert_eq!(stored.status(), JobStatus::Completed);
        assert!(stored.completed_at.is_some());
    }

    #[tokio::test]
    async fn test_find_completed_ignores_pending_and_failed() {
        let store = MemoryStore::new();
        let (t, _) = store.insert_or_get("x", &content_hash("x")).await.unwrap();

        let pending = store.create_pending(t.id).await.unwrap();
        let failed = store.create_pending(t.id).await.unwrap();
        store.fail(failed.id, "boom").await.unwrap();
        assert!(store
            .find_completed_for_transcript(t.id)
            .await
            .unwrap()
            .is_none());

        store
            .complete(pending.id, &ExtractionResult::default())
            .await
            .unwrap();
        let found = store
            .find_completed_for_transcript(t.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.id, pending.id);
    }

    #[tokio::test]
    async fn test_unknown_job_transition_is_not_found() {
        let store = MemoryStore::new();
        let err = store.fail(Uuid::now_v7(), "x").await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn test_list_pending_skips_terminal_jobs() {
        let store = MemoryStore::new();
        let (t, _) = store.insert_or_get("x", &content_hash("x")).await.unwrap();

        let first = store.create_pending(t.id).await.unwrap();
        let done = store.create_pending(t.id).await.unwrap();
        let second = store.create_pending(t.id).await.unwrap();
        store
            .complete(done.id, &ExtractionResult::default())
            .await
            .unwrap();
        store
            .create_completed(t.id, ExtractionResult::default())
            .await
            .unwrap();

        let pending: Vec<Uuid> = store
            .list_pending()
            .await
            .unwrap()
            .into_iter()
            .map(|j| j.id)
            .collect();
        assert_eq!(pending, vec![first.id, second.id]);
    }
}
