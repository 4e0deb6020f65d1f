//! Job queue and the worker that drains it.

use std::sync::Arc;
use std::time::Instant;

use tokio::sync::{broadcast, mpsc};
use tokio::task::{JoinHandle, JoinSet};
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

use insight_core::defaults::{EVENT_BUS_CAPACITY, JOB_MAX_CONCURRENT};
use insight_core::{Error, ExtractorProvider, Result};
use insight_db::Database;

use crate::processor::TranscriptProcessor;

/// Message used when a job cannot be queued because the worker is gone.
pub const QUEUE_CLOSED: &str = "Job queue is closed";

/// Message recorded when a job task panics.
pub const JOB_PANICKED: &str = "Job task panicked";

/// Configuration for the job worker.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Maximum number of concurrent jobs.
    pub max_concurrent_jobs: usize,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            max_concurrent_jobs: JOB_MAX_CONCURRENT,
        }
    }
}

impl WorkerConfig {
    /// Create config from environment variables (with defaults).
    ///
    /// | Variable | Default | Description |
    /// |----------|---------|-------------|
    /// | `JOB_MAX_CONCURRENT` | `4` | Max concurrent jobs |
    pub fn from_env() -> Self {
        let max_concurrent_jobs = std::env::var("JOB_MAX_CONCURRENT")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(JOB_MAX_CONCURRENT)
            .max(1);

        Self {
            max_concurrent_jobs,
        }
    }

    /// Set maximum concurrent jobs.
    pub fn with_max_concurrent(mut self, max: usize) -> Self {
        self.max_concurrent_jobs = max.max(1);
        self
    }
}

/// Event emitted by the job worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerEvent {
    /// A job was picked up.
    JobStarted { job_id: Uuid, transcript_id: Uuid },
    /// A job completed successfully.
    JobCompleted {
        job_id: Uuid,
        task_count: usize,
        cycle_count: usize,
    },
    /// A job failed.
    JobFailed { job_id: Uuid, error: String },
    /// Worker started.
    WorkerStarted,
    /// Worker stopped.
    WorkerStopped,
}

/// A job waiting for the worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueuedJob {
    pub transcript_id: Uuid,
    pub job_id: Uuid,
}

/// Sending side of the job queue. Cheap to clone.
#[derive(Debug, Clone)]
pub struct JobQueue {
    tx: mpsc::UnboundedSender<QueuedJob>,
}

impl JobQueue {
    /// Queue a job. Never blocks; fails only when the worker has stopped.
    pub fn enqueue(&self, transcript_id: Uuid, job_id: Uuid) -> Result<()> {
        self.tx
            .send(QueuedJob {
                transcript_id,
                job_id,
            })
            .map_err(|_| Error::Job(QUEUE_CLOSED.to_string()))?;

        debug!(
            subsystem = "jobs",
            component = "queue",
            op = "enqueue",
            %job_id,
            %transcript_id,
            "Job queued"
        );
        Ok(())
    }

    /// Queue every job the store still holds as pending.
    ///
    /// Called once at startup, before new submissions arrive, so jobs left
    /// behind by a stopped process still reach a terminal state.
    pub async fn requeue_pending(&self, db: &Database) -> Result<usize> {
        let pending = db.jobs.list_pending().await?;
        for job in &pending {
            self.enqueue(job.transcript_id, job.id)?;
        }

        if !pending.is_empty() {
            info!(
                subsystem = "jobs",
                component = "queue",
                op = "requeue_pending",
                job_count = pending.len(),
                "Requeued pending jobs from a previous run"
            );
        }
        Ok(pending.len())
    }
}

/// Handle for controlling a running worker.
pub struct WorkerHandle {
    shutdown_tx: mpsc::Sender<()>,
    event_rx: broadcast::Receiver<WorkerEvent>,
    task: JoinHandle<()>,
}

impl WorkerHandle {
    /// Signal the worker to shut down gracefully.
    pub async fn shutdown(&self) -> Result<()> {
        self.shutdown_tx
            .send(())
            .await
            .map_err(|_| Error::Internal("Failed to send shutdown signal".into()))?;
        Ok(())
    }

    /// Get a receiver for worker events.
    pub fn events(&self) -> broadcast::Receiver<WorkerEvent> {
        self.event_rx.resubscribe()
    }

    /// Wait for the worker loop to exit.
    pub async fn join(self) -> Result<()> {
        self.task
            .await
            .map_err(|e| Error::Internal(format!("Job worker task failed: {}", e)))
    }
}

/// Job worker that processes jobs from the queue.
pub struct JobWorker {
    processor: TranscriptProcessor,
    config: WorkerConfig,
    rx: mpsc::UnboundedReceiver<QueuedJob>,
    event_tx: broadcast::Sender<WorkerEvent>,
}

impl JobWorker {
    /// Create a worker and the queue that feeds it.
    pub fn new(
        db: Database,
        extractors: Arc<dyn ExtractorProvider>,
        config: WorkerConfig,
    ) -> (Self, JobQueue) {
        let (tx, rx) = mpsc::unbounded_channel();
        let (event_tx, _) = broadcast::channel(EVENT_BUS_CAPACITY);
        let worker = Self {
            processor: TranscriptProcessor::new(db, extractors),
            config,
            rx,
            event_tx,
        };
        (worker, JobQueue { tx })
    }

    /// Get a receiver for worker events.
    pub fn events(&self) -> broadcast::Receiver<WorkerEvent> {
        self.event_tx.subscribe()
    }

    /// Start the worker and return a handle for control.
    pub fn start(self) -> WorkerHandle {
        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);
        let event_rx = self.event_tx.subscribe();

        let task = tokio::spawn(async move {
            self.run(shutdown_rx).await;
        });

        WorkerHandle {
            shutdown_tx,
            event_rx,
            task,
        }
    }

    /// Run the worker loop.
    ///
    /// Pulls from the queue while fewer than `max_concurrent_jobs` jobs are
    /// in flight. After shutdown is signalled the queue is closed, whatever
    /// was already queued is still processed, and in-flight jobs finish.
    #[instrument(skip_all)]
    async fn run(mut self, mut shutdown_rx: mpsc::Receiver<()>) {
        let max_concurrent = self.config.max_concurrent_jobs.max(1);

        info!(
            subsystem = "jobs",
            component = "worker",
            op = "start",
            max_concurrent,
            "Job worker started"
        );
        let _ = self.event_tx.send(WorkerEvent::WorkerStarted);

        let mut tasks: JoinSet<()> = JoinSet::new();

        loop {
            tokio::select! {
                biased;
                Some(()) = shutdown_rx.recv() => {
                    info!(
                        subsystem = "jobs",
                        component = "worker",
                        op = "shutdown",
                        in_flight = tasks.len(),
                        "Job worker received shutdown signal"
                    );
                    break;
                }
                Some(joined) = tasks.join_next(), if !tasks.is_empty() => {
                    Self::reap(joined);
                }
                queued = self.rx.recv(), if tasks.len() < max_concurrent => match queued {
                    Some(job) => self.spawn_job(&mut tasks, job),
                    None => break,
                },
            }
        }

        self.rx.close();
        while let Some(job) = self.rx.recv().await {
            while tasks.len() >= max_concurrent {
                match tasks.join_next().await {
                    Some(joined) => Self::reap(joined),
                    None => break,
                }
            }
            self.spawn_job(&mut tasks, job);
        }
        while let Some(joined) = tasks.join_next().await {
            Self::reap(joined);
        }

        let _ = self.event_tx.send(WorkerEvent::WorkerStopped);
        info!(
            subsystem = "jobs",
            component = "worker",
            op = "stop",
            "Job worker stopped"
        );
    }

    fn spawn_job(&self, tasks: &mut JoinSet<()>, job: QueuedJob) {
        let processor = self.processor.clone();
        let event_tx = self.event_tx.clone();
        tasks.spawn(execute_job(processor, event_tx, job));
    }

    fn reap(joined: std::result::Result<(), tokio::task::JoinError>) {
        if let Err(e) = joined {
            error!(
                subsystem = "jobs",
                component = "worker",
                op = "reap",
                error = ?e,
                "Job task panicked"
            );
        }
    }
}

/// Execute a single queued job and broadcast its outcome.
///
/// Processing runs in its own task so a panic is observed here and the job
/// can still be marked failed.
async fn execute_job(
    processor: TranscriptProcessor,
    event_tx: broadcast::Sender<WorkerEvent>,
    job: QueuedJob,
) {
    let QueuedJob {
        transcript_id,
        job_id,
    } = job;
    let start = Instant::now();

    info!(
        subsystem = "jobs",
        component = "worker",
        op = "execute",
        %job_id,
        %transcript_id,
        "Processing job"
    );
    let _ = event_tx.send(WorkerEvent::JobStarted {
        job_id,
        transcript_id,
    });

    let runner = processor.clone();
    let outcome = tokio::spawn(async move { runner.process(transcript_id, job_id).await }).await;

    let event = match outcome {
        Ok(Ok(result)) => WorkerEvent::JobCompleted {
            job_id,
            task_count: result.tasks.len(),
            cycle_count: result.cycles.len(),
        },
        Ok(Err(e)) => WorkerEvent::JobFailed {
            job_id,
            error: e.detail(),
        },
        Err(e) => {
            warn!(
                subsystem = "jobs",
                component = "worker",
                op = "execute",
                %job_id,
                error = ?e,
                duration_ms = start.elapsed().as_millis() as u64,
                "Job task panicked, marking job failed"
            );
            processor.record_failure(job_id, JOB_PANICKED).await;
            WorkerEvent::JobFailed {
                job_id,
                error: JOB_PANICKED.to_string(),
            }
        }
    };
    let _ = event_tx.send(event);
}
