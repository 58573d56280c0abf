//! Background worker: polls the job store, runs analysis, routes outcomes.
//!
//! Any number of worker loops may run against the same database, in one
//! process or several; the store's atomic claim is the only serialization
//! point between them.

use log::{error, info, warn};
use std::path::PathBuf;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::analyzer;
use crate::config::WorkerSettings;
use crate::models::{Job, JobKind, JobStatus, UploadStatus};
use crate::retry::{self, RetryDecision};
use crate::storage;
use crate::store::JobStore;
use crate::DynError;

#[derive(Clone)]
pub struct Worker {
    store: JobStore,
    settings: WorkerSettings,
    storage_dir: PathBuf,
}

impl Worker {
    pub fn new(store: JobStore, settings: WorkerSettings, storage_dir: PathBuf) -> Self {
        Worker {
            store,
            settings,
            storage_dir,
        }
    }

    /// Run the polling loop until the token is cancelled.
    ///
    /// Cancellation stops new claims; a job already being processed runs to
    /// completion, including its failure bookkeeping, before the loop exits.
    /// No error from claiming, processing or persisting escapes the loop.
    pub async fn run(&self, cancel: CancellationToken) {
        info!("Worker started");
        while !cancel.is_cancelled() {
            let job = match self.store.claim_next(JobKind::Analyze).await {
                Ok(Some(job)) => job,
                Ok(None) => {
                    self.idle(&cancel).await;
                    continue;
                }
                Err(e) => {
                    error!("Failed to claim next job: {}", e);
                    self.idle(&cancel).await;
                    continue;
                }
            };

            info!("Picked job {} (attempt {})", job.id, job.attempts);
            match self.process_job(&job).await {
                Ok(()) => info!("Job {} finished successfully", job.id),
                Err(e) => {
                    warn!("Job {} failed: {}", job.id, e);
                    if let Err(persist_err) = self.handle_failure(&job, &e.to_string()).await {
                        error!(
                            "Failed to record failure for job {}: {}",
                            job.id, persist_err
                        );
                    }
                }
            }
        }
        info!("Worker stopped");
    }

    async fn idle(&self, cancel: &CancellationToken) {
        tokio::select! {
            _ = cancel.cancelled() => {}
            _ = tokio::time::sleep(Duration::from_secs(self.settings.poll_interval_secs)) => {}
        }
    }

    async fn process_job(&self, job: &Job) -> Result<(), DynError> {
        match job.kind() {
            Some(JobKind::Analyze) => self.run_analysis(job).await,
            // claim_next filters on a known kind, so this only fires if the
            // row was tampered with between claim and dispatch
            None => Err(format!("unknown job type '{}'", job.job_type).into()),
        }
    }

    async fn run_analysis(&self, job: &Job) -> Result<(), DynError> {
        let upload = self
            .store
            .get_upload(&job.upload_id)
            .await?
            .ok_or_else(|| format!("upload {} not found", job.upload_id))?;

        let file_path = storage::upload_file_path(&self.storage_dir, &upload.id);
        info!("Processing file {}", file_path.display());

        let bytes = tokio::fs::read(&file_path)
            .await
            .map_err(|e| format!("failed to read {}: {}", file_path.display(), e))?;

        // analysis is CPU-bound; keep it off the poll path
        let (meta, voice_segments) =
            tokio::task::spawn_blocking(move || analyzer::analyze_wav_bytes(&bytes))
                .await
                .map_err(|e| format!("analysis task panicked: {}", e))??;

        self.store
            .save_analysis_result(
                &job.id,
                &upload.id,
                &file_path.to_string_lossy(),
                &meta,
                &voice_segments,
            )
            .await?;
        Ok(())
    }

    /// Route a failed attempt: requeue with backoff, or fail permanently.
    ///
    /// On the retry path the error is recorded first while the job stays
    /// claimed, the backoff elapses with no transaction open, and a second
    /// atomic write releases the job back to the queue. Other workers can
    /// neither claim the job early nor stall behind this one.
    async fn handle_failure(&self, job: &Job, error_text: &str) -> Result<(), DynError> {
        match retry::decide(job.attempts, &self.settings) {
            RetryDecision::GiveUp => {
                error!(
                    "Job {} failed permanently after {} attempts",
                    job.id, job.attempts
                );
                self.store
                    .record_failure(job, error_text, JobStatus::Failed, Some(UploadStatus::Failed))
                    .await
            }
            RetryDecision::Retry { delay } => {
                warn!("Retrying job {} in {}s", job.id, delay.as_secs());
                self.store
                    .record_failure(job, error_text, JobStatus::InProgress, None)
                    .await?;
                tokio::time::sleep(delay).await;
                self.store
                    .record_failure(job, error_text, JobStatus::Queued, None)
                    .await
            }
        }
    }
}
