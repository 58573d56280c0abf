//! Persistence adapter for the job engine.
//!
//! All reads and writes of the uploads/jobs/audio_files/segments tables go
//! through here. Every mutating operation is a single atomic statement or an
//! explicit transaction: an uncommitted transaction rolls back when dropped,
//! so no exit path can leave a partial write behind.

use chrono::Utc;
use sqlx::sqlite::SqlitePool;
use uuid::Uuid;

use crate::analyzer::{AudioMeta, VoiceSegment};
use crate::constants::TRANSCRIPT_PLACEHOLDER;
use crate::models::{AudioFile, Job, JobKind, JobStatus, SegmentRow, Upload, UploadStatus};
use crate::queries::{audio_files, jobs, segments, uploads};
use crate::DynError;

fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

#[derive(Clone)]
pub struct JobStore {
    pool: SqlitePool,
}

impl JobStore {
    pub fn new(pool: SqlitePool) -> Self {
        JobStore { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Atomically claim one queued job of the given kind.
    ///
    /// The claim transitions the row to `in_progress` and increments
    /// `attempts` in the same statement that selects it, so a job is handed
    /// to at most one caller no matter how many workers poll concurrently.
    /// A row contended by another claimant is simply not matched; callers
    /// never wait on each other.
    pub async fn claim_next(&self, kind: JobKind) -> Result<Option<Job>, DynError> {
        let sql = jobs::claim_next(
            kind.as_str(),
            JobStatus::Queued.as_str(),
            JobStatus::InProgress.as_str(),
            now_ms(),
        );
        let row = sqlx::query(&sql).fetch_optional(&self.pool).await?;
        match row {
            Some(row) => Ok(Some(Job::from_row(&row)?)),
            None => Ok(None),
        }
    }

    /// Persist a completed analysis in one atomic unit: the audio file row,
    /// its segments, job -> done, upload -> ready. Returns the audio file id.
    pub async fn save_analysis_result(
        &self,
        job_id: &str,
        upload_id: &str,
        file_path: &str,
        meta: &AudioMeta,
        voice_segments: &[VoiceSegment],
    ) -> Result<String, DynError> {
        let audio_id = Uuid::new_v4().to_string();
        let now = now_ms();

        let mut tx = self.pool.begin().await?;

        let sql = audio_files::insert(
            &audio_id,
            upload_id,
            file_path,
            meta.duration_s,
            meta.channels as i64,
            meta.sample_rate as i64,
            &meta.format,
            meta.rms_avg,
            meta.zcr_avg,
            now,
        );
        sqlx::query(&sql).execute(&mut *tx).await?;

        for seg in voice_segments {
            let sql = segments::insert(
                &audio_id,
                seg.start_ms,
                seg.end_ms,
                seg.rms,
                seg.zcr,
                Some(TRANSCRIPT_PLACEHOLDER),
                now,
            );
            sqlx::query(&sql).execute(&mut *tx).await?;
        }

        let sql = jobs::update_status(job_id, JobStatus::Done.as_str(), now);
        sqlx::query(&sql).execute(&mut *tx).await?;

        let sql = uploads::update_status(upload_id, UploadStatus::Ready.as_str(), now);
        sqlx::query(&sql).execute(&mut *tx).await?;

        tx.commit().await?;
        Ok(audio_id)
    }

    /// Record a failed attempt: last_error plus the next job status, and
    /// optionally the owning upload's status, in one atomic unit.
    pub async fn record_failure(
        &self,
        job: &Job,
        error: &str,
        next_status: JobStatus,
        next_upload_status: Option<UploadStatus>,
    ) -> Result<(), DynError> {
        let now = now_ms();
        let mut tx = self.pool.begin().await?;

        let sql = jobs::update_failure(&job.id, error, next_status.as_str(), now);
        sqlx::query(&sql).execute(&mut *tx).await?;

        if let Some(upload_status) = next_upload_status {
            let sql = uploads::update_status(&job.upload_id, upload_status.as_str(), now);
            sqlx::query(&sql).execute(&mut *tx).await?;
        }

        tx.commit().await?;
        Ok(())
    }

    /// Register a new upload in `receiving` state
    pub async fn create_upload(
        &self,
        filename: &str,
        content_type: &str,
        size_bytes: i64,
        checksum_sha256: Option<&str>,
    ) -> Result<Upload, DynError> {
        let id = Uuid::new_v4().to_string();
        let now = now_ms();
        let sql = uploads::insert(
            &id,
            filename,
            content_type,
            size_bytes,
            checksum_sha256,
            UploadStatus::Receiving.as_str(),
            0,
            now,
        );
        sqlx::query(&sql).execute(&self.pool).await?;

        Ok(Upload {
            id,
            filename: filename.to_string(),
            content_type: content_type.to_string(),
            size_bytes,
            checksum_sha256: checksum_sha256.map(|c| c.to_string()),
            status: UploadStatus::Receiving,
            uploaded_bytes: 0,
            error_message: None,
            created_at_ms: now,
            updated_at_ms: now,
        })
    }

    /// Mark an upload's bytes as fully received and ready for analysis
    pub async fn mark_upload_received(
        &self,
        upload_id: &str,
        uploaded_bytes: i64,
    ) -> Result<(), DynError> {
        let sql = uploads::mark_received(
            upload_id,
            uploaded_bytes,
            UploadStatus::Processing.as_str(),
            now_ms(),
        );
        sqlx::query(&sql).execute(&self.pool).await?;
        Ok(())
    }

    /// Enqueue a job for an upload. At most one job of a given kind may
    /// exist per upload; a duplicate enqueue surfaces the unique-constraint
    /// violation as an error.
    pub async fn enqueue_job(
        &self,
        upload_id: &str,
        kind: JobKind,
        payload: Option<&serde_json::Value>,
    ) -> Result<Job, DynError> {
        let id = Uuid::new_v4().to_string();
        let now = now_ms();
        let payload_text = payload.map(|p| p.to_string());
        let sql = jobs::insert(
            &id,
            upload_id,
            kind.as_str(),
            JobStatus::Queued.as_str(),
            payload_text.as_deref(),
            now,
        );
        sqlx::query(&sql).execute(&self.pool).await?;

        Ok(Job {
            id,
            upload_id: upload_id.to_string(),
            job_type: kind.as_str().to_string(),
            status: JobStatus::Queued,
            attempts: 0,
            payload: payload.cloned(),
            last_error: None,
            created_at_ms: now,
            updated_at_ms: now,
        })
    }

    pub async fn get_upload(&self, upload_id: &str) -> Result<Option<Upload>, DynError> {
        let sql = uploads::select_by_id(upload_id);
        let row = sqlx::query(&sql).fetch_optional(&self.pool).await?;
        match row {
            Some(row) => Ok(Some(Upload::from_row(&row)?)),
            None => Ok(None),
        }
    }

    pub async fn list_uploads(&self) -> Result<Vec<Upload>, DynError> {
        let sql = uploads::select_all();
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;
        rows.iter().map(Upload::from_row).collect()
    }

    pub async fn get_job(&self, job_id: &str) -> Result<Option<Job>, DynError> {
        let sql = jobs::select_by_id(job_id);
        let row = sqlx::query(&sql).fetch_optional(&self.pool).await?;
        match row {
            Some(row) => Ok(Some(Job::from_row(&row)?)),
            None => Ok(None),
        }
    }

    pub async fn get_job_for_upload(
        &self,
        upload_id: &str,
        kind: JobKind,
    ) -> Result<Option<Job>, DynError> {
        let sql = jobs::select_by_upload_and_type(upload_id, kind.as_str());
        let row = sqlx::query(&sql).fetch_optional(&self.pool).await?;
        match row {
            Some(row) => Ok(Some(Job::from_row(&row)?)),
            None => Ok(None),
        }
    }

    pub async fn get_audio_file(&self, upload_id: &str) -> Result<Option<AudioFile>, DynError> {
        let sql = audio_files::select_by_upload_id(upload_id);
        let row = sqlx::query(&sql).fetch_optional(&self.pool).await?;
        match row {
            Some(row) => Ok(Some(AudioFile::from_row(&row)?)),
            None => Ok(None),
        }
    }

    pub async fn list_segments(&self, audio_id: &str) -> Result<Vec<SegmentRow>, DynError> {
        let sql = segments::select_by_audio_id(audio_id);
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;
        rows.iter().map(SegmentRow::from_row).collect()
    }

    /// Delete an upload; jobs, audio files and segments cascade with it
    pub async fn delete_upload(&self, upload_id: &str) -> Result<(), DynError> {
        let sql = uploads::delete_by_id(upload_id);
        sqlx::query(&sql).execute(&self.pool).await?;
        Ok(())
    }
}
