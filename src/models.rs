use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use crate::DynError;

/// Lifecycle of an upload as the pipeline sees it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadStatus {
    /// Bytes are still being received
    Receiving,
    /// Fully received, waiting for (or undergoing) analysis
    Processing,
    /// Analysis finished, results queryable
    Ready,
    /// Analysis failed permanently
    Failed,
}

impl UploadStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            UploadStatus::Receiving => "receiving",
            UploadStatus::Processing => "processing",
            UploadStatus::Ready => "ready",
            UploadStatus::Failed => "failed",
        }
    }

    pub fn parse(s: &str) -> Result<Self, DynError> {
        match s {
            "receiving" => Ok(UploadStatus::Receiving),
            "processing" => Ok(UploadStatus::Processing),
            "ready" => Ok(UploadStatus::Ready),
            "failed" => Ok(UploadStatus::Failed),
            other => Err(format!("unknown upload status '{}'", other).into()),
        }
    }
}

/// Job state machine: queued -> in_progress -> done | failed,
/// with in_progress -> queued on a retryable failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    Queued,
    InProgress,
    Done,
    Failed,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Queued => "queued",
            JobStatus::InProgress => "in_progress",
            JobStatus::Done => "done",
            JobStatus::Failed => "failed",
        }
    }

    pub fn parse(s: &str) -> Result<Self, DynError> {
        match s {
            "queued" => Ok(JobStatus::Queued),
            "in_progress" => Ok(JobStatus::InProgress),
            "done" => Ok(JobStatus::Done),
            "failed" => Ok(JobStatus::Failed),
            other => Err(format!("unknown job status '{}'", other).into()),
        }
    }
}

/// Closed set of job kinds the engine knows how to execute.
/// Rows with a type string outside this set are never claimed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobKind {
    Analyze,
}

impl JobKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobKind::Analyze => "analyze",
        }
    }

    pub fn from_type(s: &str) -> Option<Self> {
        match s {
            "analyze" => Some(JobKind::Analyze),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Upload {
    pub id: String,
    pub filename: String,
    pub content_type: String,
    pub size_bytes: i64,
    pub checksum_sha256: Option<String>,
    pub status: UploadStatus,
    pub uploaded_bytes: i64,
    pub error_message: Option<String>,
    pub created_at_ms: i64,
    pub updated_at_ms: i64,
}

impl Upload {
    pub fn from_row(row: &SqliteRow) -> Result<Self, DynError> {
        let status: String = row.try_get("status")?;
        Ok(Upload {
            id: row.try_get("id")?,
            filename: row.try_get("filename")?,
            content_type: row.try_get("content_type")?,
            size_bytes: row.try_get("size_bytes")?,
            checksum_sha256: row.try_get("checksum_sha256")?,
            status: UploadStatus::parse(&status)?,
            uploaded_bytes: row.try_get("uploaded_bytes")?,
            error_message: row.try_get("error_message")?,
            created_at_ms: row.try_get("created_at_ms")?,
            updated_at_ms: row.try_get("updated_at_ms")?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct Job {
    pub id: String,
    pub upload_id: String,
    pub job_type: String,
    pub status: JobStatus,
    pub attempts: i64,
    pub payload: Option<serde_json::Value>,
    pub last_error: Option<String>,
    pub created_at_ms: i64,
    pub updated_at_ms: i64,
}

impl Job {
    pub fn from_row(row: &SqliteRow) -> Result<Self, DynError> {
        let status: String = row.try_get("status")?;
        let payload: Option<String> = row.try_get("payload")?;
        let payload = match payload {
            Some(text) => Some(serde_json::from_str(&text)?),
            None => None,
        };
        Ok(Job {
            id: row.try_get("id")?,
            upload_id: row.try_get("upload_id")?,
            job_type: row.try_get("type")?,
            status: JobStatus::parse(&status)?,
            attempts: row.try_get("attempts")?,
            payload,
            last_error: row.try_get("last_error")?,
            created_at_ms: row.try_get("created_at_ms")?,
            updated_at_ms: row.try_get("updated_at_ms")?,
        })
    }

    pub fn kind(&self) -> Option<JobKind> {
        JobKind::from_type(&self.job_type)
    }
}

#[derive(Debug, Clone)]
pub struct AudioFile {
    pub id: String,
    pub upload_id: String,
    pub file_path: String,
    pub duration_s: f64,
    pub channels: i64,
    pub sample_rate: i64,
    pub format: String,
    pub rms_avg: f64,
    pub zcr_avg: f64,
    pub created_at_ms: i64,
}

impl AudioFile {
    pub fn from_row(row: &SqliteRow) -> Result<Self, DynError> {
        Ok(AudioFile {
            id: row.try_get("id")?,
            upload_id: row.try_get("upload_id")?,
            file_path: row.try_get("file_path")?,
            duration_s: row.try_get("duration_s")?,
            channels: row.try_get("channels")?,
            sample_rate: row.try_get("sample_rate")?,
            format: row.try_get("format")?,
            rms_avg: row.try_get("rms_avg")?,
            zcr_avg: row.try_get("zcr_avg")?,
            created_at_ms: row.try_get("created_at_ms")?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct SegmentRow {
    pub id: i64,
    pub audio_id: String,
    pub start_ms: i64,
    pub end_ms: i64,
    pub rms: f64,
    pub zcr: f64,
    pub transcript: Option<String>,
    pub created_at_ms: i64,
}

impl SegmentRow {
    pub fn from_row(row: &SqliteRow) -> Result<Self, DynError> {
        Ok(SegmentRow {
            id: row.try_get("id")?,
            audio_id: row.try_get("audio_id")?,
            start_ms: row.try_get("start_ms")?,
            end_ms: row.try_get("end_ms")?,
            rms: row.try_get("rms")?,
            zcr: row.try_get("zcr")?,
            transcript: row.try_get("transcript")?,
            created_at_ms: row.try_get("created_at_ms")?,
        })
    }
}
