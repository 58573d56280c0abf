use sqlx::Row;
use std::path::Path;
use tempfile::TempDir;

use audio_ingest::analyzer::{AudioMeta, VoiceSegment};
use audio_ingest::db;
use audio_ingest::models::{JobKind, JobStatus, UploadStatus};
use audio_ingest::queries::{jobs, segments};
use audio_ingest::store::JobStore;

async fn open_store(dir: &Path) -> JobStore {
    let pool = db::open_database_connection(dir.join("test.sqlite"))
        .await
        .unwrap();
    db::init_database_schema(&pool).await.unwrap();
    JobStore::new(pool)
}

fn sample_meta() -> AudioMeta {
    AudioMeta {
        duration_s: 1.5,
        channels: 1,
        sample_rate: 16_000,
        format: "wav".to_string(),
        rms_avg: 123.456,
        zcr_avg: 0.25,
    }
}

fn sample_segments() -> Vec<VoiceSegment> {
    vec![
        VoiceSegment {
            start_ms: 500,
            end_ms: 1000,
            rms: 8123.5,
            zcr: 0.9,
        },
        VoiceSegment {
            start_ms: 1200,
            end_ms: 1400,
            rms: 900.25,
            zcr: 0.5,
        },
    ]
}

#[tokio::test]
async fn claim_on_empty_queue_returns_none() {
    let dir = TempDir::new().unwrap();
    let store = open_store(dir.path()).await;
    assert!(store.claim_next(JobKind::Analyze).await.unwrap().is_none());
}

#[tokio::test]
async fn claim_transitions_job_and_increments_attempts() {
    let dir = TempDir::new().unwrap();
    let store = open_store(dir.path()).await;

    let upload = store
        .create_upload("a.wav", "audio/wav", 42, None)
        .await
        .unwrap();
    assert_eq!(upload.status, UploadStatus::Receiving);
    store.mark_upload_received(&upload.id, 42).await.unwrap();
    let job = store
        .enqueue_job(&upload.id, JobKind::Analyze, None)
        .await
        .unwrap();
    assert_eq!(job.status, JobStatus::Queued);
    assert_eq!(job.attempts, 0);

    let claimed = store.claim_next(JobKind::Analyze).await.unwrap().unwrap();
    assert_eq!(claimed.id, job.id);
    assert_eq!(claimed.status, JobStatus::InProgress);
    assert_eq!(claimed.attempts, 1);

    // an in_progress job is not claimable again
    assert!(store.claim_next(JobKind::Analyze).await.unwrap().is_none());
}

#[tokio::test]
async fn duplicate_enqueue_for_same_kind_is_rejected() {
    let dir = TempDir::new().unwrap();
    let store = open_store(dir.path()).await;

    let upload = store
        .create_upload("a.wav", "audio/wav", 42, None)
        .await
        .unwrap();
    store
        .enqueue_job(&upload.id, JobKind::Analyze, None)
        .await
        .unwrap();
    assert!(store
        .enqueue_job(&upload.id, JobKind::Analyze, None)
        .await
        .is_err());
}

#[tokio::test]
async fn unknown_job_type_rows_are_never_claimed() {
    let dir = TempDir::new().unwrap();
    let store = open_store(dir.path()).await;

    let upload = store
        .create_upload("a.wav", "audio/wav", 42, None)
        .await
        .unwrap();
    let sql = jobs::insert(
        "job-transcode",
        &upload.id,
        "transcode",
        JobStatus::Queued.as_str(),
        None,
        0,
    );
    sqlx::query(&sql).execute(store.pool()).await.unwrap();

    assert!(store.claim_next(JobKind::Analyze).await.unwrap().is_none());
    let row = store.get_job("job-transcode").await.unwrap().unwrap();
    assert_eq!(row.status, JobStatus::Queued);
    assert_eq!(row.kind(), None);
}

#[tokio::test]
async fn save_analysis_result_round_trips_exactly() {
    let dir = TempDir::new().unwrap();
    let store = open_store(dir.path()).await;

    let upload = store
        .create_upload("a.wav", "audio/wav", 42, None)
        .await
        .unwrap();
    store.mark_upload_received(&upload.id, 42).await.unwrap();
    let job = store
        .enqueue_job(&upload.id, JobKind::Analyze, None)
        .await
        .unwrap();
    store.claim_next(JobKind::Analyze).await.unwrap().unwrap();

    let meta = sample_meta();
    let voice_segments = sample_segments();
    let audio_id = store
        .save_analysis_result(
            &job.id,
            &upload.id,
            "storage/uploads/a/file",
            &meta,
            &voice_segments,
        )
        .await
        .unwrap();

    let job = store.get_job(&job.id).await.unwrap().unwrap();
    assert_eq!(job.status, JobStatus::Done);
    let upload = store.get_upload(&upload.id).await.unwrap().unwrap();
    assert_eq!(upload.status, UploadStatus::Ready);

    let audio = store.get_audio_file(&upload.id).await.unwrap().unwrap();
    assert_eq!(audio.id, audio_id);
    assert_eq!(audio.file_path, "storage/uploads/a/file");
    assert_eq!(audio.duration_s, meta.duration_s);
    assert_eq!(audio.channels, meta.channels as i64);
    assert_eq!(audio.sample_rate, meta.sample_rate as i64);
    assert_eq!(audio.format, meta.format);
    assert_eq!(audio.rms_avg, meta.rms_avg);
    assert_eq!(audio.zcr_avg, meta.zcr_avg);

    let rows = store.list_segments(&audio.id).await.unwrap();
    assert_eq!(rows.len(), voice_segments.len());
    for (row, seg) in rows.iter().zip(&voice_segments) {
        assert_eq!(row.start_ms, seg.start_ms);
        assert_eq!(row.end_ms, seg.end_ms);
        assert_eq!(row.rms, seg.rms);
        assert_eq!(row.zcr, seg.zcr);
        assert_eq!(row.transcript.as_deref(), Some("(placeholder)"));
    }
}

#[tokio::test]
async fn record_failure_requeue_then_permanent() {
    let dir = TempDir::new().unwrap();
    let store = open_store(dir.path()).await;

    let upload = store
        .create_upload("a.wav", "audio/wav", 42, None)
        .await
        .unwrap();
    store.mark_upload_received(&upload.id, 42).await.unwrap();
    store
        .enqueue_job(&upload.id, JobKind::Analyze, None)
        .await
        .unwrap();

    let claimed = store.claim_next(JobKind::Analyze).await.unwrap().unwrap();
    store
        .record_failure(&claimed, "decode failed: boom", JobStatus::Queued, None)
        .await
        .unwrap();

    let job = store.get_job(&claimed.id).await.unwrap().unwrap();
    assert_eq!(job.status, JobStatus::Queued);
    assert_eq!(job.last_error.as_deref(), Some("decode failed: boom"));
    // upload untouched on a retryable failure
    let upload_row = store.get_upload(&upload.id).await.unwrap().unwrap();
    assert_eq!(upload_row.status, UploadStatus::Processing);

    let reclaimed = store.claim_next(JobKind::Analyze).await.unwrap().unwrap();
    assert_eq!(reclaimed.attempts, 2);

    store
        .record_failure(
            &reclaimed,
            "decode failed: boom again",
            JobStatus::Failed,
            Some(UploadStatus::Failed),
        )
        .await
        .unwrap();

    let job = store.get_job(&claimed.id).await.unwrap().unwrap();
    assert_eq!(job.status, JobStatus::Failed);
    assert_eq!(job.last_error.as_deref(), Some("decode failed: boom again"));
    let upload_row = store.get_upload(&upload.id).await.unwrap().unwrap();
    assert_eq!(upload_row.status, UploadStatus::Failed);

    // failed is terminal: nothing left to claim
    assert!(store.claim_next(JobKind::Analyze).await.unwrap().is_none());
}

#[tokio::test]
async fn deleting_an_upload_cascades_to_all_children() {
    let dir = TempDir::new().unwrap();
    let store = open_store(dir.path()).await;

    let upload = store
        .create_upload("a.wav", "audio/wav", 42, None)
        .await
        .unwrap();
    let job = store
        .enqueue_job(&upload.id, JobKind::Analyze, None)
        .await
        .unwrap();
    store.claim_next(JobKind::Analyze).await.unwrap().unwrap();
    let audio_id = store
        .save_analysis_result(
            &job.id,
            &upload.id,
            "storage/uploads/a/file",
            &sample_meta(),
            &sample_segments(),
        )
        .await
        .unwrap();

    store.delete_upload(&upload.id).await.unwrap();

    assert!(store.get_upload(&upload.id).await.unwrap().is_none());
    assert!(store.get_job(&job.id).await.unwrap().is_none());
    assert!(store.get_audio_file(&upload.id).await.unwrap().is_none());

    let sql = segments::count_for_audio(&audio_id);
    let row = sqlx::query(&sql).fetch_one(store.pool()).await.unwrap();
    let count: i64 = row.get(0);
    assert_eq!(count, 0);
}
