use sea_query::{Expr, Query, SqliteQueryBuilder};

use crate::schema::AudioFiles;

/// INSERT INTO audio_files (id, upload_id, file_path, duration_s, channels,
/// sample_rate, format, rms_avg, zcr_avg, created_at_ms)
/// VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
pub fn insert(
    id: &str,
    upload_id: &str,
    file_path: &str,
    duration_s: f64,
    channels: i64,
    sample_rate: i64,
    format: &str,
    rms_avg: f64,
    zcr_avg: f64,
    now_ms: i64,
) -> String {
    Query::insert()
        .into_table(AudioFiles::Table)
        .columns([
            AudioFiles::Id,
            AudioFiles::UploadId,
            AudioFiles::FilePath,
            AudioFiles::DurationS,
            AudioFiles::Channels,
            AudioFiles::SampleRate,
            AudioFiles::Format,
            AudioFiles::RmsAvg,
            AudioFiles::ZcrAvg,
            AudioFiles::CreatedAtMs,
        ])
        .values_panic([
            id.into(),
            upload_id.into(),
            file_path.into(),
            duration_s.into(),
            channels.into(),
            sample_rate.into(),
            format.into(),
            rms_avg.into(),
            zcr_avg.into(),
            now_ms.into(),
        ])
        .to_string(SqliteQueryBuilder)
}

/// SELECT * FROM audio_files WHERE upload_id = ?
pub fn select_by_upload_id(upload_id: &str) -> String {
    Query::select()
        .columns([
            AudioFiles::Id,
            AudioFiles::UploadId,
            AudioFiles::FilePath,
            AudioFiles::DurationS,
            AudioFiles::Channels,
            AudioFiles::SampleRate,
            AudioFiles::Format,
            AudioFiles::RmsAvg,
            AudioFiles::ZcrAvg,
            AudioFiles::CreatedAtMs,
        ])
        .from(AudioFiles::Table)
        .and_where(Expr::col(AudioFiles::UploadId).eq(upload_id))
        .to_string(SqliteQueryBuilder)
}
