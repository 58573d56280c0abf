use sea_query::{
    ColumnDef, ForeignKey, ForeignKeyAction, Index, SqliteQueryBuilder, Table,
};

use crate::schema::{AudioFiles, Jobs, Segments, Uploads};

/// CREATE TABLE IF NOT EXISTS uploads (
///     id TEXT PRIMARY KEY,
///     filename TEXT NOT NULL,
///     content_type TEXT NOT NULL,
///     size_bytes INTEGER NOT NULL,
///     checksum_sha256 TEXT,
///     status TEXT NOT NULL,
///     uploaded_bytes INTEGER NOT NULL DEFAULT 0,
///     error_message TEXT,
///     created_at_ms INTEGER NOT NULL,
///     updated_at_ms INTEGER NOT NULL
/// )
pub fn create_uploads_table() -> String {
    Table::create()
        .table(Uploads::Table)
        .if_not_exists()
        .col(ColumnDef::new(Uploads::Id).string().primary_key())
        .col(ColumnDef::new(Uploads::Filename).string().not_null())
        .col(ColumnDef::new(Uploads::ContentType).string().not_null())
        .col(ColumnDef::new(Uploads::SizeBytes).big_integer().not_null())
        .col(ColumnDef::new(Uploads::ChecksumSha256).string())
        .col(ColumnDef::new(Uploads::Status).string().not_null())
        .col(
            ColumnDef::new(Uploads::UploadedBytes)
                .big_integer()
                .not_null()
                .default(0),
        )
        .col(ColumnDef::new(Uploads::ErrorMessage).string())
        .col(ColumnDef::new(Uploads::CreatedAtMs).big_integer().not_null())
        .col(ColumnDef::new(Uploads::UpdatedAtMs).big_integer().not_null())
        .to_string(SqliteQueryBuilder)
}

/// CREATE TABLE IF NOT EXISTS jobs (
///     id TEXT PRIMARY KEY,
///     upload_id TEXT NOT NULL REFERENCES uploads(id) ON DELETE CASCADE,
///     type TEXT NOT NULL,
///     status TEXT NOT NULL,
///     attempts INTEGER NOT NULL DEFAULT 0,
///     payload TEXT,
///     last_error TEXT,
///     created_at_ms INTEGER NOT NULL,
///     updated_at_ms INTEGER NOT NULL
/// )
pub fn create_jobs_table() -> String {
    Table::create()
        .table(Jobs::Table)
        .if_not_exists()
        .col(ColumnDef::new(Jobs::Id).string().primary_key())
        .col(ColumnDef::new(Jobs::UploadId).string().not_null())
        .col(ColumnDef::new(Jobs::Type).string().not_null())
        .col(ColumnDef::new(Jobs::Status).string().not_null())
        .col(
            ColumnDef::new(Jobs::Attempts)
                .big_integer()
                .not_null()
                .default(0),
        )
        .col(ColumnDef::new(Jobs::Payload).string())
        .col(ColumnDef::new(Jobs::LastError).string())
        .col(ColumnDef::new(Jobs::CreatedAtMs).big_integer().not_null())
        .col(ColumnDef::new(Jobs::UpdatedAtMs).big_integer().not_null())
        .foreign_key(
            ForeignKey::create()
                .from(Jobs::Table, Jobs::UploadId)
                .to(Uploads::Table, Uploads::Id)
                .on_delete(ForeignKeyAction::Cascade),
        )
        .to_string(SqliteQueryBuilder)
}

/// CREATE TABLE IF NOT EXISTS audio_files (
///     id TEXT PRIMARY KEY,
///     upload_id TEXT NOT NULL REFERENCES uploads(id) ON DELETE CASCADE,
///     file_path TEXT NOT NULL,
///     duration_s REAL NOT NULL,
///     channels INTEGER NOT NULL,
///     sample_rate INTEGER NOT NULL,
///     format TEXT NOT NULL,
///     rms_avg REAL NOT NULL,
///     zcr_avg REAL NOT NULL,
///     created_at_ms INTEGER NOT NULL
/// )
pub fn create_audio_files_table() -> String {
    Table::create()
        .table(AudioFiles::Table)
        .if_not_exists()
        .col(ColumnDef::new(AudioFiles::Id).string().primary_key())
        .col(ColumnDef::new(AudioFiles::UploadId).string().not_null())
        .col(ColumnDef::new(AudioFiles::FilePath).string().not_null())
        .col(ColumnDef::new(AudioFiles::DurationS).double().not_null())
        .col(ColumnDef::new(AudioFiles::Channels).big_integer().not_null())
        .col(
            ColumnDef::new(AudioFiles::SampleRate)
                .big_integer()
                .not_null(),
        )
        .col(ColumnDef::new(AudioFiles::Format).string().not_null())
        .col(ColumnDef::new(AudioFiles::RmsAvg).double().not_null())
        .col(ColumnDef::new(AudioFiles::ZcrAvg).double().not_null())
        .col(
            ColumnDef::new(AudioFiles::CreatedAtMs)
                .big_integer()
                .not_null(),
        )
        .foreign_key(
            ForeignKey::create()
                .from(AudioFiles::Table, AudioFiles::UploadId)
                .to(Uploads::Table, Uploads::Id)
                .on_delete(ForeignKeyAction::Cascade),
        )
        .to_string(SqliteQueryBuilder)
}

/// CREATE TABLE IF NOT EXISTS segments (
///     id INTEGER PRIMARY KEY AUTOINCREMENT,
///     audio_id TEXT NOT NULL REFERENCES audio_files(id) ON DELETE CASCADE,
///     start_ms INTEGER NOT NULL,
///     end_ms INTEGER NOT NULL,
///     rms REAL NOT NULL,
///     zcr REAL NOT NULL,
///     transcript TEXT,
///     created_at_ms INTEGER NOT NULL
/// )
pub fn create_segments_table() -> String {
    Table::create()
        .table(Segments::Table)
        .if_not_exists()
        .col(
            ColumnDef::new(Segments::Id)
                .integer()
                .primary_key()
                .auto_increment(),
        )
        .col(ColumnDef::new(Segments::AudioId).string().not_null())
        .col(ColumnDef::new(Segments::StartMs).big_integer().not_null())
        .col(ColumnDef::new(Segments::EndMs).big_integer().not_null())
        .col(ColumnDef::new(Segments::Rms).double().not_null())
        .col(ColumnDef::new(Segments::Zcr).double().not_null())
        .col(ColumnDef::new(Segments::Transcript).string())
        .col(ColumnDef::new(Segments::CreatedAtMs).big_integer().not_null())
        .foreign_key(
            ForeignKey::create()
                .from(Segments::Table, Segments::AudioId)
                .to(AudioFiles::Table, AudioFiles::Id)
                .on_delete(ForeignKeyAction::Cascade),
        )
        .to_string(SqliteQueryBuilder)
}

/// CREATE UNIQUE INDEX IF NOT EXISTS uq_jobs_upload_type ON jobs(upload_id, type)
pub fn create_jobs_upload_type_unique_index() -> String {
    Index::create()
        .if_not_exists()
        .unique()
        .name("uq_jobs_upload_type")
        .table(Jobs::Table)
        .col(Jobs::UploadId)
        .col(Jobs::Type)
        .to_string(SqliteQueryBuilder)
}

/// CREATE INDEX IF NOT EXISTS idx_jobs_type_status ON jobs(type, status)
pub fn create_jobs_claim_index() -> String {
    Index::create()
        .if_not_exists()
        .name("idx_jobs_type_status")
        .table(Jobs::Table)
        .col(Jobs::Type)
        .col(Jobs::Status)
        .to_string(SqliteQueryBuilder)
}

/// CREATE INDEX IF NOT EXISTS idx_audio_files_upload_id ON audio_files(upload_id)
pub fn create_audio_files_upload_id_index() -> String {
    Index::create()
        .if_not_exists()
        .name("idx_audio_files_upload_id")
        .table(AudioFiles::Table)
        .col(AudioFiles::UploadId)
        .to_string(SqliteQueryBuilder)
}

/// CREATE INDEX IF NOT EXISTS idx_segments_audio_id ON segments(audio_id)
pub fn create_segments_audio_id_index() -> String {
    Index::create()
        .if_not_exists()
        .name("idx_segments_audio_id")
        .table(Segments::Table)
        .col(Segments::AudioId)
        .to_string(SqliteQueryBuilder)
}
