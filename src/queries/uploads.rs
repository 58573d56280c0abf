use sea_query::{Expr, Order, Query, SqliteQueryBuilder};

use crate::schema::Uploads;

/// INSERT INTO uploads (id, filename, content_type, size_bytes, checksum_sha256,
/// status, uploaded_bytes, created_at_ms, updated_at_ms)
/// VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
pub fn insert(
    id: &str,
    filename: &str,
    content_type: &str,
    size_bytes: i64,
    checksum_sha256: Option<&str>,
    status: &str,
    uploaded_bytes: i64,
    now_ms: i64,
) -> String {
    Query::insert()
        .into_table(Uploads::Table)
        .columns([
            Uploads::Id,
            Uploads::Filename,
            Uploads::ContentType,
            Uploads::SizeBytes,
            Uploads::ChecksumSha256,
            Uploads::Status,
            Uploads::UploadedBytes,
            Uploads::CreatedAtMs,
            Uploads::UpdatedAtMs,
        ])
        .values_panic([
            id.into(),
            filename.into(),
            content_type.into(),
            size_bytes.into(),
            checksum_sha256.map(|c| c.to_string()).into(),
            status.into(),
            uploaded_bytes.into(),
            now_ms.into(),
            now_ms.into(),
        ])
        .to_string(SqliteQueryBuilder)
}

/// SELECT * FROM uploads WHERE id = ?
pub fn select_by_id(id: &str) -> String {
    Query::select()
        .columns([
            Uploads::Id,
            Uploads::Filename,
            Uploads::ContentType,
            Uploads::SizeBytes,
            Uploads::ChecksumSha256,
            Uploads::Status,
            Uploads::UploadedBytes,
            Uploads::ErrorMessage,
            Uploads::CreatedAtMs,
            Uploads::UpdatedAtMs,
        ])
        .from(Uploads::Table)
        .and_where(Expr::col(Uploads::Id).eq(id))
        .to_string(SqliteQueryBuilder)
}

/// SELECT * FROM uploads ORDER BY created_at_ms
pub fn select_all() -> String {
    Query::select()
        .columns([
            Uploads::Id,
            Uploads::Filename,
            Uploads::ContentType,
            Uploads::SizeBytes,
            Uploads::ChecksumSha256,
            Uploads::Status,
            Uploads::UploadedBytes,
            Uploads::ErrorMessage,
            Uploads::CreatedAtMs,
            Uploads::UpdatedAtMs,
        ])
        .from(Uploads::Table)
        .order_by(Uploads::CreatedAtMs, Order::Asc)
        .to_string(SqliteQueryBuilder)
}

/// UPDATE uploads SET status = ?, updated_at_ms = ? WHERE id = ?
pub fn update_status(id: &str, status: &str, now_ms: i64) -> String {
    Query::update()
        .table(Uploads::Table)
        .value(Uploads::Status, status)
        .value(Uploads::UpdatedAtMs, now_ms)
        .and_where(Expr::col(Uploads::Id).eq(id))
        .to_string(SqliteQueryBuilder)
}

/// UPDATE uploads SET uploaded_bytes = ?, status = ?, updated_at_ms = ? WHERE id = ?
/// Marks an upload as fully received and ready for analysis
pub fn mark_received(id: &str, uploaded_bytes: i64, status: &str, now_ms: i64) -> String {
    Query::update()
        .table(Uploads::Table)
        .value(Uploads::UploadedBytes, uploaded_bytes)
        .value(Uploads::Status, status)
        .value(Uploads::UpdatedAtMs, now_ms)
        .and_where(Expr::col(Uploads::Id).eq(id))
        .to_string(SqliteQueryBuilder)
}

/// DELETE FROM uploads WHERE id = ?
/// Cascades to jobs, audio_files and segments
pub fn delete_by_id(id: &str) -> String {
    Query::delete()
        .from_table(Uploads::Table)
        .and_where(Expr::col(Uploads::Id).eq(id))
        .to_string(SqliteQueryBuilder)
}
