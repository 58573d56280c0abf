use sea_query::{Expr, Query, SqliteQueryBuilder};

use crate::schema::Jobs;

const JOB_COLUMNS: [Jobs; 9] = [
    Jobs::Id,
    Jobs::UploadId,
    Jobs::Type,
    Jobs::Status,
    Jobs::Attempts,
    Jobs::Payload,
    Jobs::LastError,
    Jobs::CreatedAtMs,
    Jobs::UpdatedAtMs,
];

/// INSERT INTO jobs (id, upload_id, type, status, payload, created_at_ms, updated_at_ms)
/// VALUES (?, ?, ?, ?, ?, ?, ?)
pub fn insert(
    id: &str,
    upload_id: &str,
    job_type: &str,
    status: &str,
    payload: Option<&str>,
    now_ms: i64,
) -> String {
    Query::insert()
        .into_table(Jobs::Table)
        .columns([
            Jobs::Id,
            Jobs::UploadId,
            Jobs::Type,
            Jobs::Status,
            Jobs::Payload,
            Jobs::CreatedAtMs,
            Jobs::UpdatedAtMs,
        ])
        .values_panic([
            id.into(),
            upload_id.into(),
            job_type.into(),
            status.into(),
            payload.map(|p| p.to_string()).into(),
            now_ms.into(),
            now_ms.into(),
        ])
        .to_string(SqliteQueryBuilder)
}

/// UPDATE jobs SET status = 'in_progress', attempts = attempts + 1, updated_at_ms = ?
/// WHERE id = (SELECT id FROM jobs WHERE type = ? AND status = 'queued' LIMIT 1)
///   AND status = 'queued'
/// RETURNING *
///
/// A single statement so the select-and-transition is atomic: under
/// concurrent callers only one UPDATE can match the guarded row, the others
/// match nothing and claim nothing (skip, never wait).
pub fn claim_next(job_type: &str, queued: &str, in_progress: &str, now_ms: i64) -> String {
    let candidate = Query::select()
        .column(Jobs::Id)
        .from(Jobs::Table)
        .and_where(Expr::col(Jobs::Type).eq(job_type))
        .and_where(Expr::col(Jobs::Status).eq(queued))
        .limit(1)
        .to_owned();

    Query::update()
        .table(Jobs::Table)
        .value(Jobs::Status, in_progress)
        .value(Jobs::Attempts, Expr::col(Jobs::Attempts).add(1))
        .value(Jobs::UpdatedAtMs, now_ms)
        .and_where(Expr::col(Jobs::Id).in_subquery(candidate))
        .and_where(Expr::col(Jobs::Status).eq(queued))
        .returning_all()
        .to_string(SqliteQueryBuilder)
}

/// UPDATE jobs SET last_error = ?, status = ?, updated_at_ms = ? WHERE id = ?
pub fn update_failure(id: &str, last_error: &str, status: &str, now_ms: i64) -> String {
    Query::update()
        .table(Jobs::Table)
        .value(Jobs::LastError, last_error)
        .value(Jobs::Status, status)
        .value(Jobs::UpdatedAtMs, now_ms)
        .and_where(Expr::col(Jobs::Id).eq(id))
        .to_string(SqliteQueryBuilder)
}

/// UPDATE jobs SET status = ?, updated_at_ms = ? WHERE id = ?
pub fn update_status(id: &str, status: &str, now_ms: i64) -> String {
    Query::update()
        .table(Jobs::Table)
        .value(Jobs::Status, status)
        .value(Jobs::UpdatedAtMs, now_ms)
        .and_where(Expr::col(Jobs::Id).eq(id))
        .to_string(SqliteQueryBuilder)
}

/// SELECT * FROM jobs WHERE id = ?
pub fn select_by_id(id: &str) -> String {
    Query::select()
        .columns(JOB_COLUMNS)
        .from(Jobs::Table)
        .and_where(Expr::col(Jobs::Id).eq(id))
        .to_string(SqliteQueryBuilder)
}

/// SELECT * FROM jobs WHERE upload_id = ? AND type = ?
pub fn select_by_upload_and_type(upload_id: &str, job_type: &str) -> String {
    Query::select()
        .columns(JOB_COLUMNS)
        .from(Jobs::Table)
        .and_where(Expr::col(Jobs::UploadId).eq(upload_id))
        .and_where(Expr::col(Jobs::Type).eq(job_type))
        .to_string(SqliteQueryBuilder)
}
