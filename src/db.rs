use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::time::Duration;

use crate::queries::ddl;
use crate::DynError;

/// Open a file-based database connection pool for production use
/// Enables WAL mode and foreign keys
pub async fn open_database_connection(db_path: impl AsRef<Path>) -> Result<SqlitePool, DynError> {
    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .foreign_keys(true)
        .busy_timeout(Duration::from_secs(5));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    Ok(pool)
}

/// Open a read-only database connection pool (for the inspection commands)
/// Foreign keys are not enabled as no modifications are allowed
pub async fn open_readonly_connection(db_path: impl AsRef<Path>) -> Result<SqlitePool, DynError> {
    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .read_only(true)
        .busy_timeout(Duration::from_secs(5));

    let pool = SqlitePoolOptions::new()
        .max_connections(2)
        .connect_with(options)
        .await?;

    Ok(pool)
}

/// Initialize database schema
/// Creates the uploads, jobs, audio_files and segments tables plus indexes
pub async fn init_database_schema(pool: &SqlitePool) -> Result<(), DynError> {
    sqlx::query(&ddl::create_uploads_table()).execute(pool).await?;
    sqlx::query(&ddl::create_jobs_table()).execute(pool).await?;
    sqlx::query(&ddl::create_audio_files_table())
        .execute(pool)
        .await?;
    sqlx::query(&ddl::create_segments_table()).execute(pool).await?;

    sqlx::query(&ddl::create_jobs_upload_type_unique_index())
        .execute(pool)
        .await?;
    sqlx::query(&ddl::create_jobs_claim_index())
        .execute(pool)
        .await?;
    sqlx::query(&ddl::create_audio_files_upload_id_index())
        .execute(pool)
        .await?;
    sqlx::query(&ddl::create_segments_audio_id_index())
        .execute(pool)
        .await?;

    Ok(())
}
