use sea_query::{Expr, Func, Order, Query, SqliteQueryBuilder};

use crate::schema::Segments;

/// INSERT INTO segments (audio_id, start_ms, end_ms, rms, zcr, transcript, created_at_ms)
/// VALUES (?, ?, ?, ?, ?, ?, ?)
pub fn insert(
    audio_id: &str,
    start_ms: i64,
    end_ms: i64,
    rms: f64,
    zcr: f64,
    transcript: Option<&str>,
    now_ms: i64,
) -> String {
    Query::insert()
        .into_table(Segments::Table)
        .columns([
            Segments::AudioId,
            Segments::StartMs,
            Segments::EndMs,
            Segments::Rms,
            Segments::Zcr,
            Segments::Transcript,
            Segments::CreatedAtMs,
        ])
        .values_panic([
            audio_id.into(),
            start_ms.into(),
            end_ms.into(),
            rms.into(),
            zcr.into(),
            transcript.map(|t| t.to_string()).into(),
            now_ms.into(),
        ])
        .to_string(SqliteQueryBuilder)
}

/// SELECT * FROM segments WHERE audio_id = ? ORDER BY start_ms
pub fn select_by_audio_id(audio_id: &str) -> String {
    Query::select()
        .columns([
            Segments::Id,
            Segments::AudioId,
            Segments::StartMs,
            Segments::EndMs,
            Segments::Rms,
            Segments::Zcr,
            Segments::Transcript,
            Segments::CreatedAtMs,
        ])
        .from(Segments::Table)
        .and_where(Expr::col(Segments::AudioId).eq(audio_id))
        .order_by(Segments::StartMs, Order::Asc)
        .to_string(SqliteQueryBuilder)
}

/// SELECT COUNT(id) FROM segments WHERE audio_id = ?
pub fn count_for_audio(audio_id: &str) -> String {
    Query::select()
        .expr(Func::count(Expr::col(Segments::Id)))
        .from(Segments::Table)
        .and_where(Expr::col(Segments::AudioId).eq(audio_id))
        .to_string(SqliteQueryBuilder)
}
