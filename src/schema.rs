use sea_query::Iden;

/// Uploads table - one row per received audio upload
#[derive(Iden)]
pub enum Uploads {
    Table,
    Id,
    Filename,
    ContentType,
    SizeBytes,
    ChecksumSha256,
    Status,
    UploadedBytes,
    ErrorMessage,
    CreatedAtMs,
    UpdatedAtMs,
}

/// Jobs table - background work queue, unique per (upload_id, type)
#[derive(Iden)]
pub enum Jobs {
    Table,
    Id,
    UploadId,
    Type,
    Status,
    Attempts,
    Payload,
    LastError,
    CreatedAtMs,
    UpdatedAtMs,
}

/// Audio files table - analysis results, one per successfully analyzed upload
#[derive(Iden)]
pub enum AudioFiles {
    Table,
    Id,
    UploadId,
    FilePath,
    DurationS,
    Channels,
    SampleRate,
    Format,
    RmsAvg,
    ZcrAvg,
    CreatedAtMs,
}

/// Segments table - detected voice regions within an audio file
#[derive(Iden)]
pub enum Segments {
    Table,
    Id,
    AudioId,
    StartMs,
    EndMs,
    Rms,
    Zcr,
    Transcript,
    CreatedAtMs,
}
