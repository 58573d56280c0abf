/// RMS level (raw 16-bit sample scale) above which a window counts as voice
pub const VOICE_RMS_THRESHOLD: f64 = 500.0;

/// Analysis window length in seconds (50ms)
pub const ANALYSIS_WINDOW_SECS: f64 = 0.05;

/// Transcript text stored for every detected segment until real
/// transcription lands
pub const TRANSCRIPT_PLACEHOLDER: &str = "(placeholder)";

/// Default maximum number of processing attempts before a job fails permanently
pub const DEFAULT_MAX_ATTEMPTS: i64 = 3;

/// Default base delay in seconds for exponential retry backoff
pub const DEFAULT_RETRY_BASE_DELAY_SECS: u64 = 5;

/// Default idle poll interval in seconds when no job is queued
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 2;
