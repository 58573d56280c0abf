//! Energy-based voice segmentation over 16-bit PCM audio.
//!
//! Pure functions with no I/O or shared state: identical input bytes always
//! produce identical output, which keeps analysis reproducible across
//! worker runs.

use std::io::Cursor;

use crate::constants::{ANALYSIS_WINDOW_SECS, VOICE_RMS_THRESHOLD};
use crate::DynError;

/// File-level metadata produced by one analysis pass
#[derive(Debug, Clone, PartialEq)]
pub struct AudioMeta {
    pub duration_s: f64,
    pub channels: u16,
    pub sample_rate: u32,
    pub format: String,
    /// Mean RMS across all analysis windows
    pub rms_avg: f64,
    /// Mean zero-crossing rate across all analysis windows
    pub zcr_avg: f64,
}

/// One detected voice region, offsets in milliseconds from file start
#[derive(Debug, Clone, PartialEq)]
pub struct VoiceSegment {
    pub start_ms: i64,
    pub end_ms: i64,
    /// RMS of the window that closed the segment
    pub rms: f64,
    /// Zero-crossing rate of the window that closed the segment
    pub zcr: f64,
}

/// Parse a WAV container and run voice segmentation on its PCM payload.
///
/// Only 16-bit integer PCM is accepted; other sample formats are reported
/// as decode errors so the job retry path can surface them.
pub fn analyze_wav_bytes(bytes: &[u8]) -> Result<(AudioMeta, Vec<VoiceSegment>), DynError> {
    let reader = hound::WavReader::new(Cursor::new(bytes))
        .map_err(|e| format!("failed to parse wav container: {}", e))?;
    let spec = reader.spec();
    if spec.sample_format != hound::SampleFormat::Int || spec.bits_per_sample != 16 {
        return Err(format!(
            "unsupported sample format: {:?} {}-bit, expected 16-bit integer PCM",
            spec.sample_format, spec.bits_per_sample
        )
        .into());
    }
    let samples: Vec<i16> = reader
        .into_samples::<i16>()
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| format!("failed to decode pcm samples: {}", e))?;

    analyze_samples(&samples, spec.sample_rate, spec.channels)
}

/// Segment a flat interleaved sample sequence into voice regions.
///
/// Samples are split into non-overlapping 50ms windows; a hysteresis state
/// machine over window RMS (threshold 500 on the raw 16-bit scale) opens a
/// segment when a window goes loud and closes it when one goes quiet again.
/// A segment left open at the end of input closes at the last sample.
///
/// Empty input is an error: there are no windows to average, so no valid
/// metadata record can be produced for it.
pub fn analyze_samples(
    samples: &[i16],
    sample_rate: u32,
    channels: u16,
) -> Result<(AudioMeta, Vec<VoiceSegment>), DynError> {
    if sample_rate == 0 {
        return Err("sample rate must be non-zero".into());
    }
    if channels == 0 {
        return Err("channel count must be non-zero".into());
    }
    if samples.is_empty() {
        return Err("audio contains no samples".into());
    }

    let window_size = ((sample_rate as f64 * ANALYSIS_WINDOW_SECS) as usize).max(1);
    let frame_count = samples.len() / channels as usize;
    let duration_s = frame_count as f64 / sample_rate as f64;

    let mut segments = Vec::new();
    let mut rms_sum = 0.0;
    let mut zcr_sum = 0.0;
    let mut window_count = 0u64;
    let mut last_rms = 0.0;
    let mut last_zcr = 0.0;

    let mut in_voice = false;
    let mut seg_start = 0usize;

    for (w, window) in samples.chunks(window_size).enumerate() {
        // index of the window's first sample in the flat sequence
        let i = w * window_size;
        let rms = window_rms(window);
        let zcr = window_zcr(window);
        rms_sum += rms;
        zcr_sum += zcr;
        window_count += 1;
        last_rms = rms;
        last_zcr = zcr;

        if rms > VOICE_RMS_THRESHOLD && !in_voice {
            in_voice = true;
            seg_start = i;
        } else if rms <= VOICE_RMS_THRESHOLD && in_voice {
            in_voice = false;
            segments.push(VoiceSegment {
                start_ms: sample_index_to_ms(seg_start, sample_rate),
                end_ms: sample_index_to_ms(i, sample_rate),
                rms,
                zcr,
            });
        }
    }

    // still in voice after the last window: close at the last sample
    if in_voice {
        segments.push(VoiceSegment {
            start_ms: sample_index_to_ms(seg_start, sample_rate),
            end_ms: sample_index_to_ms(samples.len(), sample_rate),
            rms: last_rms,
            zcr: last_zcr,
        });
    }

    let meta = AudioMeta {
        duration_s,
        channels,
        sample_rate,
        format: "wav".to_string(),
        rms_avg: rms_sum / window_count as f64,
        zcr_avg: zcr_sum / window_count as f64,
    };

    Ok((meta, segments))
}

fn window_rms(window: &[i16]) -> f64 {
    let sum_sq: f64 = window
        .iter()
        .map(|&s| {
            let v = s as f64;
            v * v
        })
        .sum();
    (sum_sq / window.len() as f64).sqrt()
}

/// Fraction of adjacent sample pairs whose product is negative.
/// A single-sample window has no pairs and rates 0.0.
fn window_zcr(window: &[i16]) -> f64 {
    if window.len() < 2 {
        return 0.0;
    }
    let crossings = window
        .windows(2)
        .filter(|pair| (pair[0] as i32) * (pair[1] as i32) < 0)
        .count();
    crossings as f64 / (window.len() - 1) as f64
}

fn sample_index_to_ms(index: usize, sample_rate: u32) -> i64 {
    ((index as f64 / sample_rate as f64) * 1000.0).round() as i64
}
