use std::time::Duration;

use crate::config::WorkerSettings;

/// What to do with a job that just failed an attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Requeue after the backoff delay
    Retry { delay: Duration },
    /// Attempts exhausted, fail the job and its upload permanently
    GiveUp,
}

/// Decide the next state for a job whose current attempt just failed.
///
/// The backoff is keyed on the attempt count as it stands after the claim
/// that just failed: attempt `a` waits `retry_base_delay * 2^a` seconds.
pub fn decide(attempts: i64, settings: &WorkerSettings) -> RetryDecision {
    if attempts >= settings.max_attempts {
        return RetryDecision::GiveUp;
    }
    let exponent = attempts.clamp(0, 32) as u32;
    let delay_secs = settings
        .retry_base_delay_secs
        .saturating_mul(2u64.saturating_pow(exponent));
    RetryDecision::Retry {
        delay: Duration::from_secs(delay_secs),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(max_attempts: i64, retry_base_delay_secs: u64) -> WorkerSettings {
        WorkerSettings {
            max_attempts,
            retry_base_delay_secs,
            poll_interval_secs: 2,
        }
    }

    #[test]
    fn backoff_doubles_per_attempt() {
        let s = settings(3, 5);
        assert_eq!(
            decide(1, &s),
            RetryDecision::Retry {
                delay: Duration::from_secs(10)
            }
        );
        assert_eq!(
            decide(2, &s),
            RetryDecision::Retry {
                delay: Duration::from_secs(20)
            }
        );
    }

    #[test]
    fn gives_up_at_max_attempts() {
        let s = settings(3, 5);
        assert_eq!(decide(3, &s), RetryDecision::GiveUp);
        assert_eq!(decide(4, &s), RetryDecision::GiveUp);
    }

    #[test]
    fn delay_saturates_instead_of_overflowing() {
        let s = settings(i64::MAX, u64::MAX);
        match decide(62, &s) {
            RetryDecision::Retry { delay } => assert_eq!(delay, Duration::from_secs(u64::MAX)),
            RetryDecision::GiveUp => panic!("expected retry"),
        }
    }
}
