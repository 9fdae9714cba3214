//! Retry policy for transient failures.
//!
//! The dispatcher retries 429s, 5xx responses and transport failures. The wait before
//! retry `n` (counting from zero) is `backoff_multiplier × 2^n` seconds.

use crate::Error;
use rand::Rng;
use std::time::Duration;

/// Longest single computed backoff. Keeps `2^n` from overflowing `Duration`.
const MAX_BACKOFF: Duration = Duration::from_secs(60 * 60);

/// How many times to retry, and how long to wait in between.
///
/// # Examples
///
/// ```
/// use camino_ai::RetryPolicy;
/// use std::time::Duration;
///
/// // 0.5s, 1s, 2s
/// let policy = RetryPolicy::new(3, 0.5);
/// assert_eq!(policy.delay_for_attempt(0), Some(Duration::from_millis(500)));
/// assert_eq!(policy.delay_for_attempt(2), Some(Duration::from_secs(2)));
/// assert_eq!(policy.delay_for_attempt(3), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    /// Retries allowed after the first attempt.
    pub max_retries: u32,

    /// Seconds to wait before the first retry. Doubles for every retry after that.
    pub backoff_multiplier: f64,

    /// Scale each delay by a random factor in `[0.5, 1.0]`.
    pub jitter: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, 1.0)
    }
}

impl RetryPolicy {
    /// Creates a policy without jitter.
    pub fn new(max_retries: u32, backoff_multiplier: f64) -> Self {
        Self {
            max_retries,
            backoff_multiplier,
            jitter: false,
        }
    }

    /// Returns the wait before retrying after failed attempt `attempt` (0-indexed),
    /// or `None` when retries are exhausted.
    pub fn delay_for_attempt(&self, attempt: u32) -> Option<Duration> {
        if attempt >= self.max_retries {
            return None;
        }

        let seconds = self.backoff_multiplier * 2f64.powi(attempt.min(64) as i32);
        let delay = Duration::try_from_secs_f64(seconds)
            .unwrap_or(MAX_BACKOFF)
            .min(MAX_BACKOFF);

        if self.jitter {
            let factor = rand::thread_rng().gen_range(0.5..=1.0);
            Some(delay.mul_f64(factor))
        } else {
            Some(delay)
        }
    }

    /// Returns `true` if another attempt should follow failed attempt `attempt`.
    pub fn should_retry(&self, error: &Error, attempt: u32) -> bool {
        attempt < self.max_retries && error.is_retryable()
    }

    /// Upper bound on total backoff sleep across all retries, ignoring server hints.
    pub fn max_total_backoff(&self) -> Duration {
        (0..self.max_retries)
            .filter_map(|attempt| {
                RetryPolicy {
                    jitter: false,
                    ..*self
                }
                .delay_for_attempt(attempt)
            })
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::StatusCode;

    #[test]
    fn test_exponential_delays() {
        let policy = RetryPolicy::new(4, 1.0);

        assert_eq!(policy.delay_for_attempt(0), Some(Duration::from_secs(1)));
        assert_eq!(policy.delay_for_attempt(1), Some(Duration::from_secs(2)));
        assert_eq!(policy.delay_for_attempt(2), Some(Duration::from_secs(4)));
        assert_eq!(policy.delay_for_attempt(3), Some(Duration::from_secs(8)));
        assert_eq!(policy.delay_for_attempt(4), None);
    }

    #[test]
    fn test_no_retries() {
        let policy = RetryPolicy::new(0, 1.0);
        assert_eq!(policy.delay_for_attempt(0), None);
        assert_eq!(policy.max_total_backoff(), Duration::ZERO);
    }

    #[test]
    fn test_jitter_stays_within_half_to_full_delay() {
        let policy = RetryPolicy {
            jitter: true,
            ..RetryPolicy::new(3, 2.0)
        };

        for _ in 0..50 {
            let delay = policy.delay_for_attempt(1).unwrap();
            assert!(delay >= Duration::from_secs(2) && delay <= Duration::from_secs(4));
        }
    }

    #[test]
    fn test_huge_attempt_is_capped() {
        let policy = RetryPolicy::new(u32::MAX, 1.0);
        assert_eq!(policy.delay_for_attempt(1000), Some(MAX_BACKOFF));
    }

    #[test]
    fn test_max_total_backoff() {
        // 0.5 + 1 + 2
        let policy = RetryPolicy::new(3, 0.5);
        assert_eq!(policy.max_total_backoff(), Duration::from_millis(3500));
    }

    #[test]
    fn test_should_retry_respects_budget_and_kind() {
        let policy = RetryPolicy::new(2, 1.0);
        let server_error = Error::Api {
            status: StatusCode::SERVICE_UNAVAILABLE,
            message: "down".to_string(),
            body: None,
        };
        let auth_error = Error::Authentication {
            status: StatusCode::UNAUTHORIZED,
            message: "bad key".to_string(),
        };

        assert!(policy.should_retry(&server_error, 0));
        assert!(policy.should_retry(&server_error, 1));
        assert!(!policy.should_retry(&server_error, 2));
        assert!(!policy.should_retry(&auth_error, 0));
    }
}
