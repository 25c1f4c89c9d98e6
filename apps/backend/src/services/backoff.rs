//! Retry backoff policy for provider calls.

use std::time::Duration;

use rand::Rng;

/// Exponential backoff policy, parameterized per failure class.
///
/// The delay before retry `n` (zero-based) is `base_delay * multiplier^n`,
/// plus [`rate_limit_penalty`](Self::rate_limit_penalty) for rate-limited
/// failures and a uniform random jitter up to [`jitter`](Self::jitter) when
/// configured.
#[derive(Debug, Clone)]
pub struct BackoffPolicy {
    /// Retries allowed after the initial attempt.
    pub max_retries: usize,
    pub base_delay: Duration,
    pub multiplier: f64,
    /// Extra flat wait applied to rate-limited failures.
    pub rate_limit_penalty: Duration,
    /// Upper bound for uniform random jitter; zero disables jitter.
    pub jitter: Duration,
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_secs(2),
            multiplier: 2.0,
            rate_limit_penalty: Duration::from_secs(5),
            jitter: Duration::ZERO,
        }
    }
}

impl BackoffPolicy {
    /// Delay before retry `attempt` (zero-based) for transient upstream
    /// failures.
    pub fn delay_for(&self, attempt: usize) -> Duration {
        let scaled = self.base_delay.as_secs_f64() * self.multiplier.powi(attempt as i32);
        Duration::from_secs_f64(scaled) + self.sample_jitter()
    }

    /// Delay before retry `attempt` for rate-limited failures.
    pub fn delay_for_rate_limit(&self, attempt: usize) -> Duration {
        self.delay_for(attempt) + self.rate_limit_penalty
    }

    fn sample_jitter(&self) -> Duration {
        if self.jitter.is_zero() {
            return Duration::ZERO;
        }
        let max = self.jitter.as_millis() as u64;
        Duration::from_millis(rand::thread_rng().gen_range(0..=max))
    }
}
