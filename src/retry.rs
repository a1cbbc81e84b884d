use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use tracing::{error, warn};

/// Exponential backoff over a whole unit of work.
///
/// Every error counts against the budget; there is no distinction between
/// transport trouble and a bad payload.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one.
    pub max_attempts: u32,
    pub multiplier: Duration,
    pub min_wait: Duration,
    pub max_wait: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            multiplier: Duration::from_secs(2),
            min_wait: Duration::from_secs(4),
            max_wait: Duration::from_secs(30),
        }
    }
}

impl RetryPolicy {
    /// Wait before the attempt that follows failed attempt number `attempt` (1-based):
    /// `clamp(multiplier * 2^(attempt-1), min_wait, max_wait)`.
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.multiplier
            .saturating_mul(factor)
            .clamp(self.min_wait, self.max_wait)
    }

    /// Runs `operation` until it succeeds or the attempts run out.
    /// The error from the last attempt is returned unchanged.
    pub async fn run<T, E, F, Fut>(&self, mut operation: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            match operation().await {
                Ok(value) => return Ok(value),
                Err(e) if attempt < max_attempts => {
                    let delay = self.delay_after(attempt);
                    warn!(
                        "Attempt {}/{} failed, retrying in {:?}: {}",
                        attempt, max_attempts, delay, e
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => {
                    error!("Giving up after {} attempts: {}", attempt, e);
                    return Err(e);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use tokio::time::Instant;

    #[test]
    fn default_schedule_is_clamped_exponential() {
        let policy = RetryPolicy::default();
        let waits: Vec<u64> = (1..=6).map(|a| policy.delay_after(a).as_secs()).collect();
        assert_eq!(waits, vec![4, 4, 8, 16, 30, 30]);
    }

    #[test]
    fn huge_attempt_numbers_saturate_to_max() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_after(200), Duration::from_secs(30));
    }

    #[tokio::test(start_paused = true)]
    async fn succeeds_on_third_attempt_after_two_waits() {
        let policy = RetryPolicy::default();
        let calls = RefCell::new(Vec::new());

        let result: Result<&str, String> = policy
            .run(|| {
                calls.borrow_mut().push(Instant::now());
                let n = calls.borrow().len();
                async move {
                    if n < 3 { Err(format!("failure {n}")) } else { Ok("lab") }
                }
            })
            .await;

        assert_eq!(result, Ok("lab"));
        let calls = calls.into_inner();
        assert_eq!(calls.len(), 3);

        let waits: Vec<Duration> = calls.windows(2).map(|w| w[1] - w[0]).collect();
        assert_eq!(waits.len(), 2);
        for wait in &waits {
            assert!(*wait >= Duration::from_secs(4) && *wait <= Duration::from_secs(30), "{wait:?}");
        }
        assert!(waits[0] <= waits[1]);
    }

    #[tokio::test(start_paused = true)]
    async fn exhaustion_returns_last_error() {
        let policy = RetryPolicy::default();
        let mut attempts = 0;

        let result: Result<(), String> = policy
            .run(|| {
                attempts += 1;
                let n = attempts;
                async move { Err(format!("failure {n}")) }
            })
            .await;

        assert_eq!(attempts, 3);
        assert_eq!(result, Err("failure 3".to_string()));
    }

    #[tokio::test(start_paused = true)]
    async fn first_success_does_not_wait() {
        let policy = RetryPolicy::default();
        let start = Instant::now();
        let result: Result<u8, String> = policy.run(|| async { Ok(7) }).await;
        assert_eq!(result, Ok(7));
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn zero_attempts_still_tries_once() {
        let policy = RetryPolicy { max_attempts: 0, ..RetryPolicy::default() };
        let mut attempts = 0;
        let result: Result<(), &str> = policy
            .run(|| {
                attempts += 1;
                async { Err("nope") }
            })
            .await;
        assert_eq!(attempts, 1);
        assert_eq!(result, Err("nope"));
    }
}
