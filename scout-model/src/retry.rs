use scout_core::{Result, ScoutError};
use std::{future::Future, time::Duration};

/// Bounded retry schedule with exponential backoff and an optional
/// per-attempt timeout.
#[derive(Clone, Debug)]
pub struct RetryConfig {
    pub enabled: bool,
    /// Total attempts, including the first one.
    pub max_attempts: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
    pub backoff_multiplier: f32,
    pub attempt_timeout: Option<Duration>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_attempts: 3,
            initial_delay: Duration::from_secs(2),
            max_delay: Duration::from_secs(8),
            backoff_multiplier: 2.0,
            attempt_timeout: Some(Duration::from_secs(60)),
        }
    }
}

impl RetryConfig {
    #[must_use]
    pub fn disabled() -> Self {
        Self { enabled: false, ..Self::default() }
    }

    #[must_use]
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    #[must_use]
    pub fn with_initial_delay(mut self, initial_delay: Duration) -> Self {
        self.initial_delay = initial_delay;
        self
    }

    #[must_use]
    pub fn with_max_delay(mut self, max_delay: Duration) -> Self {
        self.max_delay = max_delay;
        self
    }

    #[must_use]
    pub fn with_backoff_multiplier(mut self, backoff_multiplier: f32) -> Self {
        self.backoff_multiplier = backoff_multiplier;
        self
    }

    #[must_use]
    pub fn with_attempt_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.attempt_timeout = timeout;
        self
    }

    /// Delay before retry number `retry` (1-based).
    pub fn delay_for(&self, retry: u32) -> Duration {
        let mut delay = self.initial_delay;
        for _ in 1..retry {
            delay = next_retry_delay(delay, self);
        }
        delay.min(self.max_delay)
    }
}

#[must_use]
pub fn is_retryable_error_message(message: &str) -> bool {
    let normalized = message.to_ascii_uppercase();
    ["429", "408", "500", "502", "503", "504", "RATE LIMIT", "TOO MANY REQUESTS", "TIMED OUT"]
        .iter()
        .any(|marker| normalized.contains(marker))
}

/// Transport trouble, retryable statuses, and model errors that look transient.
#[must_use]
pub fn is_retryable_model_error(error: &ScoutError) -> bool {
    match error {
        ScoutError::Model(message) => is_retryable_error_message(message),
        other => other.is_transient(),
    }
}

/// Retry on every error.
#[must_use]
pub fn always_retry(_error: &ScoutError) -> bool {
    true
}

fn next_retry_delay(current: Duration, retry_config: &RetryConfig) -> Duration {
    if current >= retry_config.max_delay {
        return retry_config.max_delay;
    }

    let multiplier = retry_config.backoff_multiplier.max(1.0) as f64;
    let scaled = Duration::from_secs_f64(current.as_secs_f64() * multiplier);
    scaled.min(retry_config.max_delay)
}

/// Run `operation` until it succeeds, a non-retryable error occurs, or the
/// attempts run out. The last error is returned on exhaustion.
pub async fn execute_with_retry<T, Op, Fut, Classify>(
    retry_config: &RetryConfig,
    classify_error: Classify,
    mut operation: Op,
) -> Result<T>
where
    Op: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
    Classify: Fn(&ScoutError) -> bool,
{
    let max_attempts = if retry_config.enabled { retry_config.max_attempts.max(1) } else { 1 };
    let mut attempt: u32 = 0;
    let mut delay = retry_config.initial_delay;

    loop {
        attempt += 1;
        let outcome = match retry_config.attempt_timeout {
            Some(limit) => match tokio::time::timeout(limit, operation()).await {
                Ok(outcome) => outcome,
                Err(_) => Err(ScoutError::Transport {
                    message: format!("request timed out after {} seconds", limit.as_secs()),
                    timeout: true,
                }),
            },
            None => operation().await,
        };

        match outcome {
            Ok(value) => return Ok(value),
            Err(error) if attempt < max_attempts && classify_error(&error) => {
                scout_telemetry::warn!(
                    attempt = attempt,
                    max_attempts = max_attempts,
                    delay_ms = delay.as_millis(),
                    error = %error,
                    "Request failed with retryable error; retrying"
                );
                tokio::time::sleep(delay).await;
                delay = next_retry_delay(delay, retry_config);
            }
            Err(error) => return Err(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{
        Arc,
        atomic::{AtomicU32, Ordering},
    };

    #[tokio::test]
    async fn execute_with_retry_retries_when_classified_retryable() {
        let retry_config = RetryConfig::default()
            .with_initial_delay(Duration::ZERO)
            .with_max_delay(Duration::ZERO);
        let attempts = Arc::new(AtomicU32::new(0));

        let result = execute_with_retry(&retry_config, is_retryable_model_error, || {
            let attempts = Arc::clone(&attempts);
            async move {
                let attempt = attempts.fetch_add(1, Ordering::SeqCst);
                if attempt < 2 {
                    return Err(ScoutError::Model("HTTP 429 rate limit".to_string()));
                }
                Ok("ok")
            }
        })
        .await
        .expect("operation should succeed after retries");

        assert_eq!(result, "ok");
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn execute_with_retry_stops_on_non_retryable_error() {
        let retry_config = RetryConfig::default()
            .with_initial_delay(Duration::ZERO)
            .with_max_delay(Duration::ZERO);
        let attempts = Arc::new(AtomicU32::new(0));

        let error = execute_with_retry(&retry_config, is_retryable_model_error, || {
            let attempts = Arc::clone(&attempts);
            async move {
                attempts.fetch_add(1, Ordering::SeqCst);
                Err::<(), _>(ScoutError::Model("HTTP 400 bad request".to_string()))
            }
        })
        .await
        .expect_err("operation should fail without retries");

        assert!(matches!(error, ScoutError::Model(_)));
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn execute_with_retry_respects_disabled_config() {
        let retry_config = RetryConfig::disabled().with_max_attempts(10);
        let attempts = Arc::new(AtomicU32::new(0));

        let _ = execute_with_retry(&retry_config, always_retry, || {
            let attempts = Arc::clone(&attempts);
            async move {
                attempts.fetch_add(1, Ordering::SeqCst);
                Err::<(), _>(ScoutError::Model("HTTP 429 too many requests".to_string()))
            }
        })
        .await;

        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn slow_attempt_is_cut_off_and_retried() {
        let retry_config = RetryConfig::default()
            .with_max_attempts(2)
            .with_attempt_timeout(Some(Duration::from_secs(60)));
        let attempts = Arc::new(AtomicU32::new(0));
        let started = tokio::time::Instant::now();

        let result = execute_with_retry(&retry_config, is_retryable_model_error, || {
            let attempts = Arc::clone(&attempts);
            async move {
                if attempts.fetch_add(1, Ordering::SeqCst) == 0 {
                    tokio::time::sleep(Duration::from_secs(600)).await;
                }
                Ok(7)
            }
        })
        .await
        .unwrap();

        assert_eq!(result, 7);
        assert_eq!(started.elapsed(), Duration::from_secs(62));
    }

    #[test]
    fn default_schedule_is_two_then_four_seconds() {
        let config = RetryConfig::default();
        assert_eq!(config.delay_for(1), Duration::from_secs(2));
        assert_eq!(config.delay_for(2), Duration::from_secs(4));
        assert_eq!(config.delay_for(3), Duration::from_secs(8));
    }
}
