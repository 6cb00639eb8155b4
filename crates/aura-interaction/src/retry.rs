//! Bounded timeout-and-retry policy for generative calls.

use std::future::Future;
use std::time::Duration;

use aura_core::config::GeminiConfig;
use aura_core::suggestion::SuggestionError;

/// Every attempt is bounded by `timeout`; retryable failures are retried
/// after a fixed `backoff` until `max_attempts` is reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub timeout: Duration,
    pub max_attempts: u32,
    pub backoff: Duration,
}

impl RetryPolicy {
    pub fn from_config(config: &GeminiConfig) -> Self {
        Self {
            timeout: config.timeout(),
            max_attempts: config.max_attempts,
            backoff: config.backoff(),
        }
    }

    /// Runs `attempt` until it succeeds, fails with a non-retryable error, or
    /// the attempts are used up. `attempt` receives the 1-based attempt number.
    pub async fn run<T, F, Fut>(&self, mut attempt: F) -> Result<T, SuggestionError>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, SuggestionError>>,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut number = 1;
        loop {
            let outcome = match tokio::time::timeout(self.timeout, attempt(number)).await {
                Ok(outcome) => outcome,
                Err(_) => Err(SuggestionError::Timeout(self.timeout)),
            };

            match outcome {
                Ok(value) => return Ok(value),
                Err(err) if err.is_retryable() && number < max_attempts => {
                    tracing::warn!(
                        attempt = number,
                        max_attempts,
                        error = %err,
                        "suggestion attempt failed, retrying"
                    );
                    tokio::time::sleep(self.backoff).await;
                    number += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&GeminiConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn policy() -> RetryPolicy {
        RetryPolicy {
            timeout: Duration::from_secs(20),
            max_attempts: 2,
            backoff: Duration::from_millis(500),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_is_retried_then_reported() {
        let calls = AtomicU32::new(0);

        let result: Result<String, _> = policy()
            .run(|_| {
                calls.fetch_add(1, Ordering::SeqCst);
                async {
                    tokio::time::sleep(Duration::from_secs(60)).await;
                    Ok("late".to_string())
                }
            })
            .await;

        assert_eq!(result, Err(SuggestionError::Timeout(Duration::from_secs(20))));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retryable_failure_then_success() {
        let result = policy()
            .run(|attempt| async move {
                if attempt == 1 {
                    Err(SuggestionError::Request {
                        message: "503".to_string(),
                        retryable: true,
                    })
                } else {
                    Ok(format!("attempt {attempt}"))
                }
            })
            .await;

        assert_eq!(result.unwrap(), "attempt 2");
    }

    #[tokio::test(start_paused = true)]
    async fn test_non_retryable_failure_stops_immediately() {
        let calls = AtomicU32::new(0);

        let result: Result<(), _> = policy()
            .run(|_| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(SuggestionError::Config("missing api key".to_string())) }
            })
            .await;

        assert!(matches!(result, Err(SuggestionError::Config(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_attempts_still_tries_once() {
        let policy = RetryPolicy {
            max_attempts: 0,
            ..policy()
        };
        let result = policy.run(|_| async { Ok::<_, SuggestionError>(7) }).await;
        assert_eq!(result.unwrap(), 7);
    }
}
