// src/services/retry.rs

//! Fixed-delay retry around a [`Fetcher`].
//!
//! Each identifier runs a small bounded state machine:
//!
//! ```text
//! Attempting(n) --Found/Absent--> done
//! Attempting(n) --Transient-----> sleep(delay) -> Attempting(n + 1)   if n < max
//! Attempting(max) --Transient---> RetryExhausted (fatal)
//! ```
//!
//! The delay never grows and carries no jitter. Only the attempt count is
//! capped; wall-clock time is not.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use url::Url;

use crate::error::{AppError, Result};
use crate::models::{FetchOutcome, Identifier, Resolution, Resolved, RetryConfig};
use crate::services::Fetcher;

/// Capability to pause the pipeline.
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

#[async_trait]
impl<T: Sleeper + ?Sized> Sleeper for Arc<T> {
    async fn sleep(&self, duration: Duration) {
        (**self).sleep(duration).await
    }
}

/// Real-time sleeper on the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Where one identifier stands between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AttemptState {
    Attempting(u32),
    Exhausted(u32),
}

/// Fetcher wrapper that never hands a transient outcome to its caller.
pub struct RetryPolicy<F, S> {
    fetcher: F,
    sleeper: S,
    max_attempts: u32,
    delay: Duration,
}

impl<F: Fetcher, S: Sleeper> RetryPolicy<F, S> {
    pub fn new(fetcher: F, sleeper: S, config: &RetryConfig) -> Self {
        Self {
            fetcher,
            sleeper,
            max_attempts: config.max_attempts.max(1),
            delay: config.delay(),
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Fetch `url` until it is found or absent.
    ///
    /// Fails with [`AppError::RetryExhausted`] once `max_attempts` transient
    /// outcomes have been seen for this identifier.
    pub async fn resolve(&self, identifier: Identifier, url: &Url) -> Result<Resolution> {
        let mut state = AttemptState::Attempting(1);

        loop {
            let attempt = match state {
                AttemptState::Attempting(attempt) => attempt,
                AttemptState::Exhausted(attempts) => {
                    log::error!(
                        "Giving up on {} after {} attempts",
                        identifier,
                        attempts
                    );
                    return Err(AppError::RetryExhausted {
                        identifier,
                        attempts,
                    });
                }
            };

            let outcome = match self.fetcher.fetch(url).await {
                FetchOutcome::Found(body) => Resolved::Found(body),
                FetchOutcome::Absent => Resolved::Absent,
                FetchOutcome::Transient(reason) => {
                    if attempt >= self.max_attempts {
                        state = AttemptState::Exhausted(attempt);
                        continue;
                    }

                    log::warn!(
                        "Identifier {} attempt {}/{} failed ({}). Sleeping {}s before retry",
                        identifier,
                        attempt,
                        self.max_attempts,
                        reason,
                        self.delay.as_secs()
                    );
                    self.sleeper.sleep(self.delay).await;
                    state = AttemptState::Attempting(attempt + 1);
                    continue;
                }
            };

            return Ok(Resolution {
                outcome,
                attempts: attempt,
            });
        }
    }
}


#[cfg(test)]
mod tests {
    use super::testing::{RecordingSleeper, ScriptedFetcher, transient};
    use super::*;

    fn url(identifier: Identifier) -> Url {
        Url::parse(&format!("http://example.test/user/{identifier}")).unwrap()
    }

    fn policy(
        fetcher: ScriptedFetcher,
    ) -> (
        RetryPolicy<Arc<ScriptedFetcher>, Arc<RecordingSleeper>>,
        Arc<ScriptedFetcher>,
        Arc<RecordingSleeper>,
    ) {
        let fetcher = Arc::new(fetcher);
        let sleeper = Arc::new(RecordingSleeper::default());
        let policy = RetryPolicy::new(
            Arc::clone(&fetcher),
            Arc::clone(&sleeper),
            &RetryConfig::default(),
        );
        (policy, fetcher, sleeper)
    }

    #[tokio::test]
    async fn test_found_first_try() {
        let (policy, fetcher, sleeper) =
            policy(ScriptedFetcher::default().script(1, vec![FetchOutcome::Found("x".into())]));

        let resolution = policy.resolve(1, &url(1)).await.unwrap();
        assert_eq!(resolution.outcome, Resolved::Found("x".into()));
        assert_eq!(resolution.attempts, 1);
        assert_eq!(fetcher.count_for(1), 1);
        assert!(sleeper.calls().is_empty());
    }

    #[tokio::test]
    async fn test_absent_is_terminal_without_delay() {
        let (policy, fetcher, sleeper) = policy(ScriptedFetcher::default());

        let resolution = policy.resolve(5, &url(5)).await.unwrap();
        assert_eq!(resolution.outcome, Resolved::Absent);
        assert_eq!(fetcher.count_for(5), 1);
        assert!(sleeper.calls().is_empty());
    }

    #[tokio::test]
    async fn test_each_transient_followed_by_fixed_delay() {
        let (policy, fetcher, sleeper) = policy(ScriptedFetcher::default().script(
            2,
            vec![
                transient(),
                transient(),
                transient(),
                FetchOutcome::Found("ok".into()),
            ],
        ));

        let resolution = policy.resolve(2, &url(2)).await.unwrap();
        assert_eq!(resolution.attempts, 4);
        assert_eq!(fetcher.count_for(2), 4);
        assert_eq!(sleeper.calls(), vec![Duration::from_secs(10); 3]);
    }

    #[tokio::test]
    async fn test_exhaustion_after_21_attempts() {
        let (policy, fetcher, sleeper) =
            policy(ScriptedFetcher::default().always(9, transient()));

        let err = policy.resolve(9, &url(9)).await.unwrap_err();
        assert!(matches!(
            err,
            AppError::RetryExhausted {
                identifier: 9,
                attempts: 21
            }
        ));
        assert_eq!(fetcher.count_for(9), 21);
        // A delay separates attempts; none follows the last one
        assert_eq!(sleeper.calls().len(), 20);
        assert_eq!(sleeper.total(), Duration::from_secs(200));
    }

    #[tokio::test]
    async fn test_success_on_final_attempt() {
        let mut outcomes = vec![transient(); 20];
        outcomes.push(FetchOutcome::Found("late".into()));
        let (policy, _, sleeper) = policy(ScriptedFetcher::default().script(3, outcomes));

        let resolution = policy.resolve(3, &url(3)).await.unwrap();
        assert_eq!(resolution.outcome, Resolved::Found("late".into()));
        assert_eq!(resolution.attempts, 21);
        assert_eq!(sleeper.calls().len(), 20);
    }

    #[tokio::test]
    async fn test_custom_cap() {
        let fetcher = Arc::new(ScriptedFetcher::default().always(1, transient()));
        let sleeper = Arc::new(RecordingSleeper::default());
        let config = RetryConfig {
            max_attempts: 3,
            delay_secs: 1,
        };
        let policy = RetryPolicy::new(Arc::clone(&fetcher), Arc::clone(&sleeper), &config);

        assert!(policy.resolve(1, &url(1)).await.is_err());
        assert_eq!(fetcher.count_for(1), 3);
        assert_eq!(sleeper.calls(), vec![Duration::from_secs(1); 2]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_tokio_sleeper_waits_full_delay() {
        let start = tokio::time::Instant::now();
        TokioSleeper.sleep(Duration::from_secs(10)).await;
        assert!(start.elapsed() >= Duration::from_secs(10));
    }
}
