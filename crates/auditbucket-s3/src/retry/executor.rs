//! Retry loop

use super::error::RetryError;
use super::observer::{NoOpObserver, RetryObserver};
use super::strategies::{calculate_delay, RetryPredicate};
use super::RetryPolicy;
use std::fmt::Display;
use std::future::Future;
use std::time::{Duration, Instant};

/// Runs an operation until it succeeds, the predicate rejects an error,
/// or the policy's attempts run out
pub struct RetryExecutor<P, O = NoOpObserver> {
    policy: RetryPolicy,
    predicate: P,
    observer: O,
    jitter: bool,
    attempt_timeout: Option<Duration>,
}

impl<P> RetryExecutor<P, NoOpObserver> {
    pub fn new(policy: RetryPolicy, predicate: P) -> Self {
        Self {
            policy,
            predicate,
            observer: NoOpObserver,
            jitter: true,
            attempt_timeout: None,
        }
    }
}

impl<P, O> RetryExecutor<P, O> {
    pub fn with_observer<O2>(self, observer: O2) -> RetryExecutor<P, O2> {
        RetryExecutor {
            policy: self.policy,
            predicate: self.predicate,
            observer,
            jitter: self.jitter,
            attempt_timeout: self.attempt_timeout,
        }
    }

    /// Enable or disable the up-to-25% delay jitter (enabled by default)
    pub fn with_jitter(mut self, jitter: bool) -> Self {
        self.jitter = jitter;
        self
    }

    /// Bound every attempt; a timed-out attempt counts as retryable
    pub fn with_attempt_timeout(mut self, timeout: Duration) -> Self {
        self.attempt_timeout = Some(timeout);
        self
    }
}

impl<P, O> RetryExecutor<P, O>
where
    O: RetryObserver,
{
    pub async fn execute<F, Fut, T, E>(&self, mut op: F) -> Result<T, RetryError<E>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
        P: RetryPredicate<E>,
    {
        let start = Instant::now();
        let max_attempts = self.policy.max_attempts;
        let mut last_error: Option<E> = None;

        for attempt in 1..=max_attempts {
            self.observer.on_attempt_start(attempt, max_attempts);

            let outcome = match self.attempt_timeout {
                Some(limit) => tokio::time::timeout(limit, op()).await.ok(),
                None => Some(op().await),
            };

            let delay = calculate_delay(&self.policy, attempt, self.jitter);

            match outcome {
                Some(Ok(value)) => {
                    self.observer.on_success(attempt, start.elapsed());
                    return Ok(value);
                }
                Some(Err(err)) => {
                    if !self.predicate.should_retry(&err) {
                        self.observer.on_cancelled(attempt, &err);
                        return Err(RetryError::NonRetryable {
                            attempt,
                            source: err,
                        });
                    }
                    if attempt >= max_attempts {
                        self.observer.on_exhausted(attempt, &err);
                        return Err(RetryError::Exhausted {
                            attempts: attempt,
                            source: err,
                            total_duration: start.elapsed(),
                        });
                    }
                    self.observer.on_attempt_failed(attempt, &err, delay);
                    last_error = Some(err);
                }
                None => {
                    let timeout = self.attempt_timeout.unwrap_or_default();
                    let message = format!("timed out after {:?}", timeout);
                    if attempt >= max_attempts {
                        self.observer.on_exhausted(attempt, &message);
                        return Err(RetryError::AttemptTimeout { attempt, timeout });
                    }
                    self.observer.on_attempt_failed(attempt, &message, delay);
                }
            }

            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
        }

        Err(RetryError::Cancelled {
            attempts: max_attempts,
            last_error,
        })
    }
}
