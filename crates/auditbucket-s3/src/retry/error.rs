//! Error returned when a retried operation does not succeed

use std::fmt;
use std::time::Duration;

/// Outcome of a retried operation that did not succeed
#[derive(Debug)]
pub enum RetryError<E> {
    /// Every attempt failed with a retryable error
    Exhausted {
        attempts: u32,
        source: E,
        total_duration: Duration,
    },

    /// No attempt completed (a zero-attempt policy)
    Cancelled { attempts: u32, last_error: Option<E> },

    /// The final attempt exceeded the per-attempt timeout
    AttemptTimeout { attempt: u32, timeout: Duration },

    /// The predicate rejected the error; no further attempts were made
    NonRetryable { attempt: u32, source: E },
}

impl<E> RetryError<E> {
    /// Number of attempts made before giving up
    pub fn attempts(&self) -> u32 {
        match self {
            RetryError::Exhausted { attempts, .. } | RetryError::Cancelled { attempts, .. } => {
                *attempts
            }
            RetryError::AttemptTimeout { attempt, .. }
            | RetryError::NonRetryable { attempt, .. } => *attempt,
        }
    }

    /// The last underlying error, if one was observed
    pub fn into_source(self) -> Option<E> {
        match self {
            RetryError::Exhausted { source, .. } | RetryError::NonRetryable { source, .. } => {
                Some(source)
            }
            RetryError::Cancelled { last_error, .. } => last_error,
            RetryError::AttemptTimeout { .. } => None,
        }
    }
}

impl<E: fmt::Display> fmt::Display for RetryError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RetryError::Exhausted {
                attempts,
                source,
                total_duration,
            } => write!(
                f,
                "retry exhausted after {} attempts over {:.2}s: {}",
                attempts,
                total_duration.as_secs_f64(),
                source
            ),
            RetryError::Cancelled {
                attempts,
                last_error: Some(err),
            } => write!(f, "retry cancelled after {} attempts: {}", attempts, err),
            RetryError::Cancelled { attempts, .. } => {
                write!(f, "retry cancelled after {} attempts", attempts)
            }
            RetryError::AttemptTimeout { attempt, timeout } => write!(
                f,
                "attempt {} timed out after {:.2}s",
                attempt,
                timeout.as_secs_f64()
            ),
            RetryError::NonRetryable { source, .. } => write!(f, "non-retryable error: {}", source),
        }
    }
}

impl<E: std::error::Error + 'static> std::error::Error for RetryError<E> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RetryError::Exhausted { source, .. } | RetryError::NonRetryable { source, .. } => {
                Some(source)
            }
            RetryError::Cancelled {
                last_error: Some(err),
                ..
            } => Some(err),
            _ => None,
        }
    }
}
