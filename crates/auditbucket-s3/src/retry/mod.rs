//! Retry execution for provider calls
//!
//! Provider calls are retried according to a [`RetryPolicy`] from the config
//! file. A [`RetryPredicate`] decides which errors are worth another attempt,
//! each attempt can be bounded by a timeout, and a [`RetryObserver`] receives
//! progress callbacks (the [`TracingObserver`] logs them).

mod error;
mod executor;
mod observer;
mod strategies;

pub use auditbucket_core::config::{RetryPolicy, RetryStrategy};
pub use error::RetryError;
pub use executor::RetryExecutor;
pub use observer::{NoOpObserver, RetryObserver, TracingObserver};
pub use strategies::{calculate_delay, RetryPredicate, TransientOnly};
