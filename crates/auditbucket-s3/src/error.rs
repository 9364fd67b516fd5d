//! Error types for the bucket reconciler

use crate::retry::RetryError;
use std::time::Duration;
use thiserror::Error;

/// A failed provider call, classified for retry decisions
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The bucket does not exist
    #[error("Bucket not found: {bucket}")]
    NotFound { bucket: String },

    /// The name is owned by someone else
    #[error("Bucket name '{bucket}' is already taken")]
    NameTaken { bucket: String },

    /// Credentials lack permission for the call
    #[error("Access denied during {operation}: {message}")]
    AccessDenied { operation: String, message: String },

    /// Throttling, 5xx, dispatch or network failure; safe to retry
    #[error("Transient failure during {operation}: {message}")]
    Transient { operation: String, message: String },

    /// Any other provider rejection
    #[error("Provider error during {operation}{}: {message}", code_suffix(.code))]
    Provider {
        operation: String,
        code: Option<String>,
        message: String,
    },

    /// A value could not be converted to or from the provider's shape
    #[error("Cannot encode {what}: {message}")]
    Wire { what: String, message: String },
}

fn code_suffix(code: &Option<String>) -> String {
    code.as_ref().map(|c| format!(" ({c})")).unwrap_or_default()
}

impl StoreError {
    /// Create a not found error
    pub fn not_found(bucket: impl Into<String>) -> Self {
        Self::NotFound {
            bucket: bucket.into(),
        }
    }

    /// Create a name taken error
    pub fn name_taken(bucket: impl Into<String>) -> Self {
        Self::NameTaken {
            bucket: bucket.into(),
        }
    }

    /// Create an access denied error
    pub fn access_denied(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::AccessDenied {
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// Create a transient error
    pub fn transient(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Transient {
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// Create a generic provider error
    pub fn provider(
        operation: impl Into<String>,
        code: Option<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Provider {
            operation: operation.into(),
            code,
            message: message.into(),
        }
    }

    /// Create a wire conversion error
    pub fn wire(what: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Wire {
            what: what.into(),
            message: message.into(),
        }
    }

    /// Whether retrying the same call may succeed
    pub fn is_transient(&self) -> bool {
        matches!(self, StoreError::Transient { .. })
    }
}

/// Failure of a reconciliation pass
#[derive(Error, Debug)]
pub enum ReconcileError {
    /// A provider call failed permanently or ran out of attempts
    #[error("{operation} on bucket {bucket} failed after {attempts} attempt(s): {source}")]
    Store {
        bucket: String,
        operation: &'static str,
        attempts: u32,
        #[source]
        source: StoreError,
    },

    /// Every attempt of a provider call exceeded the per-call timeout
    #[error("{operation} on bucket {bucket} timed out after {timeout:?}")]
    Timeout {
        bucket: String,
        operation: &'static str,
        timeout: Duration,
    },
}

impl ReconcileError {
    /// Map a retry outcome for `operation` into a reconcile error
    pub fn from_retry(
        bucket: &str,
        operation: &'static str,
        err: RetryError<StoreError>,
    ) -> Self {
        let attempts = err.attempts();
        match err {
            RetryError::AttemptTimeout { timeout, .. } => Self::Timeout {
                bucket: bucket.to_string(),
                operation,
                timeout,
            },
            other => Self::Store {
                bucket: bucket.to_string(),
                operation,
                attempts,
                source: other.into_source().unwrap_or_else(|| {
                    StoreError::transient(operation, "retry cancelled before any attempt")
                }),
            },
        }
    }

    /// The underlying provider error, if any
    pub fn store_error(&self) -> Option<&StoreError> {
        match self {
            ReconcileError::Store { source, .. } => Some(source),
            ReconcileError::Timeout { .. } => None,
        }
    }
}
