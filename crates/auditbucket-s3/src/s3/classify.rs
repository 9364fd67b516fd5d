//! Mapping of S3 SDK failures onto [`StoreError`]

use crate::error::StoreError;
use aws_sdk_s3::config::http::HttpResponse;
use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};

/// Codes meaning "this setting (or bucket) is not configured"
const NOT_FOUND_CODES: &[&str] = &[
    "NoSuchBucket",
    "NotFound",
    "NoSuchLifecycleConfiguration",
    "ServerSideEncryptionConfigurationNotFoundError",
    "NoSuchPublicAccessBlockConfiguration",
    "NoSuchTagSet",
];

/// Codes worth retrying
const TRANSIENT_CODES: &[&str] = &[
    "SlowDown",
    "RequestTimeout",
    "RequestTimeTooSkewed",
    "InternalError",
    "ServiceUnavailable",
    "Throttling",
    "ThrottlingException",
    "TooManyRequestsException",
    "OperationAborted",
];

const ACCESS_DENIED_CODES: &[&str] = &[
    "AccessDenied",
    "AllAccessDisabled",
    "InvalidAccessKeyId",
    "SignatureDoesNotMatch",
    "ExpiredToken",
];

/// Classify an SDK error from `operation` on `bucket`
pub(crate) fn classify<E>(bucket: &str, operation: &str, err: &SdkError<E, HttpResponse>) -> StoreError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
{
    let message = DisplayErrorContext(err).to_string();

    match err {
        SdkError::TimeoutError(_) | SdkError::DispatchFailure(_) | SdkError::ResponseError(_) => {
            StoreError::transient(operation, message)
        }
        SdkError::ServiceError(_) => {
            let status = err.raw_response().map(|r| r.status().as_u16());
            classify_code(bucket, operation, err.code(), status, message)
        }
        _ => StoreError::provider(operation, None, message),
    }
}

/// Classify a provider error code and HTTP status
pub(crate) fn classify_code(
    bucket: &str,
    operation: &str,
    code: Option<&str>,
    status: Option<u16>,
    message: String,
) -> StoreError {
    match (code, status) {
        (Some("BucketAlreadyExists"), _) => StoreError::name_taken(bucket),
        (Some(c), _) if NOT_FOUND_CODES.contains(&c) => StoreError::not_found(bucket),
        (Some(c), _) if TRANSIENT_CODES.contains(&c) => StoreError::transient(operation, message),
        (Some(c), _) if ACCESS_DENIED_CODES.contains(&c) => {
            StoreError::access_denied(operation, message)
        }
        (_, Some(404)) => StoreError::not_found(bucket),
        (_, Some(403)) => StoreError::access_denied(operation, message),
        (_, Some(429)) => StoreError::transient(operation, message),
        (_, Some(s)) if s >= 500 => StoreError::transient(operation, message),
        (code, _) => StoreError::provider(operation, code.map(str::to_string), message),
    }
}
