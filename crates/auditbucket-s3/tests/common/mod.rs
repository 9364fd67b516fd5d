//! Common test utilities for auditbucket-s3
//!
//! Provides an in-memory bucket store with call recording and fault
//! injection, plus spec fixtures.

#![allow(dead_code)]

pub mod mock_store;

pub use mock_store::*;

use auditbucket_core::config::{ProviderSettings, RetryPolicy, RetryStrategy};
use auditbucket_core::{compile_bucket, AuditBucketConfig, BucketSpec};

/// Spec for the basic fixture: eg-default-ue2-test-test, 60/180/365
pub fn basic_spec() -> BucketSpec {
    let cfg: AuditBucketConfig = serde_yaml_ng::from_str(
        r#"
label:
  namespace: eg
  tenant: default
  environment: ue2
  stage: test
  name: test
lifecycle:
  standard_transition_days: 60
  glacier_transition_days: 180
  expiration_days: 365
  noncurrent_version_transition_days: 30
  noncurrent_version_expiration_days: 180
"#,
    )
    .expect("fixture parses");
    compile_bucket(&cfg)
        .expect("fixture compiles")
        .expect("fixture is enabled")
}

/// Provider settings with fast, deterministic retries
pub fn fast_settings() -> ProviderSettings {
    ProviderSettings {
        region: "us-east-2".to_string(),
        endpoint: None,
        timeout_secs: 5,
        retry: RetryPolicy {
            max_attempts: 3,
            strategy: RetryStrategy::FixedDelay,
            backoff_multiplier: 1.0,
            initial_delay_ms: 100,
            max_delay_ms: 100,
        },
    }
}
