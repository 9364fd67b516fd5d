//! Configuration file types (auditbucket.yaml)

use crate::access::BucketAccessPolicy;
use crate::label::{NamingConfig, TagSet};
use crate::lifecycle::LifecycleConfig;
use serde::{Deserialize, Serialize};

/// Root of an auditbucket.yaml file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditBucketConfig {
    /// Config format version
    pub version: String,

    /// Component-level switch. When false nothing is created or changed.
    pub enabled: bool,

    /// Naming labels and formatting
    pub label: NamingConfig,

    /// Extra tags merged over the label tags
    pub tags: TagSet,

    /// Lifecycle thresholds
    pub lifecycle: LifecycleConfig,

    /// Encryption, public-access and versioning settings
    pub access: BucketAccessPolicy,

    /// Provider connection settings
    pub provider: ProviderSettings,
}

impl Default for AuditBucketConfig {
    fn default() -> Self {
        Self {
            version: "1".to_string(),
            enabled: true,
            label: NamingConfig::default(),
            tags: TagSet::new(),
            lifecycle: LifecycleConfig::default(),
            access: BucketAccessPolicy::default(),
            provider: ProviderSettings::default(),
        }
    }
}

/// Storage provider connection settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderSettings {
    /// Region the bucket lives in
    pub region: String,

    /// Custom S3-compatible endpoint (MinIO, LocalStack, ...)
    pub endpoint: Option<String>,

    /// Per-call timeout in seconds
    pub timeout_secs: u64,

    /// Retry policy for transient provider errors
    pub retry: RetryPolicy,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            region: "us-east-1".to_string(),
            endpoint: None,
            timeout_secs: 30,
            retry: RetryPolicy::default(),
        }
    }
}

/// Retry policy for provider calls
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Maximum number of attempts, including the first
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Backoff strategy
    #[serde(default)]
    pub strategy: RetryStrategy,

    /// Backoff multiplier for exponential strategies
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,

    /// Initial delay in milliseconds
    #[serde(default = "default_initial_delay")]
    pub initial_delay_ms: u64,

    /// Maximum delay in milliseconds
    #[serde(default = "default_max_delay")]
    pub max_delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            strategy: RetryStrategy::default(),
            backoff_multiplier: default_backoff_multiplier(),
            initial_delay_ms: default_initial_delay(),
            max_delay_ms: default_max_delay(),
        }
    }
}

fn default_max_attempts() -> u32 {
    3
}
fn default_backoff_multiplier() -> f64 {
    2.0
}
fn default_initial_delay() -> u64 {
    1000
}
fn default_max_delay() -> u64 {
    30000
}

/// Backoff strategy between retry attempts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RetryStrategy {
    /// No delay
    None,

    /// Fixed delay between retries
    FixedDelay,

    /// Exponential backoff (default)
    #[default]
    ExponentialBackoff,

    /// Linear backoff
    LinearBackoff,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_uses_defaults() {
        let cfg: AuditBucketConfig = serde_yaml_ng::from_str("{}").unwrap();
        assert_eq!(cfg, AuditBucketConfig::default());
        assert!(cfg.enabled);
        assert_eq!(cfg.provider.region, "us-east-1");
        assert_eq!(cfg.provider.retry.max_attempts, 3);
        assert_eq!(cfg.provider.retry.strategy, RetryStrategy::ExponentialBackoff);
    }

    #[test]
    fn test_retry_strategy_kebab_case() {
        let policy: RetryPolicy =
            serde_yaml_ng::from_str("strategy: linear-backoff\nmax_attempts: 5\n").unwrap();
        assert_eq!(policy.strategy, RetryStrategy::LinearBackoff);
        assert_eq!(policy.max_attempts, 5);
        assert_eq!(policy.initial_delay_ms, 1000);
    }

    #[test]
    fn test_custom_lifecycle_document() {
        let yaml = r#"
label:
  namespace: eg
  tenant: default
  environment: ue2
  stage: test
  name: test
  attributes: [custom]
lifecycle:
  standard_transition_days: 30
  glacier_transition_days: 90
  expiration_days: 180
"#;
        let cfg: AuditBucketConfig = serde_yaml_ng::from_str(yaml).unwrap();
        assert_eq!(cfg.lifecycle.glacier_transition_days, 90);
        assert!(cfg.lifecycle.glacier_transition_enabled);
        assert_eq!(cfg.lifecycle.noncurrent_version_expiration_days, 90);
        assert_eq!(cfg.label.attributes, vec!["custom".to_string()]);
    }
}
