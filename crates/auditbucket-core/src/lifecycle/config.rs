//! Lifecycle inputs

use serde::{Deserialize, Serialize};

/// Day thresholds driving the lifecycle rule.
///
/// Zero in `expiration_days`, `noncurrent_version_transition_days`,
/// `noncurrent_version_expiration_days` or
/// `abort_incomplete_multipart_upload_days` means "omit".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LifecycleConfig {
    /// Whether any lifecycle configuration is applied
    pub enabled: bool,

    /// Days in the standard tier before moving to infrequent-access
    pub standard_transition_days: u32,

    /// Whether objects move on to the cold tier
    pub glacier_transition_enabled: bool,

    /// Days before moving to the cold tier
    pub glacier_transition_days: u32,

    /// Days before current versions expire
    pub expiration_days: u32,

    /// Days before non-current versions move to infrequent-access
    pub noncurrent_version_transition_days: u32,

    /// Days before non-current versions expire
    pub noncurrent_version_expiration_days: u32,

    /// Identifier of the generated rule
    pub rule_id: String,

    /// Object key prefix the rule applies to
    pub prefix: String,

    /// Days before incomplete multipart uploads are aborted
    pub abort_incomplete_multipart_upload_days: u32,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            standard_transition_days: 30,
            glacier_transition_enabled: true,
            glacier_transition_days: 60,
            expiration_days: 90,
            noncurrent_version_transition_days: 30,
            noncurrent_version_expiration_days: 90,
            rule_id: "audit-log-retention".to_string(),
            prefix: String::new(),
            abort_incomplete_multipart_upload_days: 0,
        }
    }
}

impl LifecycleConfig {
    /// Config with lifecycle management turned off
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Default::default()
        }
    }
}
