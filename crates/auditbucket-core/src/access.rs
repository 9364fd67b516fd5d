//! Bucket access policy: encryption, public-access block and versioning
//!
//! The defaults are the locked-down posture every audit bucket gets:
//! AES-256 server-side encryption with no caller-managed key, all four
//! public-access-block flags on, and versioning enabled. Overrides are
//! accepted but nothing in this crate relaxes them on its own.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Server-side encryption algorithm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SseAlgorithm {
    /// Provider-managed AES-256 (SSE-S3)
    #[default]
    Aes256,
    /// KMS-managed key (SSE-KMS)
    AwsKms,
    /// Dual-layer KMS (DSSE-KMS)
    AwsKmsDsse,
}

impl fmt::Display for SseAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SseAlgorithm::Aes256 => write!(f, "AES256"),
            SseAlgorithm::AwsKms => write!(f, "aws:kms"),
            SseAlgorithm::AwsKmsDsse => write!(f, "aws:kms:dsse"),
        }
    }
}

/// Default server-side encryption rule
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EncryptionSpec {
    pub algorithm: SseAlgorithm,

    /// KMS key id; only meaningful for the KMS algorithms
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kms_key_id: Option<String>,
}

/// The four public-access-block flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PublicAccessBlock {
    pub block_public_acls: bool,
    pub ignore_public_acls: bool,
    pub block_public_policy: bool,
    pub restrict_public_buckets: bool,
}

impl Default for PublicAccessBlock {
    fn default() -> Self {
        Self {
            block_public_acls: true,
            ignore_public_acls: true,
            block_public_policy: true,
            restrict_public_buckets: true,
        }
    }
}

impl PublicAccessBlock {
    /// Whether every flag is set
    pub fn is_fully_blocked(&self) -> bool {
        self.block_public_acls
            && self.ignore_public_acls
            && self.block_public_policy
            && self.restrict_public_buckets
    }
}

/// Bucket versioning state as reported by a provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VersioningState {
    /// Never versioned
    Unversioned,
    Enabled,
    /// Previously enabled, now paused
    Suspended,
}

impl fmt::Display for VersioningState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersioningState::Unversioned => write!(f, "unversioned"),
            VersioningState::Enabled => write!(f, "enabled"),
            VersioningState::Suspended => write!(f, "suspended"),
        }
    }
}

/// Encryption, public-access and versioning settings applied to the bucket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BucketAccessPolicy {
    pub encryption: EncryptionSpec,
    pub public_access_block: PublicAccessBlock,
    pub versioning_enabled: bool,
}

impl Default for BucketAccessPolicy {
    fn default() -> Self {
        Self {
            encryption: EncryptionSpec::default(),
            public_access_block: PublicAccessBlock::default(),
            versioning_enabled: true,
        }
    }
}

impl BucketAccessPolicy {
    /// Whether this policy is at least as strict as the default posture
    pub fn is_locked_down(&self) -> bool {
        self.public_access_block.is_fully_blocked() && self.versioning_enabled
    }
}
