//! Drift detection between desired and observed bucket state

use crate::access::{EncryptionSpec, PublicAccessBlock, VersioningState};
use crate::bucket::BucketSpec;
use crate::label::TagSet;
use crate::lifecycle::{LifecyclePolicy, LifecycleRuleSet};
use serde::Serialize;
use std::fmt;

/// Lifecycle configuration as reported by the provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ObservedLifecycle {
    /// No lifecycle configuration on the bucket
    Absent,
    Rules(LifecycleRuleSet),
    /// Rules exist but cannot be expressed as a rule set (date-based, tag filters, ...)
    Unrecognized(String),
}

/// Bucket state as reported by the provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ObservedBucket {
    pub exists: bool,

    /// Default encryption rule; `None` if unset or not understood
    pub encryption: Option<EncryptionSpec>,

    pub public_access_block: Option<PublicAccessBlock>,

    pub versioning: VersioningState,

    pub tags: TagSet,

    pub lifecycle: ObservedLifecycle,
}

impl ObservedBucket {
    /// State of a bucket that does not exist
    pub fn absent() -> Self {
        Self {
            exists: false,
            encryption: None,
            public_access_block: None,
            versioning: VersioningState::Unversioned,
            tags: TagSet::new(),
            lifecycle: ObservedLifecycle::Absent,
        }
    }
}

/// A single provider mutation needed to converge a bucket
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", content = "value", rename_all = "snake_case")]
pub enum Change {
    CreateBucket,
    PutEncryption(EncryptionSpec),
    PutPublicAccessBlock(PublicAccessBlock),
    PutVersioning(VersioningState),
    PutTags(TagSet),
    PutLifecycle(LifecycleRuleSet),
    DeleteLifecycle,
}

impl Change {
    /// Short action name, used in logs and tables
    pub fn action(&self) -> &'static str {
        match self {
            Change::CreateBucket => "create-bucket",
            Change::PutEncryption(_) => "put-encryption",
            Change::PutPublicAccessBlock(_) => "put-public-access-block",
            Change::PutVersioning(_) => "put-versioning",
            Change::PutTags(_) => "put-tags",
            Change::PutLifecycle(_) => "put-lifecycle",
            Change::DeleteLifecycle => "delete-lifecycle",
        }
    }
}

impl fmt::Display for Change {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Change::CreateBucket => write!(f, "create bucket"),
            Change::PutEncryption(enc) => match &enc.kms_key_id {
                Some(key) => write!(f, "set default encryption to {} ({})", enc.algorithm, key),
                None => write!(f, "set default encryption to {}", enc.algorithm),
            },
            Change::PutPublicAccessBlock(pab) => write!(
                f,
                "set public access block (acls={}, ignore_acls={}, policy={}, restrict={})",
                pab.block_public_acls,
                pab.ignore_public_acls,
                pab.block_public_policy,
                pab.restrict_public_buckets
            ),
            Change::PutVersioning(state) => write!(f, "set versioning to {}", state),
            Change::PutTags(tags) => write!(f, "replace tag set ({} tags)", tags.len()),
            Change::PutLifecycle(set) => {
                write!(f, "replace lifecycle configuration ({} rules)", set.rules.len())
            }
            Change::DeleteLifecycle => write!(f, "remove lifecycle configuration"),
        }
    }
}

/// Compute the ordered changes that converge `observed` onto `desired`.
///
/// An empty result means the bucket has not drifted. Changes come out in
/// apply order: creation first, then access settings, tags and lifecycle.
pub fn diff(desired: &BucketSpec, observed: &ObservedBucket) -> Vec<Change> {
    let mut changes = Vec::new();
    let current = if observed.exists {
        observed.clone()
    } else {
        changes.push(Change::CreateBucket);
        ObservedBucket::absent()
    };

    let encryption = &desired.access.encryption;
    if current.encryption.as_ref() != Some(encryption) {
        changes.push(Change::PutEncryption(encryption.clone()));
    }

    let pab = desired.access.public_access_block;
    if current.public_access_block != Some(pab) {
        changes.push(Change::PutPublicAccessBlock(pab));
    }

    // Versioning can be suspended but never returned to unversioned.
    match (desired.access.versioning_enabled, current.versioning) {
        (true, VersioningState::Enabled) => {}
        (true, _) => changes.push(Change::PutVersioning(VersioningState::Enabled)),
        (false, VersioningState::Enabled) => {
            changes.push(Change::PutVersioning(VersioningState::Suspended))
        }
        (false, _) => {}
    }

    if current.tags != desired.tags {
        changes.push(Change::PutTags(desired.tags.clone()));
    }

    match (&desired.lifecycle, &current.lifecycle) {
        (LifecyclePolicy::Rules(want), ObservedLifecycle::Rules(have)) if want.equivalent(have) => {}
        (LifecyclePolicy::Rules(want), _) => changes.push(Change::PutLifecycle(want.clone())),
        (LifecyclePolicy::Absent, ObservedLifecycle::Absent) => {}
        (LifecyclePolicy::Absent, _) => changes.push(Change::DeleteLifecycle),
    }

    changes
}
