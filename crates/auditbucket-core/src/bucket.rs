//! Desired bucket state compiled from a configuration file

use crate::access::BucketAccessPolicy;
use crate::config::AuditBucketConfig;
use crate::error::ConfigurationError;
use crate::label::{build_identity, TagSet};
use crate::lifecycle::{compile_lifecycle, LifecyclePolicy};
use serde::Serialize;
use tracing::debug;

/// Everything the reconciler needs to converge one bucket
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BucketSpec {
    /// Rendered bucket name
    pub name: String,

    /// Full tag set, including `Name`
    pub tags: TagSet,

    /// Encryption, public-access block and versioning
    pub access: BucketAccessPolicy,

    /// Lifecycle rules, or `Absent` to remove any existing configuration
    pub lifecycle: LifecyclePolicy,
}

/// Compile a configuration into the desired bucket state.
///
/// Returns `Ok(None)` when the component is disabled; in that case nothing
/// is validated beyond parsing and nothing should be created.
pub fn compile_bucket(cfg: &AuditBucketConfig) -> Result<Option<BucketSpec>, ConfigurationError> {
    if !cfg.enabled {
        debug!("Component disabled, no bucket compiled");
        return Ok(None);
    }

    let identity = build_identity(&cfg.label, &cfg.tags)?;
    let lifecycle = compile_lifecycle(&cfg.lifecycle)?;

    debug!(
        "Compiled bucket {} ({} tags, lifecycle {})",
        identity.name,
        identity.tags.len(),
        if lifecycle.is_absent() { "absent" } else { "present" }
    );

    Ok(Some(BucketSpec {
        name: identity.name,
        tags: identity.tags,
        access: cfg.access.clone(),
        lifecycle,
    }))
}
