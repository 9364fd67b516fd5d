//! Provider seam used by the reconciler

use crate::error::StoreError;
use async_trait::async_trait;
use auditbucket_core::{
    EncryptionSpec, LifecycleRuleSet, ObservedLifecycle, PublicAccessBlock, TagSet,
    VersioningState,
};

/// Result type for provider calls
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Read and write access to a single storage provider.
///
/// Getters return the "unset" value (`None`, empty tags, `Absent`) when the
/// provider reports the setting as not configured, so a fresh bucket reads
/// the same as one whose settings were never applied.
#[async_trait]
pub trait BucketStore: Send + Sync {
    async fn bucket_exists(&self, bucket: &str) -> StoreResult<bool>;

    /// Create the bucket. Succeeds if the caller already owns it.
    async fn create_bucket(&self, bucket: &str) -> StoreResult<()>;

    async fn get_encryption(&self, bucket: &str) -> StoreResult<Option<EncryptionSpec>>;

    async fn put_encryption(&self, bucket: &str, encryption: &EncryptionSpec) -> StoreResult<()>;

    async fn get_public_access_block(&self, bucket: &str)
        -> StoreResult<Option<PublicAccessBlock>>;

    async fn put_public_access_block(
        &self,
        bucket: &str,
        block: &PublicAccessBlock,
    ) -> StoreResult<()>;

    async fn get_versioning(&self, bucket: &str) -> StoreResult<VersioningState>;

    /// Set versioning; only `Enabled` and `Suspended` can be written
    async fn put_versioning(&self, bucket: &str, state: VersioningState) -> StoreResult<()>;

    async fn get_tags(&self, bucket: &str) -> StoreResult<TagSet>;

    /// Replace the whole tag set
    async fn put_tags(&self, bucket: &str, tags: &TagSet) -> StoreResult<()>;

    async fn get_lifecycle(&self, bucket: &str) -> StoreResult<ObservedLifecycle>;

    /// Replace the whole lifecycle configuration
    async fn put_lifecycle(&self, bucket: &str, rules: &LifecycleRuleSet) -> StoreResult<()>;

    /// Remove any lifecycle configuration; succeeds if there is none
    async fn delete_lifecycle(&self, bucket: &str) -> StoreResult<()>;
}
