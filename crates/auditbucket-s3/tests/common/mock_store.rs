//! In-memory bucket store

use async_trait::async_trait;
use auditbucket_core::{
    EncryptionSpec, LifecycleRuleSet, ObservedLifecycle, PublicAccessBlock, TagSet,
    VersioningState,
};
use auditbucket_s3::{BucketStore, StoreError, StoreResult};
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// State of one mock bucket
#[derive(Clone, Debug)]
pub struct MockBucket {
    pub encryption: Option<EncryptionSpec>,
    pub public_access_block: Option<PublicAccessBlock>,
    pub versioning: VersioningState,
    pub tags: TagSet,
    pub lifecycle: ObservedLifecycle,
}

impl Default for MockBucket {
    fn default() -> Self {
        Self {
            encryption: None,
            public_access_block: None,
            versioning: VersioningState::Unversioned,
            tags: TagSet::new(),
            lifecycle: ObservedLifecycle::Absent,
        }
    }
}

/// In-memory [`BucketStore`] that records every call.
///
/// Stored lifecycle rules come back with their transitions reversed, the
/// way a real provider may reorder them.
#[derive(Clone, Default)]
pub struct MockBucketStore {
    buckets: Arc<Mutex<HashMap<String, MockBucket>>>,
    taken: Arc<Mutex<HashSet<String>>>,
    faults: Arc<Mutex<HashMap<String, VecDeque<StoreError>>>>,
    calls: Arc<Mutex<Vec<String>>>,
    latency: Arc<Mutex<Option<Duration>>>,
}

impl MockBucketStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an existing bucket
    pub fn insert(&self, name: &str, bucket: MockBucket) {
        self.buckets
            .lock()
            .unwrap()
            .insert(name.to_string(), bucket);
    }

    /// Current state of a bucket
    pub fn bucket(&self, name: &str) -> Option<MockBucket> {
        self.buckets.lock().unwrap().get(name).cloned()
    }

    /// Mutate an existing bucket out of band
    pub fn tamper(&self, name: &str, f: impl FnOnce(&mut MockBucket)) {
        if let Some(bucket) = self.buckets.lock().unwrap().get_mut(name) {
            f(bucket);
        }
    }

    /// Mark a name as owned by another account
    pub fn mark_taken(&self, name: &str) {
        self.taken.lock().unwrap().insert(name.to_string());
    }

    /// Fail the next call(s) to `operation` with `error`, once per queued error
    pub fn fail_next(&self, operation: &str, error: StoreError) {
        self.faults
            .lock()
            .unwrap()
            .entry(operation.to_string())
            .or_default()
            .push_back(error);
    }

    /// Delay every call by `latency`
    pub fn set_latency(&self, latency: Duration) {
        *self.latency.lock().unwrap() = Some(latency);
    }

    /// Recorded calls, as `operation(bucket)`
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of recorded calls to `operation`
    pub fn call_count(&self, operation: &str) -> usize {
        let prefix = format!("{operation}(");
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.starts_with(&prefix))
            .count()
    }

    /// Recorded calls that mutate state
    pub fn mutations(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|c| c.starts_with("put_") || c.starts_with("create_") || c.starts_with("delete_"))
            .collect()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    async fn enter(&self, operation: &str, bucket: &str) -> StoreResult<()> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("{operation}({bucket})"));

        let latency = *self.latency.lock().unwrap();
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }

        let fault = self
            .faults
            .lock()
            .unwrap()
            .get_mut(operation)
            .and_then(VecDeque::pop_front);
        match fault {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn with_bucket<T>(&self, bucket: &str, f: impl FnOnce(&mut MockBucket) -> T) -> StoreResult<T> {
        self.buckets
            .lock()
            .unwrap()
            .get_mut(bucket)
            .map(f)
            .ok_or_else(|| StoreError::not_found(bucket))
    }
}

fn reordered(rules: &LifecycleRuleSet) -> LifecycleRuleSet {
    let mut stored = rules.clone();
    for rule in &mut stored.rules {
        rule.transitions.reverse();
        rule.noncurrent_version_transitions.reverse();
    }
    stored
}

#[async_trait]
impl BucketStore for MockBucketStore {
    async fn bucket_exists(&self, bucket: &str) -> StoreResult<bool> {
        self.enter("bucket_exists", bucket).await?;
        Ok(self.buckets.lock().unwrap().contains_key(bucket))
    }

    async fn create_bucket(&self, bucket: &str) -> StoreResult<()> {
        self.enter("create_bucket", bucket).await?;
        if self.taken.lock().unwrap().contains(bucket) {
            return Err(StoreError::name_taken(bucket));
        }
        self.buckets
            .lock()
            .unwrap()
            .entry(bucket.to_string())
            .or_default();
        Ok(())
    }

    async fn get_encryption(&self, bucket: &str) -> StoreResult<Option<EncryptionSpec>> {
        self.enter("get_encryption", bucket).await?;
        self.with_bucket(bucket, |b| b.encryption.clone())
    }

    async fn put_encryption(&self, bucket: &str, encryption: &EncryptionSpec) -> StoreResult<()> {
        self.enter("put_encryption", bucket).await?;
        self.with_bucket(bucket, |b| b.encryption = Some(encryption.clone()))
    }

    async fn get_public_access_block(
        &self,
        bucket: &str,
    ) -> StoreResult<Option<PublicAccessBlock>> {
        self.enter("get_public_access_block", bucket).await?;
        self.with_bucket(bucket, |b| b.public_access_block)
    }

    async fn put_public_access_block(
        &self,
        bucket: &str,
        block: &PublicAccessBlock,
    ) -> StoreResult<()> {
        self.enter("put_public_access_block", bucket).await?;
        self.with_bucket(bucket, |b| b.public_access_block = Some(*block))
    }

    async fn get_versioning(&self, bucket: &str) -> StoreResult<VersioningState> {
        self.enter("get_versioning", bucket).await?;
        self.with_bucket(bucket, |b| b.versioning)
    }

    async fn put_versioning(&self, bucket: &str, state: VersioningState) -> StoreResult<()> {
        self.enter("put_versioning", bucket).await?;
        self.with_bucket(bucket, |b| b.versioning = state)
    }

    async fn get_tags(&self, bucket: &str) -> StoreResult<TagSet> {
        self.enter("get_tags", bucket).await?;
        self.with_bucket(bucket, |b| b.tags.clone())
    }

    async fn put_tags(&self, bucket: &str, tags: &TagSet) -> StoreResult<()> {
        self.enter("put_tags", bucket).await?;
        self.with_bucket(bucket, |b| b.tags = tags.clone())
    }

    async fn get_lifecycle(&self, bucket: &str) -> StoreResult<ObservedLifecycle> {
        self.enter("get_lifecycle", bucket).await?;
        self.with_bucket(bucket, |b| b.lifecycle.clone())
    }

    async fn put_lifecycle(&self, bucket: &str, rules: &LifecycleRuleSet) -> StoreResult<()> {
        self.enter("put_lifecycle", bucket).await?;
        self.with_bucket(bucket, |b| {
            b.lifecycle = ObservedLifecycle::Rules(reordered(rules))
        })
    }

    async fn delete_lifecycle(&self, bucket: &str) -> StoreResult<()> {
        self.enter("delete_lifecycle", bucket).await?;
        self.with_bucket(bucket, |b| b.lifecycle = ObservedLifecycle::Absent)
    }
}
