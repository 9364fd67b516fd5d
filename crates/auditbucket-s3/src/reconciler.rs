//! Observe, diff and apply for one bucket at a time

use crate::error::ReconcileError;
use crate::retry::{RetryExecutor, RetryPolicy, TracingObserver, TransientOnly};
use crate::store::{BucketStore, StoreResult};
use auditbucket_core::config::ProviderSettings;
use auditbucket_core::{diff, BucketSpec, Change, ObservedBucket};
use serde::Serialize;
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::OwnedMutexGuard;
use tracing::{debug, info};

/// What a reconciliation pass changed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReconcileReport {
    pub bucket: String,
    pub changes: Vec<Change>,
}

impl ReconcileReport {
    /// True when the bucket was already converged
    pub fn is_noop(&self) -> bool {
        self.changes.is_empty()
    }
}

/// Converges buckets onto their compiled [`BucketSpec`].
///
/// Every provider call runs under the retry policy with a per-attempt
/// timeout. Passes for the same bucket name are serialised; passes for
/// different names run independently.
pub struct Reconciler<S> {
    store: S,
    policy: RetryPolicy,
    attempt_timeout: Duration,
    jitter: bool,
    locks: BucketLocks,
}

impl<S: BucketStore> Reconciler<S> {
    pub fn new(store: S, settings: &ProviderSettings) -> Self {
        Self {
            store,
            policy: settings.retry.clone(),
            attempt_timeout: Duration::from_secs(settings.timeout_secs.max(1)),
            jitter: true,
            locks: BucketLocks::default(),
        }
    }

    /// Disable retry delay jitter
    pub fn without_jitter(mut self) -> Self {
        self.jitter = false;
        self
    }

    /// Compute the changes a `reconcile` would make, without mutating anything
    pub async fn plan(&self, spec: &BucketSpec) -> Result<Vec<Change>, ReconcileError> {
        let _guard = self.locks.acquire(&spec.name).await;
        let observed = self.observe(&spec.name).await?;
        Ok(diff(spec, &observed))
    }

    /// Observe the bucket, then apply every change needed to converge it.
    ///
    /// Running again with the same spec yields an empty report. Dropping the
    /// returned future abandons the pass between provider calls.
    pub async fn reconcile(&self, spec: &BucketSpec) -> Result<ReconcileReport, ReconcileError> {
        let _guard = self.locks.acquire(&spec.name).await;
        let observed = self.observe(&spec.name).await?;
        let changes = diff(spec, &observed);

        if changes.is_empty() {
            info!("Bucket {} is up to date", spec.name);
        }

        for change in &changes {
            info!("{}: {}", spec.name, change);
            self.apply(&spec.name, change).await?;
        }

        Ok(ReconcileReport {
            bucket: spec.name.clone(),
            changes,
        })
    }

    /// Read the bucket's current state from the provider
    pub async fn observe(&self, bucket: &str) -> Result<ObservedBucket, ReconcileError> {
        let store = &self.store;

        let exists = self
            .call(bucket, "head-bucket", move || store.bucket_exists(bucket))
            .await?;
        if !exists {
            debug!("Bucket {} does not exist", bucket);
            return Ok(ObservedBucket::absent());
        }

        let (encryption, public_access_block, versioning, tags, lifecycle) = tokio::try_join!(
            self.call(bucket, "get-encryption", move || store.get_encryption(bucket)),
            self.call(bucket, "get-public-access-block", move || {
                store.get_public_access_block(bucket)
            }),
            self.call(bucket, "get-versioning", move || store.get_versioning(bucket)),
            self.call(bucket, "get-tags", move || store.get_tags(bucket)),
            self.call(bucket, "get-lifecycle", move || store.get_lifecycle(bucket)),
        )?;

        Ok(ObservedBucket {
            exists,
            encryption,
            public_access_block,
            versioning,
            tags,
            lifecycle,
        })
    }

    async fn apply(&self, bucket: &str, change: &Change) -> Result<(), ReconcileError> {
        let store = &self.store;
        let operation = change.action();

        match change {
            Change::CreateBucket => {
                self.call(bucket, operation, move || store.create_bucket(bucket))
                    .await
            }
            Change::PutEncryption(encryption) => {
                self.call(bucket, operation, move || {
                    store.put_encryption(bucket, encryption)
                })
                .await
            }
            Change::PutPublicAccessBlock(block) => {
                self.call(bucket, operation, move || {
                    store.put_public_access_block(bucket, block)
                })
                .await
            }
            Change::PutVersioning(state) => {
                let state = *state;
                self.call(bucket, operation, move || store.put_versioning(bucket, state))
                    .await
            }
            Change::PutTags(tags) => {
                self.call(bucket, operation, move || store.put_tags(bucket, tags))
                    .await
            }
            Change::PutLifecycle(rules) => {
                self.call(bucket, operation, move || store.put_lifecycle(bucket, rules))
                    .await
            }
            Change::DeleteLifecycle => {
                self.call(bucket, operation, move || store.delete_lifecycle(bucket))
                    .await
            }
        }
    }

    async fn call<T, F, Fut>(
        &self,
        bucket: &str,
        operation: &'static str,
        op: F,
    ) -> Result<T, ReconcileError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = StoreResult<T>>,
    {
        RetryExecutor::new(self.policy.clone(), TransientOnly)
            .with_observer(TracingObserver::new(operation, bucket))
            .with_jitter(self.jitter)
            .with_attempt_timeout(self.attempt_timeout)
            .execute(op)
            .await
            .map_err(|e| ReconcileError::from_retry(bucket, operation, e))
    }
}

/// Single-flight locks keyed by bucket name.
///
/// An entry lives only while some pass holds or waits for it.
#[derive(Default)]
struct BucketLocks {
    map: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl BucketLocks {
    fn map(&self) -> MutexGuard<'_, HashMap<String, Arc<tokio::sync::Mutex<()>>>> {
        self.map.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn acquire(&self, bucket: &str) -> BucketLease<'_> {
        let entry = Arc::clone(self.map().entry(bucket.to_string()).or_default());
        let guard = entry.lock_owned().await;
        BucketLease {
            locks: self,
            bucket: bucket.to_string(),
            guard: Some(guard),
        }
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.map().len()
    }
}

/// Held for the duration of one pass over a bucket
struct BucketLease<'a> {
    locks: &'a BucketLocks,
    bucket: String,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for BucketLease<'_> {
    fn drop(&mut self) {
        drop(self.guard.take());
        let mut map = self.locks.map();
        // Only the map's own reference left: nobody holds or waits on it
        if map
            .get(&self.bucket)
            .is_some_and(|entry| Arc::strong_count(entry) == 1)
        {
            map.remove(&self.bucket);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_lock_entry_removed_after_release() {
        let locks = BucketLocks::default();

        let first = locks.acquire("a").await;
        let second = locks.acquire("b").await;
        assert_eq!(locks.len(), 2);

        drop(first);
        assert_eq!(locks.len(), 1);
        drop(second);
        assert_eq!(locks.len(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_lock_entry_kept_while_another_pass_waits() {
        let locks = BucketLocks::default();
        let holder = locks.acquire("a").await;

        let waiter = locks.acquire("a");
        tokio::pin!(waiter);
        let blocked = tokio::time::timeout(Duration::from_millis(10), &mut waiter).await;
        assert!(blocked.is_err(), "second pass must wait for the first");

        drop(holder);
        assert_eq!(locks.len(), 1);

        let next = waiter.await;
        assert_eq!(locks.len(), 1);
        drop(next);
        assert_eq!(locks.len(), 0);
    }

    #[tokio::test]
    async fn test_many_sequential_passes_leave_no_entries() {
        let locks = BucketLocks::default();
        for i in 0..100 {
            let _lease = locks.acquire(&format!("bucket-{i}")).await;
        }
        assert_eq!(locks.len(), 0);
    }
}
