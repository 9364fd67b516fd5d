//! S3 implementation of [`BucketStore`]
//!
//! Works against AWS S3 and S3-compatible services (MinIO, LocalStack).
//! Provider "not configured" responses are read back as unset values.

mod classify;
mod wire;

pub use wire::{decode_rules, encode_rules};

use crate::error::StoreError;
use crate::store::{BucketStore, StoreResult};
use async_trait::async_trait;
use auditbucket_core::{
    EncryptionSpec, LifecycleRuleSet, ObservedLifecycle, PublicAccessBlock, SseAlgorithm, TagSet,
    VersioningState,
};
use aws_config::BehaviorVersion;
use aws_sdk_s3::config::Region;
use aws_sdk_s3::error::ProvideErrorMetadata;
use aws_sdk_s3::types::{
    BucketLifecycleConfiguration, BucketLocationConstraint, BucketVersioningStatus,
    CreateBucketConfiguration, PublicAccessBlockConfiguration, ServerSideEncryption,
    ServerSideEncryptionByDefault, ServerSideEncryptionConfiguration, ServerSideEncryptionRule,
    Tag, Tagging, VersioningConfiguration,
};
use aws_sdk_s3::Client;
use classify::classify;
use tracing::debug;

/// Region that rejects an explicit location constraint
const DEFAULT_REGION: &str = "us-east-1";

/// Bucket store backed by the S3 API
pub struct S3BucketStore {
    client: Client,
    region: String,
}

impl S3BucketStore {
    /// Build a client from the default credential chain for `region`
    pub async fn new(region: &str, endpoint: Option<&str>) -> Self {
        let client = Self::create_client(region, endpoint).await;
        Self::from_client(client, region)
    }

    fn from_client(client: Client, region: &str) -> Self {
        Self {
            client,
            region: region.to_string(),
        }
    }

    async fn create_client(region: &str, endpoint: Option<&str>) -> Client {
        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(region.to_string()))
            .load()
            .await;

        let mut s3_config_builder = aws_sdk_s3::config::Builder::from(&sdk_config);

        if let Some(endpoint_url) = endpoint {
            debug!("Using custom S3 endpoint: {}", endpoint_url);
            s3_config_builder = s3_config_builder
                .endpoint_url(endpoint_url)
                .force_path_style(true);
        }

        Client::from_conf(s3_config_builder.build())
    }
}

/// Turn a "not configured" error into `Ok(None)`
fn absent_if_not_found<T>(result: StoreResult<T>) -> StoreResult<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(StoreError::NotFound { .. }) => Ok(None),
        Err(e) => Err(e),
    }
}

fn sse_algorithm(value: &ServerSideEncryption) -> Option<SseAlgorithm> {
    match value {
        ServerSideEncryption::Aes256 => Some(SseAlgorithm::Aes256),
        ServerSideEncryption::AwsKms => Some(SseAlgorithm::AwsKms),
        ServerSideEncryption::AwsKmsDsse => Some(SseAlgorithm::AwsKmsDsse),
        _ => None,
    }
}

fn server_side_encryption(value: SseAlgorithm) -> ServerSideEncryption {
    match value {
        SseAlgorithm::Aes256 => ServerSideEncryption::Aes256,
        SseAlgorithm::AwsKms => ServerSideEncryption::AwsKms,
        SseAlgorithm::AwsKmsDsse => ServerSideEncryption::AwsKmsDsse,
    }
}

#[async_trait]
impl BucketStore for S3BucketStore {
    async fn bucket_exists(&self, bucket: &str) -> StoreResult<bool> {
        let result = self
            .client
            .head_bucket()
            .bucket(bucket)
            .send()
            .await
            .map_err(|e| classify(bucket, "head-bucket", &e));

        Ok(absent_if_not_found(result)?.is_some())
    }

    async fn create_bucket(&self, bucket: &str) -> StoreResult<()> {
        let mut request = self.client.create_bucket().bucket(bucket);
        if self.region != DEFAULT_REGION {
            request = request.create_bucket_configuration(
                CreateBucketConfiguration::builder()
                    .location_constraint(BucketLocationConstraint::from(self.region.as_str()))
                    .build(),
            );
        }

        match request.send().await {
            Ok(_) => {
                debug!("Created bucket {} in {}", bucket, self.region);
                Ok(())
            }
            Err(e) => {
                if e.code() == Some("BucketAlreadyOwnedByYou") {
                    debug!("Bucket {} already owned by caller", bucket);
                    return Ok(());
                }
                Err(classify(bucket, "create-bucket", &e))
            }
        }
    }

    async fn get_encryption(&self, bucket: &str) -> StoreResult<Option<EncryptionSpec>> {
        let result = self
            .client
            .get_bucket_encryption()
            .bucket(bucket)
            .send()
            .await
            .map_err(|e| classify(bucket, "get-encryption", &e));

        let Some(output) = absent_if_not_found(result)? else {
            return Ok(None);
        };

        let default_rule = output
            .server_side_encryption_configuration()
            .and_then(|cfg| cfg.rules().first())
            .and_then(|rule| rule.apply_server_side_encryption_by_default());

        Ok(default_rule.and_then(|by_default| {
            sse_algorithm(by_default.sse_algorithm()).map(|algorithm| EncryptionSpec {
                algorithm,
                kms_key_id: by_default.kms_master_key_id().map(str::to_string),
            })
        }))
    }

    async fn put_encryption(&self, bucket: &str, encryption: &EncryptionSpec) -> StoreResult<()> {
        let by_default = ServerSideEncryptionByDefault::builder()
            .sse_algorithm(server_side_encryption(encryption.algorithm))
            .set_kms_master_key_id(encryption.kms_key_id.clone())
            .build()
            .map_err(|e| StoreError::wire("encryption rule", e.to_string()))?;

        let configuration = ServerSideEncryptionConfiguration::builder()
            .rules(
                ServerSideEncryptionRule::builder()
                    .apply_server_side_encryption_by_default(by_default)
                    .build(),
            )
            .build()
            .map_err(|e| StoreError::wire("encryption configuration", e.to_string()))?;

        self.client
            .put_bucket_encryption()
            .bucket(bucket)
            .server_side_encryption_configuration(configuration)
            .send()
            .await
            .map_err(|e| classify(bucket, "put-encryption", &e))?;
        Ok(())
    }

    async fn get_public_access_block(
        &self,
        bucket: &str,
    ) -> StoreResult<Option<PublicAccessBlock>> {
        let result = self
            .client
            .get_public_access_block()
            .bucket(bucket)
            .send()
            .await
            .map_err(|e| classify(bucket, "get-public-access-block", &e));

        let Some(output) = absent_if_not_found(result)? else {
            return Ok(None);
        };

        Ok(output
            .public_access_block_configuration()
            .map(|cfg| PublicAccessBlock {
                block_public_acls: cfg.block_public_acls().unwrap_or(false),
                ignore_public_acls: cfg.ignore_public_acls().unwrap_or(false),
                block_public_policy: cfg.block_public_policy().unwrap_or(false),
                restrict_public_buckets: cfg.restrict_public_buckets().unwrap_or(false),
            }))
    }

    async fn put_public_access_block(
        &self,
        bucket: &str,
        block: &PublicAccessBlock,
    ) -> StoreResult<()> {
        let configuration = PublicAccessBlockConfiguration::builder()
            .block_public_acls(block.block_public_acls)
            .ignore_public_acls(block.ignore_public_acls)
            .block_public_policy(block.block_public_policy)
            .restrict_public_buckets(block.restrict_public_buckets)
            .build();

        self.client
            .put_public_access_block()
            .bucket(bucket)
            .public_access_block_configuration(configuration)
            .send()
            .await
            .map_err(|e| classify(bucket, "put-public-access-block", &e))?;
        Ok(())
    }

    async fn get_versioning(&self, bucket: &str) -> StoreResult<VersioningState> {
        let output = self
            .client
            .get_bucket_versioning()
            .bucket(bucket)
            .send()
            .await
            .map_err(|e| classify(bucket, "get-versioning", &e))?;

        Ok(match output.status() {
            Some(BucketVersioningStatus::Enabled) => VersioningState::Enabled,
            Some(BucketVersioningStatus::Suspended) => VersioningState::Suspended,
            _ => VersioningState::Unversioned,
        })
    }

    async fn put_versioning(&self, bucket: &str, state: VersioningState) -> StoreResult<()> {
        let status = match state {
            VersioningState::Enabled => BucketVersioningStatus::Enabled,
            VersioningState::Suspended => BucketVersioningStatus::Suspended,
            VersioningState::Unversioned => {
                return Err(StoreError::wire(
                    "versioning",
                    "a bucket cannot be returned to unversioned",
                ))
            }
        };

        self.client
            .put_bucket_versioning()
            .bucket(bucket)
            .versioning_configuration(VersioningConfiguration::builder().status(status).build())
            .send()
            .await
            .map_err(|e| classify(bucket, "put-versioning", &e))?;
        Ok(())
    }

    async fn get_tags(&self, bucket: &str) -> StoreResult<TagSet> {
        let result = self
            .client
            .get_bucket_tagging()
            .bucket(bucket)
            .send()
            .await
            .map_err(|e| classify(bucket, "get-tags", &e));

        Ok(absent_if_not_found(result)?
            .map(|output| {
                output
                    .tag_set()
                    .iter()
                    .map(|tag| (tag.key().to_string(), tag.value().to_string()))
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn put_tags(&self, bucket: &str, tags: &TagSet) -> StoreResult<()> {
        let tag_set = tags
            .iter()
            .map(|(key, value)| {
                Tag::builder()
                    .key(key)
                    .value(value)
                    .build()
                    .map_err(|e| StoreError::wire(format!("tag {key}"), e.to_string()))
            })
            .collect::<StoreResult<Vec<_>>>()?;

        let tagging = Tagging::builder()
            .set_tag_set(Some(tag_set))
            .build()
            .map_err(|e| StoreError::wire("tag set", e.to_string()))?;

        self.client
            .put_bucket_tagging()
            .bucket(bucket)
            .tagging(tagging)
            .send()
            .await
            .map_err(|e| classify(bucket, "put-tags", &e))?;
        Ok(())
    }

    async fn get_lifecycle(&self, bucket: &str) -> StoreResult<ObservedLifecycle> {
        let result = self
            .client
            .get_bucket_lifecycle_configuration()
            .bucket(bucket)
            .send()
            .await
            .map_err(|e| classify(bucket, "get-lifecycle", &e));

        Ok(match absent_if_not_found(result)? {
            Some(output) => decode_rules(output.rules()),
            None => ObservedLifecycle::Absent,
        })
    }

    async fn put_lifecycle(&self, bucket: &str, rules: &LifecycleRuleSet) -> StoreResult<()> {
        let configuration = BucketLifecycleConfiguration::builder()
            .set_rules(Some(encode_rules(rules)?))
            .build()
            .map_err(|e| StoreError::wire("lifecycle configuration", e.to_string()))?;

        self.client
            .put_bucket_lifecycle_configuration()
            .bucket(bucket)
            .lifecycle_configuration(configuration)
            .send()
            .await
            .map_err(|e| classify(bucket, "put-lifecycle", &e))?;
        Ok(())
    }

    async fn delete_lifecycle(&self, bucket: &str) -> StoreResult<()> {
        let result = self
            .client
            .delete_bucket_lifecycle()
            .bucket(bucket)
            .send()
            .await
            .map_err(|e| classify(bucket, "delete-lifecycle", &e));

        absent_if_not_found(result)?;
        Ok(())
    }
}
