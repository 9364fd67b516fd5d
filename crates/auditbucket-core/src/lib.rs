//! # auditbucket-core
//!
//! Core library for auditbucket providing:
//! - Identity building (resource name + tag set) from naming labels
//! - Lifecycle policy compilation (storage-tier transitions and expirations)
//! - The locked-down bucket access policy
//! - Desired-state compilation and drift diffing against an observed bucket
//! - Configuration file parsing and JSON Schema validation
//!
//! Everything except config loading is a pure function: no I/O, no clocks,
//! no randomness.

pub mod access;
pub mod bucket;
pub mod config;
pub mod error;
pub mod label;
pub mod lifecycle;
pub mod plan;
pub mod schema;

pub use access::{BucketAccessPolicy, EncryptionSpec, PublicAccessBlock, SseAlgorithm, VersioningState};
pub use bucket::{compile_bucket, BucketSpec};
pub use config::{AuditBucketConfig, LoadedConfig};
pub use error::{ConfigurationError, Error, Result};
pub use label::{build_identity, Identity, LabelKind, LetterCase, NamingConfig, TagSet};
pub use lifecycle::{
    compile_lifecycle, Expiration, LifecycleConfig, LifecyclePolicy, LifecycleRule, LifecycleRuleSet,
    RuleStatus, StorageTier, Transition,
};
pub use plan::{diff, Change, ObservedBucket, ObservedLifecycle};
pub use schema::SchemaValidator;
