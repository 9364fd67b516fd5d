//! # auditbucket-s3
//!
//! Reconciles compiled bucket specs against a storage provider:
//! - [`BucketStore`], the provider seam, and [`S3BucketStore`] on `aws-sdk-s3`
//! - lifecycle wire mapping ([`encode_rules`] / [`decode_rules`])
//! - [`Reconciler`]: observe, diff, apply with retry and per-bucket single-flight

pub mod error;
pub mod reconciler;
pub mod retry;
pub mod s3;
pub mod store;

pub use error::{ReconcileError, StoreError};
pub use reconciler::{ReconcileReport, Reconciler};
pub use s3::{decode_rules, encode_rules, S3BucketStore};
pub use store::{BucketStore, StoreResult};
