//! Typed facade over the AWS S3 SDK
//!
//! This crate wraps `aws-sdk-s3` with a small, explicit surface for
//! S3-compatible object storage: bucket listing, uploads, downloads,
//! single and batch deletes, and unsigned or presigned object URLs.
//! Protocol concerns (signing, pagination, multipart, pooling) stay in
//! the SDK; this layer adds typed inputs, a shared long-lived client,
//! and a classified error taxonomy.

pub mod config;
pub mod s3;

// Re-export the public surface at the crate root
pub use config::StoreConfig;
pub use s3::{Bucket, DeleteFailure, ObjectAcl, PutBody, S3Store, StoreError, StoreResult};
