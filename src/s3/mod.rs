//! S3 facade module
//!
//! This module provides the object-storage surface:
//! - [`client::S3Store`] - High-level S3 operations wrapper
//! - [`error::StoreError`] - Error taxonomy for store operations
//! - [`types`] - S3 data types (Bucket, ObjectAcl, PutBody)

pub mod client;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use client::S3Store;
pub use error::{StoreError, StoreResult};
pub use types::{Bucket, DeleteFailure, ObjectAcl, PutBody};
