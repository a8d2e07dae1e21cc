//! Error types for store operations

use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use thiserror::Error;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur during store operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Credentials were rejected by the service
    #[error("authentication failed: {0}")]
    Auth(String),

    /// Bucket or object does not exist
    #[error("not found: {0}")]
    NotFound(String),

    /// Credentials are valid but lack permission
    #[error("access denied: {0}")]
    AccessDenied(String),

    /// Network failure, timeout, or 5xx from the service
    #[error("transient failure: {0}")]
    Transient(String),

    /// Request rejected before it was sent
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Client configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Any other service error
    #[error("service error: {0}")]
    Service(String),
}

impl StoreError {
    /// Whether retrying the same request may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transient(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

const NOT_FOUND_CODES: &[&str] = &["NoSuchKey", "NoSuchBucket", "NotFound"];

const AUTH_CODES: &[&str] = &[
    "InvalidAccessKeyId",
    "SignatureDoesNotMatch",
    "ExpiredToken",
    "TokenRefreshRequired",
];

const TRANSIENT_CODES: &[&str] = &[
    "InternalError",
    "ServiceUnavailable",
    "SlowDown",
    "RequestTimeout",
];

/// Classify an SDK error into the store taxonomy.
///
/// Dispatch failures and client-side timeouts are transient; service errors
/// are keyed off the error code the service returned.
pub(crate) fn classify<E, R>(op: &str, err: SdkError<E, R>) -> StoreError
where
    E: ProvideErrorMetadata + std::error::Error + Send + Sync + 'static,
    R: std::fmt::Debug,
{
    let detail = format!("{op}: {}", DisplayErrorContext(&err));
    match &err {
        SdkError::DispatchFailure(_) | SdkError::TimeoutError(_) => StoreError::Transient(detail),
        SdkError::ServiceError(_) => classify_service_code(err.code(), detail),
        _ => StoreError::Service(detail),
    }
}

fn classify_service_code(code: Option<&str>, detail: String) -> StoreError {
    match code {
        Some(code) if NOT_FOUND_CODES.contains(&code) => StoreError::NotFound(detail),
        Some("AccessDenied") | Some("AllAccessDisabled") => StoreError::AccessDenied(detail),
        Some(code) if AUTH_CODES.contains(&code) => StoreError::Auth(detail),
        Some(code) if TRANSIENT_CODES.contains(&code) => StoreError::Transient(detail),
        _ => StoreError::Service(detail),
    }
}
