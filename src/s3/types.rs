//! S3 data types

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use aws_sdk_s3::types::ObjectCannedAcl;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::s3::error::StoreError;

/// Represents an S3 bucket
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bucket {
    pub name: String,
    pub creation_date: Option<DateTime<Utc>>,
}

/// Canned access-control level for an uploaded object.
///
/// Closed set of the six values the service accepts; anything else is
/// rejected at parse time instead of being sent over the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ObjectAcl {
    Private,
    PublicRead,
    PublicReadWrite,
    AuthenticatedRead,
    BucketOwnerRead,
    BucketOwnerFullControl,
}

impl ObjectAcl {
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectAcl::Private => "private",
            ObjectAcl::PublicRead => "public-read",
            ObjectAcl::PublicReadWrite => "public-read-write",
            ObjectAcl::AuthenticatedRead => "authenticated-read",
            ObjectAcl::BucketOwnerRead => "bucket-owner-read",
            ObjectAcl::BucketOwnerFullControl => "bucket-owner-full-control",
        }
    }
}

impl fmt::Display for ObjectAcl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ObjectAcl {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "private" => Ok(ObjectAcl::Private),
            "public-read" => Ok(ObjectAcl::PublicRead),
            "public-read-write" => Ok(ObjectAcl::PublicReadWrite),
            "authenticated-read" => Ok(ObjectAcl::AuthenticatedRead),
            "bucket-owner-read" => Ok(ObjectAcl::BucketOwnerRead),
            "bucket-owner-full-control" => Ok(ObjectAcl::BucketOwnerFullControl),
            other => Err(StoreError::InvalidRequest(format!(
                "unknown ACL {other:?}"
            ))),
        }
    }
}

impl From<ObjectAcl> for ObjectCannedAcl {
    fn from(acl: ObjectAcl) -> Self {
        match acl {
            ObjectAcl::Private => ObjectCannedAcl::Private,
            ObjectAcl::PublicRead => ObjectCannedAcl::PublicRead,
            ObjectAcl::PublicReadWrite => ObjectCannedAcl::PublicReadWrite,
            ObjectAcl::AuthenticatedRead => ObjectCannedAcl::AuthenticatedRead,
            ObjectAcl::BucketOwnerRead => ObjectCannedAcl::BucketOwnerRead,
            ObjectAcl::BucketOwnerFullControl => ObjectCannedAcl::BucketOwnerFullControl,
        }
    }
}

/// Upload payload: inline bytes, or a local file streamed at send time.
///
/// The caller owns the file until the upload completes.
#[derive(Debug, Clone)]
pub enum PutBody {
    Inline(Bytes),
    File(PathBuf),
}

impl PutBody {
    pub fn inline(bytes: impl Into<Bytes>) -> Self {
        PutBody::Inline(bytes.into())
    }

    pub fn file(path: impl Into<PathBuf>) -> Self {
        PutBody::File(path.into())
    }
}

impl From<Vec<u8>> for PutBody {
    fn from(bytes: Vec<u8>) -> Self {
        PutBody::Inline(bytes.into())
    }
}

/// Per-key failure reported by a batch delete.
#[derive(Debug, Clone)]
pub struct DeleteFailure {
    pub key: String,
    pub code: Option<String>,
    pub message: Option<String>,
}

/// Build the unsigned HTTPS URL for an object.
///
/// With no custom endpoint this is the virtual-hosted AWS form. A custom
/// endpoint keeps its scheme and either prepends the bucket to the host or,
/// with path-style addressing, puts the bucket on the path.
pub(crate) fn unsigned_object_url(
    endpoint_url: Option<&str>,
    region: &str,
    force_path_style: bool,
    bucket: &str,
    key: &str,
) -> String {
    match endpoint_url {
        Some(endpoint) => {
            let endpoint = endpoint.trim_end_matches('/');
            if force_path_style {
                format!("{endpoint}/{bucket}/{key}")
            } else {
                let (scheme, host) = endpoint
                    .split_once("://")
                    .unwrap_or(("https", endpoint));
                format!("{scheme}://{bucket}.{host}/{key}")
            }
        }
        None => format!("https://{bucket}.s3.{region}.amazonaws.com/{key}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ObjectAcl tests

    #[test]
    fn test_acl_round_trips_through_wire_strings() {
        let acls = [
            ObjectAcl::Private,
            ObjectAcl::PublicRead,
            ObjectAcl::PublicReadWrite,
            ObjectAcl::AuthenticatedRead,
            ObjectAcl::BucketOwnerRead,
            ObjectAcl::BucketOwnerFullControl,
        ];
        for acl in acls {
            assert_eq!(acl.as_str().parse::<ObjectAcl>().unwrap(), acl);
        }
    }

    #[test]
    fn test_acl_wire_strings() {
        assert_eq!(ObjectAcl::Private.as_str(), "private");
        assert_eq!(ObjectAcl::PublicRead.as_str(), "public-read");
        assert_eq!(
            ObjectAcl::BucketOwnerFullControl.as_str(),
            "bucket-owner-full-control"
        );
    }

    #[test]
    fn test_acl_rejects_unknown_strings() {
        assert!("public".parse::<ObjectAcl>().is_err());
        assert!("PRIVATE".parse::<ObjectAcl>().is_err());
        assert!("".parse::<ObjectAcl>().is_err());
    }

    #[test]
    fn test_acl_maps_to_sdk_canned_acl() {
        assert_eq!(
            ObjectCannedAcl::from(ObjectAcl::PublicRead).as_str(),
            "public-read"
        );
        assert_eq!(
            ObjectCannedAcl::from(ObjectAcl::AuthenticatedRead).as_str(),
            "authenticated-read"
        );
    }

    #[test]
    fn test_acl_serde_uses_wire_strings() {
        let json = serde_json::to_string(&ObjectAcl::BucketOwnerRead).unwrap();
        assert_eq!(json, "\"bucket-owner-read\"");
        let acl: ObjectAcl = serde_json::from_str("\"public-read-write\"").unwrap();
        assert_eq!(acl, ObjectAcl::PublicReadWrite);
    }

    // URL construction tests

    #[test]
    fn test_unsigned_url_aws_virtual_hosted() {
        let url = unsigned_object_url(None, "eu-west-1", false, "my-bucket", "path/to/file.txt");
        assert_eq!(
            url,
            "https://my-bucket.s3.eu-west-1.amazonaws.com/path/to/file.txt"
        );
    }

    #[test]
    fn test_unsigned_url_custom_endpoint_path_style() {
        let url = unsigned_object_url(
            Some("http://localhost:9000"),
            "us-east-1",
            true,
            "my-bucket",
            "file.txt",
        );
        assert_eq!(url, "http://localhost:9000/my-bucket/file.txt");
    }

    #[test]
    fn test_unsigned_url_custom_endpoint_virtual_hosted() {
        let url = unsigned_object_url(
            Some("https://r2.example.com"),
            "auto",
            false,
            "assets",
            "img/logo.png",
        );
        assert_eq!(url, "https://assets.r2.example.com/img/logo.png");
    }

    #[test]
    fn test_unsigned_url_trims_trailing_slash() {
        let url = unsigned_object_url(
            Some("http://localhost:9000/"),
            "us-east-1",
            true,
            "b",
            "k",
        );
        assert_eq!(url, "http://localhost:9000/b/k");
    }

    #[test]
    fn test_unsigned_url_has_no_query_component() {
        let url = unsigned_object_url(None, "us-east-1", false, "b", "deep/nested/key");
        assert!(!url.contains('?'));
    }

    // PutBody tests

    #[test]
    fn test_put_body_inline_from_vec() {
        let body = PutBody::from(b"hello".to_vec());
        assert!(matches!(body, PutBody::Inline(ref b) if b.as_ref() == b"hello"));
    }

    #[test]
    fn test_put_body_file_keeps_path() {
        let body = PutBody::file("/tmp/payload.bin");
        assert!(matches!(body, PutBody::File(ref p) if p == &PathBuf::from("/tmp/payload.bin")));
    }
}
