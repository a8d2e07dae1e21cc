//! AWS S3 client wrapper

use std::time::Duration;

use aws_config::retry::RetryConfig;
use aws_config::timeout::TimeoutConfig;
use aws_config::BehaviorVersion;
use aws_sdk_s3::config::{Credentials, Region};
use aws_sdk_s3::error::SdkError;
use aws_sdk_s3::operation::head_object::HeadObjectError;
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::{Delete, ObjectIdentifier};
use aws_sdk_s3::Client;
use tracing::debug;

use crate::config::StoreConfig;
use crate::s3::error::{classify, StoreError, StoreResult};
use crate::s3::types::{unsigned_object_url, Bucket, DeleteFailure, ObjectAcl, PutBody};

const MAX_ATTEMPTS: u32 = 3;
const OPERATION_TIMEOUT: Duration = Duration::from_secs(30);

/// S3 store wrapper with high-level operations
///
/// Holds a single SDK client constructed once from configuration. Cloning
/// is cheap and clones share the underlying connection pool, so build one
/// at startup and pass it around instead of reconnecting per call.
#[derive(Clone, Debug)]
pub struct S3Store {
    client: Client,
    region: String,
    endpoint_url: Option<String>,
    force_path_style: bool,
}

impl S3Store {
    /// Connect using the given configuration.
    ///
    /// Credentials resolve in order: explicit key pair from the config,
    /// then the named profile, then the SDK's default chain (environment,
    /// instance roles).
    pub async fn connect(config: &StoreConfig) -> StoreResult<Self> {
        if let Some(endpoint) = &config.endpoint_url {
            url::Url::parse(endpoint).map_err(|e| {
                StoreError::Config(format!("invalid endpoint URL {endpoint:?}: {e}"))
            })?;
        }

        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .retry_config(RetryConfig::standard().with_max_attempts(MAX_ATTEMPTS))
            .timeout_config(
                TimeoutConfig::builder()
                    .operation_timeout(OPERATION_TIMEOUT)
                    .build(),
            );

        if let Some(profile) = &config.profile {
            loader = loader.profile_name(profile);
        }
        if let Some(region) = &config.region {
            loader = loader.region(Region::new(region.clone()));
        }
        if let (Some(key), Some(secret)) = (&config.access_key_id, &config.secret_access_key) {
            loader = loader.credentials_provider(Credentials::new(
                key.clone(),
                secret.clone(),
                None,
                None,
                "store-config",
            ));
        }

        let shared = loader.load().await;
        let region = shared
            .region()
            .map(|r| r.to_string())
            .unwrap_or_else(|| "us-east-1".to_string());

        let mut builder = aws_sdk_s3::config::Builder::from(&shared);
        if let Some(endpoint) = &config.endpoint_url {
            builder = builder.endpoint_url(endpoint.clone());
        }
        if config.force_path_style {
            builder = builder.force_path_style(true);
        }

        Ok(Self {
            client: Client::from_conf(builder.build()),
            region,
            endpoint_url: config.endpoint_url.clone(),
            force_path_style: config.force_path_style,
        })
    }

    /// List all accessible buckets, in the order the service reports them
    pub async fn list_buckets(&self) -> StoreResult<Vec<Bucket>> {
        debug!("listing buckets");
        let response = self
            .client
            .list_buckets()
            .send()
            .await
            .map_err(|e| classify("list buckets", e))?;

        let buckets = response
            .buckets()
            .iter()
            .map(|b| Bucket {
                name: b.name().unwrap_or_default().to_string(),
                creation_date: b
                    .creation_date()
                    .and_then(|d| chrono::DateTime::from_timestamp(d.secs(), d.subsec_nanos())),
            })
            .collect();

        Ok(buckets)
    }

    /// Upload an object and return its unsigned URL.
    ///
    /// The payload goes up in a single request; large uploads that need
    /// multipart are out of scope for this wrapper.
    pub async fn put_object(
        &self,
        acl: ObjectAcl,
        bucket: &str,
        key: &str,
        body: PutBody,
    ) -> StoreResult<String> {
        debug!(bucket, key, acl = acl.as_str(), "putting object");

        let stream = match body {
            PutBody::Inline(bytes) => ByteStream::from(bytes),
            PutBody::File(path) => ByteStream::from_path(&path).await.map_err(|e| {
                StoreError::InvalidRequest(format!(
                    "unreadable payload file {}: {e}",
                    path.display()
                ))
            })?,
        };

        self.client
            .put_object()
            .acl(acl.into())
            .bucket(bucket)
            .key(key)
            .body(stream)
            .send()
            .await
            .map_err(|e| classify("put object", e))?;

        Ok(self.object_url(bucket, key))
    }

    /// Delete an object. Succeeds whether or not the key exists.
    pub async fn delete_object(&self, bucket: &str, key: &str) -> StoreResult<()> {
        debug!(bucket, key, "deleting object");
        self.client
            .delete_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| classify("delete object", e))?;

        Ok(())
    }

    /// Delete a batch of keys in one request, in input order.
    ///
    /// Returns one entry per key the service refused; empty means every
    /// key was accepted. A missing key counts as deleted, and one refused
    /// key does not abort the rest. The service caps a batch at 1000 keys;
    /// chunking beyond that is the caller's concern.
    pub async fn delete_objects(
        &self,
        bucket: &str,
        keys: &[&str],
    ) -> StoreResult<Vec<DeleteFailure>> {
        if keys.is_empty() {
            return Ok(Vec::new());
        }
        debug!(bucket, count = keys.len(), "deleting objects");

        let objects = keys
            .iter()
            .map(|key| {
                ObjectIdentifier::builder().key(*key).build().map_err(|e| {
                    StoreError::InvalidRequest(format!("invalid object key {key:?}: {e}"))
                })
            })
            .collect::<StoreResult<Vec<_>>>()?;

        let delete = Delete::builder()
            .set_objects(Some(objects))
            .build()
            .map_err(|e| StoreError::InvalidRequest(format!("invalid batch delete: {e}")))?;

        let response = self
            .client
            .delete_objects()
            .bucket(bucket)
            .delete(delete)
            .send()
            .await
            .map_err(|e| classify("delete objects", e))?;

        let failures = response
            .errors()
            .iter()
            .map(|e| DeleteFailure {
                key: e.key().unwrap_or_default().to_string(),
                code: e.code().map(str::to_string),
                message: e.message().map(str::to_string),
            })
            .collect();

        Ok(failures)
    }

    /// Download an object to bytes
    pub async fn get_object(&self, bucket: &str, key: &str) -> StoreResult<Vec<u8>> {
        debug!(bucket, key, "getting object");
        let response = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| classify("get object", e))?;

        let data = response
            .body
            .collect()
            .await
            .map_err(|e| StoreError::Transient(format!("get object: body read failed: {e}")))?;

        Ok(data.into_bytes().to_vec())
    }

    /// Check whether an object exists
    pub async fn object_exists(&self, bucket: &str, key: &str) -> StoreResult<bool> {
        debug!(bucket, key, "checking object existence");
        let result = self
            .client
            .head_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await;

        match result {
            Ok(_) => Ok(true),
            // HEAD responses carry no error body, so match the modeled
            // variant instead of the wire code
            Err(SdkError::ServiceError(ctx)) if matches!(ctx.err(), HeadObjectError::NotFound(_)) => {
                Ok(false)
            }
            Err(e) => Err(classify("head object", e)),
        }
    }

    /// Create a bucket
    pub async fn create_bucket(&self, bucket: &str) -> StoreResult<()> {
        debug!(bucket, "creating bucket");
        self.client
            .create_bucket()
            .bucket(bucket)
            .send()
            .await
            .map_err(|e| classify("create bucket", e))?;

        Ok(())
    }

    /// URL for an object, presigned when an expiry is given.
    ///
    /// Without an expiry this is the plain unsigned URL, computed locally
    /// and readable only for public objects. With an expiry the returned
    /// URL carries a time-limited signature granting read access to
    /// private objects until it lapses.
    pub async fn get_object_url(
        &self,
        bucket: &str,
        key: &str,
        expires: Option<Duration>,
    ) -> StoreResult<String> {
        let Some(expiry) = expires else {
            return Ok(self.object_url(bucket, key));
        };

        debug!(bucket, key, ?expiry, "presigning object URL");
        let presigning = PresigningConfig::expires_in(expiry)
            .map_err(|e| StoreError::Config(format!("invalid presign expiry {expiry:?}: {e}")))?;

        let request = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .presigned(presigning)
            .await
            .map_err(|e| classify("presign object URL", e))?;

        Ok(request.uri().to_string())
    }

    fn object_url(&self, bucket: &str, key: &str) -> String {
        unsigned_object_url(
            self.endpoint_url.as_deref(),
            &self.region,
            self.force_path_style,
            bucket,
            key,
        )
    }

    /// Region the client resolved at construction time
    pub fn region(&self) -> &str {
        &self.region
    }
}
