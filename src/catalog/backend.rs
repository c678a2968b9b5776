//! Object storage backends
//!
//! [`ObjectBackend`] is the seam between the catalog and the storage service.
//! [`S3Backend`] talks to any S3-compatible endpoint (DigitalOcean Spaces,
//! MinIO, AWS) using path-style addressing and SigV4 presigning.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use s3::creds::Credentials;
use s3::{Bucket, Region};

use crate::config::StorageConfig;
use crate::error::{Error, Result};
use super::object::{SignedUrlRequest, StoredObject};

/// Listing and URL signing capabilities of a storage service
#[async_trait]
pub trait ObjectBackend: Send + Sync {
    /// Name of the bucket being served
    fn bucket_name(&self) -> &str;

    /// Fetch a single page of at most `max_keys` objects under `prefix`
    async fn list_objects(&self, prefix: &str, max_keys: usize) -> Result<Vec<StoredObject>>;

    /// Produce a time-limited GET URL for one object
    async fn presign_get(&self, request: &SignedUrlRequest) -> Result<String>;
}

/// S3-compatible backend built on `rust-s3`
pub struct S3Backend {
    bucket: Box<Bucket>,
    bucket_name: String,
}

impl S3Backend {
    /// Create a backend from storage configuration
    pub fn new(config: &StorageConfig) -> Result<Self> {
        let region = Region::Custom {
            region: config.region.clone(),
            endpoint: config.endpoint.clone(),
        };

        let credentials = Credentials::new(
            Some(config.access_key.as_str()),
            Some(config.secret_key.as_str()),
            None,
            None,
            None,
        )
        .map_err(|e| Error::Config(format!("Invalid storage credentials: {}", e)))?;

        let bucket = Bucket::new(&config.bucket, region, credentials)
            .map_err(|e| Error::Config(format!("Invalid bucket {:?}: {}", config.bucket, e)))?
            .with_path_style();

        Ok(Self {
            bucket,
            bucket_name: config.bucket.clone(),
        })
    }
}

#[async_trait]
impl ObjectBackend for S3Backend {
    fn bucket_name(&self) -> &str {
        &self.bucket_name
    }

    async fn list_objects(&self, prefix: &str, max_keys: usize) -> Result<Vec<StoredObject>> {
        let (page, status) = self
            .bucket
            .list_page(prefix.to_string(), None, None, None, Some(max_keys))
            .await
            .map_err(|e| Error::BackendUnavailable(format!("ListObjectsV2 failed: {}", e)))?;

        if status != 200 {
            return Err(Error::BackendUnavailable(format!(
                "ListObjectsV2 returned HTTP {}",
                status
            )));
        }

        let objects = page
            .contents
            .into_iter()
            .map(|object| StoredObject {
                last_modified: parse_last_modified(&object.key, &object.last_modified),
                key: object.key,
                size_bytes: object.size,
            })
            .collect();

        Ok(objects)
    }

    async fn presign_get(&self, request: &SignedUrlRequest) -> Result<String> {
        self.bucket
            .presign_get(&request.key, request.expiry_secs, None)
            .await
            .map_err(|e| {
                Error::BackendUnavailable(format!("Failed to sign {}: {}", request.key, e))
            })
    }
}

/// Parse an S3 `LastModified` timestamp, sorting unparseable values last
fn parse_last_modified(key: &str, raw: &str) -> DateTime<Utc> {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(timestamp) => timestamp.with_timezone(&Utc),
        Err(e) => {
            tracing::warn!("Object {} has invalid LastModified {:?}: {}", key, raw, e);
            DateTime::<Utc>::default()
        }
    }
}
