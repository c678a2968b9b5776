//! Object Catalog
//!
//! Stateless facade over an [`ObjectBackend`]: lists one page of objects,
//! orders them newest first and attaches a signed URL to each. Errors are
//! returned to the caller unchanged; deciding whether a failed listing is
//! fatal belongs to the dashboard layer.

use std::sync::Arc;
use std::time::Duration;

use crate::error::{Error, Result};
use super::backend::ObjectBackend;
use super::object::{CatalogEntry, SignedUrlRequest};

/// Lifetime of signed download URLs
pub const DEFAULT_URL_EXPIRY_SECS: u32 = 3600;

/// Upper bound on a single listing call
pub const DEFAULT_LISTING_TIMEOUT: Duration = Duration::from_secs(5);

/// Recording catalog
#[derive(Clone)]
pub struct ObjectCatalog {
    backend: Arc<dyn ObjectBackend>,
    url_expiry_secs: u32,
    listing_timeout: Duration,
}

impl ObjectCatalog {
    /// Create a catalog with the default expiry and timeout
    pub fn new(backend: Arc<dyn ObjectBackend>) -> Self {
        Self {
            backend,
            url_expiry_secs: DEFAULT_URL_EXPIRY_SECS,
            listing_timeout: DEFAULT_LISTING_TIMEOUT,
        }
    }

    /// Set the expiry used for URLs attached to listed entries
    pub fn with_url_expiry(mut self, secs: u32) -> Self {
        self.url_expiry_secs = secs;
        self
    }

    /// Set the listing timeout
    pub fn with_listing_timeout(mut self, timeout: Duration) -> Self {
        self.listing_timeout = timeout;
        self
    }

    /// Name of the bucket being served
    pub fn bucket(&self) -> &str {
        self.backend.bucket_name()
    }

    /// List up to `max_items` objects under `prefix`, newest first, each with a signed URL
    pub async fn list(&self, prefix: &str, max_items: usize) -> Result<Vec<CatalogEntry>> {
        if max_items == 0 {
            return Ok(Vec::new());
        }

        let listing = self.backend.list_objects(prefix, max_items);
        let mut objects = match tokio::time::timeout(self.listing_timeout, listing).await {
            Ok(result) => result?,
            Err(_) => return Err(Error::BackendTimeout(self.listing_timeout)),
        };

        objects.sort_by(|a, b| b.last_modified.cmp(&a.last_modified));
        objects.truncate(max_items);

        let mut entries = Vec::with_capacity(objects.len());
        for object in objects {
            let request = SignedUrlRequest::new(Some(object.key.as_str()), self.url_expiry_secs)?;
            let signed_url = self.backend.presign_get(&request).await?;
            entries.push(CatalogEntry { object, signed_url });
        }

        tracing::debug!("Listed {} objects under {:?}", entries.len(), prefix);
        Ok(entries)
    }

    /// Sign a GET URL for `key`, valid for `expiry_secs`
    ///
    /// The key is validated before the backend is involved, and the object
    /// is not required to exist.
    pub async fn sign(&self, key: Option<&str>, expiry_secs: u32) -> Result<String> {
        let request = SignedUrlRequest::new(key, expiry_secs)?;
        self.backend.presign_get(&request).await
    }
}
