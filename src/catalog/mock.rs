//! Mock storage backend for unit testing.
//!
//! Serves a fixed set of objects and produces deterministic fake signed URLs,
//! with switches for simulating outages and slow responses.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};

use crate::error::{Error, Result};
use super::backend::ObjectBackend;
use super::object::{SignedUrlRequest, StoredObject};

/// Build a stored object modified `secs` seconds after the Unix epoch
pub(crate) fn object(key: &str, size_bytes: u64, secs: i64) -> StoredObject {
    StoredObject {
        key: key.to_string(),
        size_bytes,
        last_modified: Utc.timestamp_opt(secs, 0).unwrap(),
    }
}

/// In-memory [`ObjectBackend`]
#[derive(Default)]
pub(crate) struct MockBackend {
    objects: Vec<StoredObject>,
    fail_listing: bool,
    fail_signing: bool,
    ignore_max_keys: bool,
    list_delay: Option<Duration>,
    list_calls: AtomicUsize,
    presign_calls: AtomicUsize,
}

impl MockBackend {
    pub(crate) fn with_objects(objects: Vec<StoredObject>) -> Self {
        Self {
            objects,
            ..Self::default()
        }
    }

    /// Every listing call fails as if the service were unreachable
    pub(crate) fn failing() -> Self {
        Self {
            fail_listing: true,
            ..Self::default()
        }
    }

    pub(crate) fn fail_signing(mut self) -> Self {
        self.fail_signing = true;
        self
    }

    /// Return every matching object regardless of the requested page size
    pub(crate) fn ignore_max_keys(mut self) -> Self {
        self.ignore_max_keys = true;
        self
    }

    pub(crate) fn slow(mut self, delay: Duration) -> Self {
        self.list_delay = Some(delay);
        self
    }

    pub(crate) fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn presign_calls(&self) -> usize {
        self.presign_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ObjectBackend for MockBackend {
    fn bucket_name(&self) -> &str {
        "mock-bucket"
    }

    async fn list_objects(&self, prefix: &str, max_keys: usize) -> Result<Vec<StoredObject>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);

        if let Some(delay) = self.list_delay {
            tokio::time::sleep(delay).await;
        }

        if self.fail_listing {
            return Err(Error::BackendUnavailable("connection refused".into()));
        }

        // S3 pages are ordered by key
        let mut matching: Vec<StoredObject> = self
            .objects
            .iter()
            .filter(|o| o.key.starts_with(prefix))
            .cloned()
            .collect();
        matching.sort_by(|a, b| a.key.cmp(&b.key));
        if !self.ignore_max_keys {
            matching.truncate(max_keys);
        }
        Ok(matching)
    }

    async fn presign_get(&self, request: &SignedUrlRequest) -> Result<String> {
        self.presign_calls.fetch_add(1, Ordering::SeqCst);

        if self.fail_signing {
            return Err(Error::BackendUnavailable("signing key unavailable".into()));
        }

        Ok(format!(
            "https://mock.example/{}/{}?X-Amz-Expires={}",
            self.bucket_name(),
            request.key,
            request.expiry_secs
        ))
    }
}
