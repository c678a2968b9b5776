//! Catalog value types

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::MAX_URL_EXPIRY_SECS;
use crate::error::{Error, Result};

/// An object as reported by the storage backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredObject {
    pub key: String,
    pub size_bytes: u64,
    pub last_modified: DateTime<Utc>,
}

/// A listed object together with a ready-to-use download link
#[derive(Debug, Clone, Serialize)]
pub struct CatalogEntry {
    #[serde(flatten)]
    pub object: StoredObject,
    pub signed_url: String,
}

impl CatalogEntry {
    pub fn key(&self) -> &str {
        &self.object.key
    }

    /// Size formatted for display
    pub fn display_size(&self) -> String {
        format_file_size(self.object.size_bytes)
    }
}

/// A validated request to sign a download URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedUrlRequest {
    pub key: String,
    pub expiry_secs: u32,
}

impl SignedUrlRequest {
    /// Validate the key and expiry, rejecting empty keys
    pub fn new(key: Option<&str>, expiry_secs: u32) -> Result<Self> {
        let key = match key {
            Some(key) if !key.is_empty() => key,
            _ => return Err(Error::InvalidArgument("missing key".into())),
        };

        if expiry_secs == 0 || expiry_secs > MAX_URL_EXPIRY_SECS {
            return Err(Error::InvalidArgument(format!(
                "expiry must be between 1 and {} seconds, got {}",
                MAX_URL_EXPIRY_SECS, expiry_secs
            )));
        }

        Ok(Self {
            key: key.to_string(),
            expiry_secs,
        })
    }
}

const SIZE_UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

/// Format a byte count with binary units and at most one decimal
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 B".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < SIZE_UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let rounded = (value * 10.0).round() / 10.0;
    if rounded.fract() == 0.0 {
        format!("{:.0} {}", rounded, SIZE_UNITS[unit])
    } else {
        format!("{:.1} {}", rounded, SIZE_UNITS[unit])
    }
}
