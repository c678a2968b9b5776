//! Forwarding Configuration Module
//!
//! The RTMP destination and stream key consumed by the streaming process,
//! persisted as a flat `KEY=VALUE` file.

mod store;

pub use store::{ConfigStore, RTMP_URL_KEY, STREAM_KEY_KEY};

use serde::{Deserialize, Serialize};

/// RTMP forwarding target
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForwardConfig {
    /// RTMP destination URL, e.g. `rtmp://live.example.com/app`
    pub rtmp_url: String,
    /// Stream key appended by the streaming process
    pub stream_key: String,
}

impl ForwardConfig {
    /// Create a forwarding config
    pub fn new(rtmp_url: impl Into<String>, stream_key: impl Into<String>) -> Self {
        Self {
            rtmp_url: rtmp_url.into(),
            stream_key: stream_key.into(),
        }
    }

    /// Check whether a destination has been configured
    pub fn is_configured(&self) -> bool {
        !self.rtmp_url.is_empty()
    }
}
