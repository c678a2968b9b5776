//! Cleanfeed Dashboard - Single-operator control panel
//!
//! A small authenticated web dashboard for a Cleanfeed recording host. It
//! lets the operator edit where the live RTMP feed is forwarded and browse
//! the recordings stored in an S3-compatible bucket through short-lived
//! signed download links.
//!
//! # Architecture
//!
//! - [`forward`] persists the RTMP forwarding target as a flat `KEY=VALUE` file
//! - [`catalog`] lists recordings newest first and signs download URLs
//! - [`dashboard`] composes both and decides which failures are tolerated
//! - [`api`] exposes the dashboard over HTTP behind Basic auth

pub mod api;
pub mod catalog;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod forward;

pub use config::DashboardConfig;
pub use error::{Error, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::catalog::{CatalogEntry, ObjectBackend, ObjectCatalog, StoredObject};
    pub use crate::config::DashboardConfig;
    pub use crate::dashboard::{DashboardService, DashboardView};
    pub use crate::error::{Error, Result};
    pub use crate::forward::{ConfigStore, ForwardConfig};
}
