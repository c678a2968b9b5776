//! Recording Catalog Module
//!
//! Lists recordings from S3-compatible object storage and signs
//! time-limited download URLs for them.

mod backend;
mod object;
mod service;

#[cfg(test)]
pub(crate) mod mock;

pub use backend::{ObjectBackend, S3Backend};
pub use object::{format_file_size, CatalogEntry, SignedUrlRequest, StoredObject};
pub use service::{ObjectCatalog, DEFAULT_LISTING_TIMEOUT, DEFAULT_URL_EXPIRY_SECS};
