//! Dashboard Service
//!
//! Composes the forwarding config store and the recording catalog into the
//! operations exposed over HTTP. This is where backend failures are sorted
//! into the two policies: a failed listing degrades to an empty list, a
//! failed signing is reported to the caller.

use std::sync::Arc;

use serde::Serialize;

use crate::catalog::{CatalogEntry, ObjectCatalog, S3Backend, DEFAULT_URL_EXPIRY_SECS};
use crate::config::{CatalogConfig, DashboardConfig};
use crate::error::Result;
use crate::forward::{ConfigStore, ForwardConfig};

/// What the dashboard lists and how long its links live
#[derive(Debug, Clone)]
pub struct DashboardSettings {
    /// Key prefix of listed recordings
    pub prefix: String,
    /// Maximum number of recordings shown
    pub max_items: usize,
    /// Expiry of URLs produced by the presign redirect
    pub presign_expiry_secs: u32,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            prefix: "cleanfeed/".to_string(),
            max_items: 100,
            presign_expiry_secs: DEFAULT_URL_EXPIRY_SECS,
        }
    }
}

impl From<&CatalogConfig> for DashboardSettings {
    fn from(config: &CatalogConfig) -> Self {
        Self {
            prefix: config.prefix.clone(),
            max_items: config.max_items,
            presign_expiry_secs: DEFAULT_URL_EXPIRY_SECS,
        }
    }
}

/// Everything the dashboard page shows
#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub config: ForwardConfig,
    pub entries: Vec<CatalogEntry>,
    pub bucket: String,
    /// The listing failed and `entries` is empty because of it
    pub listing_failed: bool,
}

/// Dashboard operations
pub struct DashboardService {
    store: ConfigStore,
    catalog: ObjectCatalog,
    settings: DashboardSettings,
}

impl DashboardService {
    pub fn new(store: ConfigStore, catalog: ObjectCatalog, settings: DashboardSettings) -> Self {
        Self {
            store,
            catalog,
            settings,
        }
    }

    /// Wire up the S3 backend and config store described by `config`
    pub fn from_config(config: &DashboardConfig) -> Result<Self> {
        let backend = S3Backend::new(&config.storage)?;
        let catalog = ObjectCatalog::new(Arc::new(backend))
            .with_url_expiry(config.catalog.url_expiry_secs)
            .with_listing_timeout(config.listing_timeout());
        let store = ConfigStore::new(config.forward.path.clone());

        Ok(Self::new(store, catalog, DashboardSettings::from(&config.catalog)))
    }

    pub fn store(&self) -> &ConfigStore {
        &self.store
    }

    /// Current forwarding config and the most recent recordings
    pub async fn view_dashboard(&self) -> DashboardView {
        let config = self.store.read();

        let (entries, listing_failed) = match self
            .catalog
            .list(&self.settings.prefix, self.settings.max_items)
            .await
        {
            Ok(entries) => (entries, false),
            Err(e) => {
                tracing::warn!(
                    "Listing {:?} in bucket {} failed, showing no recordings: {}",
                    self.settings.prefix,
                    self.catalog.bucket(),
                    e
                );
                (Vec::new(), true)
            }
        };

        DashboardView {
            config,
            entries,
            bucket: self.catalog.bucket().to_string(),
            listing_failed,
        }
    }

    /// Trim and persist a new forwarding config
    pub fn save_config(
        &self,
        rtmp_url: Option<&str>,
        stream_key: Option<&str>,
    ) -> Result<ForwardConfig> {
        let config = ForwardConfig::new(
            rtmp_url.unwrap_or_default().trim(),
            stream_key.unwrap_or_default().trim(),
        );
        self.store.write(&config)?;
        Ok(config)
    }

    /// Signed URL to redirect the operator to for `key`
    pub async fn presign_redirect(&self, key: Option<&str>) -> Result<String> {
        let url = self
            .catalog
            .sign(key, self.settings.presign_expiry_secs)
            .await?;
        tracing::debug!("Signed download URL for {:?}", key);
        Ok(url)
    }
}
