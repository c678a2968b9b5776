//! Dashboard Configuration
//!
//! Configuration is resolved once at startup: an optional TOML file provides
//! base values, environment variables override them, and validation reports
//! every required input that is still missing.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Error, Result};

/// Operator username
pub const ENV_DASH_USER: &str = "DASH_USER";
/// Operator password
pub const ENV_DASH_PASS: &str = "DASH_PASS";
/// Object storage access key
pub const ENV_SPACES_ACCESS_KEY: &str = "SPACES_ACCESS_KEY";
/// Object storage secret key
pub const ENV_SPACES_SECRET_KEY: &str = "SPACES_SECRET_KEY";
/// Object storage region
pub const ENV_SPACES_REGION: &str = "SPACES_REGION";
/// Object storage bucket
pub const ENV_SPACES_BUCKET: &str = "SPACES_BUCKET";
/// Object storage endpoint URL
pub const ENV_SPACES_ENDPOINT: &str = "SPACES_ENDPOINT";
/// Listening port, checked before `PORT`
pub const ENV_DASH_PORT: &str = "DASH_PORT";
/// Fallback listening port
pub const ENV_PORT: &str = "PORT";
/// Path of the forwarding config file
pub const ENV_FORWARD_CONFIG_PATH: &str = "FORWARD_CONFIG_PATH";

/// Longest expiry a SigV4 presigned URL may carry (7 days)
pub const MAX_URL_EXPIRY_SECS: u32 = 604_800;

/// Main dashboard configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Operator credentials
    #[serde(default)]
    pub auth: AuthConfig,

    /// Object storage connection
    #[serde(default)]
    pub storage: StorageConfig,

    /// HTTP server
    #[serde(default)]
    pub server: ServerConfig,

    /// Recording catalog behaviour
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Forwarding config file
    #[serde(default)]
    pub forward: ForwardFileConfig,
}

/// Operator credentials for HTTP Basic auth
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(default)]
    pub username: String,

    #[serde(default)]
    pub password: String,
}

/// S3-compatible object storage configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub access_key: String,

    #[serde(default)]
    pub secret_key: String,

    /// Region name, e.g. `nyc3`
    #[serde(default)]
    pub region: String,

    #[serde(default)]
    pub bucket: String,

    /// Endpoint URL, e.g. `https://nyc3.digitaloceanspaces.com`
    #[serde(default)]
    pub endpoint: String,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind
    #[serde(default = "default_bind_host")]
    pub bind_host: String,

    /// Port to bind
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Recording catalog configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Key prefix scoping the listed recordings
    #[serde(default = "default_prefix")]
    pub prefix: String,

    /// Maximum number of objects requested from the backend
    #[serde(default = "default_max_items")]
    pub max_items: usize,

    /// Lifetime of the signed URLs attached to listed entries in seconds.
    /// `/presign` redirects always use the one hour default.
    #[serde(default = "default_url_expiry_secs")]
    pub url_expiry_secs: u32,

    /// Upper bound on a single listing call in seconds
    #[serde(default = "default_listing_timeout_secs")]
    pub listing_timeout_secs: u64,
}

/// Forwarding config file location
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForwardFileConfig {
    #[serde(default = "default_forward_path")]
    pub path: PathBuf,
}

// Default value functions
fn default_bind_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_prefix() -> String {
    "cleanfeed/".to_string()
}

fn default_max_items() -> usize {
    100
}

fn default_url_expiry_secs() -> u32 {
    3600
}

fn default_listing_timeout_secs() -> u64 {
    5
}

fn default_forward_path() -> PathBuf {
    PathBuf::from("config/forward.env")
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_host: default_bind_host(),
            port: default_port(),
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            prefix: default_prefix(),
            max_items: default_max_items(),
            url_expiry_secs: default_url_expiry_secs(),
            listing_timeout_secs: default_listing_timeout_secs(),
        }
    }
}

impl Default for ForwardFileConfig {
    fn default() -> Self {
        Self {
            path: default_forward_path(),
        }
    }
}

impl DashboardConfig {
    /// Resolve configuration from an optional TOML file and the process environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with(path, |name| std::env::var(name).ok())
    }

    /// Resolve configuration using a custom variable lookup
    pub fn load_with<F>(path: Option<&Path>, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match path {
            Some(path) => {
                let content = std::fs::read_to_string(path)?;
                toml::from_str(&content)?
            }
            None => Self::default(),
        };
        config.apply_env(lookup)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML string without consulting the environment
    pub fn from_str(content: &str) -> Result<Self> {
        let config: DashboardConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Overlay non-empty variables onto the current values
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.is_empty());

        let targets: [(&str, &mut String); 7] = [
            (ENV_DASH_USER, &mut self.auth.username),
            (ENV_DASH_PASS, &mut self.auth.password),
            (ENV_SPACES_ACCESS_KEY, &mut self.storage.access_key),
            (ENV_SPACES_SECRET_KEY, &mut self.storage.secret_key),
            (ENV_SPACES_REGION, &mut self.storage.region),
            (ENV_SPACES_BUCKET, &mut self.storage.bucket),
            (ENV_SPACES_ENDPOINT, &mut self.storage.endpoint),
        ];
        for (name, field) in targets {
            if let Some(value) = get(name) {
                *field = value;
            }
        }

        if let Some((name, raw)) = [ENV_DASH_PORT, ENV_PORT]
            .into_iter()
            .find_map(|name| get(name).map(|v| (name, v)))
        {
            self.server.port = raw.trim().parse().map_err(|_| {
                Error::Config(format!("{} must be a port number, got {:?}", name, raw))
            })?;
        }

        if let Some(path) = get(ENV_FORWARD_CONFIG_PATH) {
            self.forward.path = PathBuf::from(path);
        }

        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        let required = [
            (ENV_DASH_USER, &self.auth.username),
            (ENV_DASH_PASS, &self.auth.password),
            (ENV_SPACES_ACCESS_KEY, &self.storage.access_key),
            (ENV_SPACES_SECRET_KEY, &self.storage.secret_key),
            (ENV_SPACES_REGION, &self.storage.region),
            (ENV_SPACES_BUCKET, &self.storage.bucket),
            (ENV_SPACES_ENDPOINT, &self.storage.endpoint),
        ];
        let missing: Vec<String> = required
            .iter()
            .filter(|(_, value)| value.is_empty())
            .map(|(name, _)| name.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(Error::ConfigurationMissing(missing));
        }

        if self.catalog.max_items == 0 {
            return Err(Error::Config("catalog.max_items must be at least 1".into()));
        }

        if self.catalog.url_expiry_secs == 0 || self.catalog.url_expiry_secs > MAX_URL_EXPIRY_SECS {
            return Err(Error::Config(format!(
                "catalog.url_expiry_secs must be between 1 and {}",
                MAX_URL_EXPIRY_SECS
            )));
        }

        if self.catalog.listing_timeout_secs == 0 {
            return Err(Error::Config("catalog.listing_timeout_secs cannot be 0".into()));
        }

        Ok(())
    }

    /// Get the HTTP bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.bind_host, self.server.port)
    }

    /// Get the listing timeout as Duration
    pub fn listing_timeout(&self) -> Duration {
        Duration::from_secs(self.catalog.listing_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn full_env() -> HashMap<&'static str, &'static str> {
        HashMap::from([
            (ENV_DASH_USER, "operator"),
            (ENV_DASH_PASS, "hunter2"),
            (ENV_SPACES_ACCESS_KEY, "AKID"),
            (ENV_SPACES_SECRET_KEY, "secret"),
            (ENV_SPACES_REGION, "nyc3"),
            (ENV_SPACES_BUCKET, "recordings"),
            (ENV_SPACES_ENDPOINT, "https://nyc3.digitaloceanspaces.com"),
        ])
    }

    fn lookup<'a>(
        env: &'a HashMap<&'static str, &'static str>,
    ) -> impl Fn(&str) -> Option<String> + 'a {
        move |name: &str| env.get(name).map(|v| v.to_string())
    }

    #[test]
    fn test_load_from_env() {
        let env = full_env();
        let config = DashboardConfig::load_with(None, lookup(&env)).unwrap();

        assert_eq!(config.auth.username, "operator");
        assert_eq!(config.storage.bucket, "recordings");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.catalog.prefix, "cleanfeed/");
        assert_eq!(config.catalog.max_items, 100);
        assert_eq!(config.catalog.url_expiry_secs, 3600);
        assert_eq!(config.forward.path, PathBuf::from("config/forward.env"));
        assert_eq!(config.bind_address(), "0.0.0.0:3000");
    }

    #[test]
    fn test_missing_inputs_are_all_reported() {
        let mut env = full_env();
        env.remove(ENV_DASH_PASS);
        env.remove(ENV_SPACES_ENDPOINT);
        env.insert(ENV_SPACES_BUCKET, "");

        let err = DashboardConfig::load_with(None, lookup(&env)).unwrap_err();
        match err {
            Error::ConfigurationMissing(names) => assert_eq!(
                names,
                vec!["DASH_PASS", "SPACES_BUCKET", "SPACES_ENDPOINT"]
            ),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_port_fallback_chain() {
        let mut env = full_env();
        env.insert(ENV_PORT, "8080");
        let config = DashboardConfig::load_with(None, lookup(&env)).unwrap();
        assert_eq!(config.server.port, 8080);

        env.insert(ENV_DASH_PORT, "9090");
        let config = DashboardConfig::load_with(None, lookup(&env)).unwrap();
        assert_eq!(config.server.port, 9090);

        env.insert(ENV_DASH_PORT, "not-a-port");
        assert!(matches!(
            DashboardConfig::load_with(None, lookup(&env)),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_env_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dashboard.toml");
        std::fs::write(
            &path,
            r#"
[auth]
username = "file-user"
password = "file-pass"

[storage]
bucket = "file-bucket"

[catalog]
max_items = 25
"#,
        )
        .unwrap();

        let env = full_env();
        let config = DashboardConfig::load_with(Some(&path), lookup(&env)).unwrap();
        assert_eq!(config.auth.username, "operator");
        assert_eq!(config.storage.bucket, "recordings");
        assert_eq!(config.catalog.max_items, 25);
        assert_eq!(config.catalog.listing_timeout_secs, 5);
    }

    #[test]
    fn test_parse_config() {
        let toml = r#"
[auth]
username = "operator"
password = "secret"

[storage]
access_key = "AKID"
secret_key = "secret"
region = "nyc3"
bucket = "recordings"
endpoint = "https://nyc3.digitaloceanspaces.com"

[server]
port = 4000

[catalog]
url_expiry_secs = 900
"#;

        let config = DashboardConfig::from_str(toml).unwrap();
        assert_eq!(config.server.port, 4000);
        assert_eq!(config.catalog.url_expiry_secs, 900);
        assert_eq!(config.listing_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_rejects_out_of_range_expiry() {
        let env = full_env();
        let mut config = DashboardConfig::load_with(None, lookup(&env)).unwrap();
        config.catalog.url_expiry_secs = MAX_URL_EXPIRY_SECS + 1;
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }
}
