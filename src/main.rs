//! Cleanfeed Dashboard - Single-operator control panel
//!
//! Serves the forwarding settings form and the recording browser for a
//! Cleanfeed recording host.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cleanfeed_dashboard::api::HttpServer;
use cleanfeed_dashboard::config::DashboardConfig;
use cleanfeed_dashboard::dashboard::DashboardService;
use cleanfeed_dashboard::error::{Error, Result};

/// Cleanfeed Dashboard - Single-operator control panel
#[derive(Parser)]
#[command(name = "cleanfeed-dashboard")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Optional TOML configuration file; environment variables take precedence
    #[arg(short, long, env = "DASH_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the dashboard HTTP server
    Serve,

    /// Validate configuration without starting the server
    Validate,

    /// Write a sample configuration file
    Init {
        /// Output path for configuration file
        #[arg(short, long, default_value = "dashboard.toml")]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(&cli.log_level);

    match cli.command {
        Commands::Serve => run_serve(cli.config.as_deref()).await,
        Commands::Validate => run_validate(cli.config.as_deref()),
        Commands::Init { output } => run_init(output),
    }
}

fn init_logging(level: &str) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| level.into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn load_config(config_path: Option<&Path>) -> Result<DashboardConfig> {
    match DashboardConfig::load(config_path) {
        Ok(config) => Ok(config),
        Err(Error::ConfigurationMissing(names)) => {
            for name in &names {
                tracing::error!("Required environment variable {} is not set", name);
            }
            Err(Error::ConfigurationMissing(names))
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            Err(e)
        }
    }
}

/// Start the dashboard
async fn run_serve(config_path: Option<&Path>) -> Result<()> {
    tracing::info!("Starting Cleanfeed dashboard...");

    let config = load_config(config_path)?;
    let service = DashboardService::from_config(&config)?;
    tracing::info!(
        "Serving bucket {} (prefix {:?}), forwarding config at {:?}",
        config.storage.bucket,
        config.catalog.prefix,
        config.forward.path
    );

    let server = HttpServer::new(config.bind_address(), service, config.auth.clone());

    tokio::select! {
        result = server.start() => {
            if let Err(e) = result {
                tracing::error!("HTTP server error: {}", e);
                return Err(e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Received shutdown signal");
        }
    }

    tracing::info!("Dashboard stopped");
    Ok(())
}

/// Validate configuration
fn run_validate(config_path: Option<&Path>) -> Result<()> {
    match DashboardConfig::load(config_path) {
        Ok(config) => {
            println!("✓ Configuration is valid");
            println!("  Listen Address: {}", config.bind_address());
            println!("  Operator:       {}", config.auth.username);
            println!("  Bucket:         {} ({})", config.storage.bucket, config.storage.region);
            println!("  Endpoint:       {}", config.storage.endpoint);
            println!("  Prefix:         {}", config.catalog.prefix);
            println!("  URL Expiry:     {}s", config.catalog.url_expiry_secs);
            println!("  Forward Config: {}", config.forward.path.display());
            Ok(())
        }
        Err(e) => {
            eprintln!("✗ Configuration error: {}", e);
            Err(e)
        }
    }
}

/// Write a sample configuration file
fn run_init(output: PathBuf) -> Result<()> {
    if output.exists() {
        return Err(Error::Config(format!(
            "{} already exists, refusing to overwrite",
            output.display()
        )));
    }

    let config_content = r#"# Cleanfeed Dashboard Configuration
# Every value can be overridden by the matching environment variable.

[auth]
# DASH_USER / DASH_PASS
username = "operator"
password = "changeme"

[storage]
# SPACES_ACCESS_KEY / SPACES_SECRET_KEY / SPACES_REGION / SPACES_BUCKET / SPACES_ENDPOINT
access_key = ""
secret_key = ""
region = "nyc3"
bucket = "recordings"
endpoint = "https://nyc3.digitaloceanspaces.com"

[server]
# DASH_PORT, then PORT
bind_host = "0.0.0.0"
port = 3000

[catalog]
prefix = "cleanfeed/"
max_items = 100
url_expiry_secs = 3600
listing_timeout_secs = 5

[forward]
# FORWARD_CONFIG_PATH
path = "config/forward.env"
"#;

    std::fs::write(&output, config_content)?;
    println!("Configuration written to {:?}", output);
    println!();
    println!("Next steps:");
    println!("  1. Fill in the storage credentials in {:?}", output);
    println!("  2. Change the operator password");
    println!("  3. Run: cleanfeed-dashboard --config {:?} serve", output);

    Ok(())
}
