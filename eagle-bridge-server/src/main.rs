use std::{net::SocketAddr, path::PathBuf, sync::Arc};

use anyhow::Context;
use clap::Parser;
use eagle_bridge_core::{EagleClient, HostApi, LibraryRegistry};
use eagle_bridge_server::{
    create_app,
    infra::{
        app_state::AppState,
        config::{Config, ConfigLoad, ConfigLoader, ConfigWarnings},
        net::local_ip_address,
    },
};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// CLI entry point
#[derive(Parser, Debug)]
#[command(name = "eagle-bridge")]
#[command(about = "Local gateway exposing Eagle libraries and images over HTTP")]
struct Cli {
    /// Path to an eagle-bridge.toml config file
    #[arg(long, env = "EAGLE_BRIDGE_CONFIG")]
    config: Option<PathBuf>,

    /// Server host (overrides config)
    #[arg(long, env = "SERVER_HOST")]
    host: Option<String>,

    /// Server port (overrides config)
    #[arg(short, long, env = "SERVER_PORT")]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let ConfigLoad { mut config, warnings } = match &cli.config {
        Some(path) => ConfigLoader::new().with_config_path(path.clone()),
        None => ConfigLoader::new(),
    }
    .load()
    .context("failed to load configuration")?;

    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(host) = cli.host {
        config.server.host = host;
    }

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    log_config_sources(&config, &warnings);

    let registry = match config.library.search_path.clone() {
        Some(root) => tokio::task::spawn_blocking(move || {
            LibraryRegistry::discover(&root)
        })
        .await
        .context("library discovery task failed")?,
        None => LibraryRegistry::empty(),
    };

    let host: Arc<dyn HostApi> = Arc::new(
        EagleClient::new(&config.host.base_url, config.host.timeout)
            .context("failed to build Eagle API client")?,
    );

    let config = Arc::new(config);
    let state = AppState::new(Arc::clone(&config), registry, host);
    let app = create_app(state);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .with_context(|| {
            format!(
                "invalid listen address {}:{}",
                config.server.host, config.server.port
            )
        })?;

    info!(
        "Starting Eagle Bridge on {}:{}",
        config.server.host, config.server.port
    );
    info!(
        "LAN address: http://{}:{}",
        local_ip_address(),
        config.server.port
    );

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

fn log_config_sources(config: &Config, warnings: &ConfigWarnings) {
    if config.metadata.env_file_loaded {
        info!("loaded .env file");
    }
    if let Some(path) = &config.metadata.config_path {
        info!(path = %path.display(), "loaded config file");
    }
    if let Some(path) = &config.metadata.settings_path {
        info!(path = %path.display(), "loaded legacy settings file");
    }

    for warning in &warnings.items {
        match &warning.hint {
            Some(hint) => {
                warn!(message = %warning.message, hint = %hint, "configuration warning")
            }
            None => warn!(message = %warning.message, "configuration warning"),
        }
    }

    info!(
        host_api = %config.host.base_url,
        timeout = ?config.host.timeout,
        public_base_url = %config.public_base_url(),
        stream_threshold_bytes = config.delivery.stream_threshold_bytes,
        "configuration ready"
    );
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
