//! `wps-statusd`
//!
//! Serves persisted execute-response status documents over HTTP.

use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use wps_status::config::ServiceConfig;
use wps_status::http::{router, AppState};

#[derive(Parser)]
#[command(name = "wps-statusd")]
#[command(about = "Serve WPS execute-response status documents", version)]
struct Cli {
    /// Path to the service config file (TOML)
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Override the bind address
    #[arg(long)]
    bind: Option<String>,

    /// Override the public server URL
    #[arg(long)]
    server_url: Option<String>,
}

impl Cli {
    /// CLI flags as the highest-precedence config layer.
    fn overrides(&self) -> Option<toml::Value> {
        let mut server = toml::map::Map::new();
        if let Some(bind) = &self.bind {
            server.insert("bind".to_string(), toml::Value::String(bind.clone()));
        }
        if let Some(url) = &self.server_url {
            server.insert("url".to_string(), toml::Value::String(url.clone()));
        }
        if server.is_empty() {
            return None;
        }

        let mut root = toml::map::Map::new();
        root.insert("server".to_string(), toml::Value::Table(server));
        Some(toml::Value::Table(root))
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let config = match ServiceConfig::load(cli.config.as_deref(), cli.overrides()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("configuration error: {}", e);
            process::exit(1);
        }
    };

    let addr = match config.bind_addr() {
        Ok(addr) => addr,
        Err(e) => {
            eprintln!("configuration error: {}", e);
            process::exit(1);
        }
    };

    let state = AppState {
        config: Arc::new(config),
    };

    tracing::info!(%addr, "serving status documents");

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            eprintln!("failed to bind {}: {}", addr, e);
            process::exit(1);
        }
    };

    let server = axum::serve(listener, router(state)).with_graceful_shutdown(shutdown_signal());
    if let Err(e) = server.await {
        eprintln!("server error: {}", e);
        process::exit(1);
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to install shutdown handler");
        return;
    }
    tracing::info!("shutting down");
}
