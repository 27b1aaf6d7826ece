mod adapters;
mod application;
mod config;
mod domain;
mod interface;
mod ports;

use std::future::Future;
use std::sync::Arc;

use tokio::sync::oneshot;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use adapters::{MemoryStore, SysfsConfig, SysfsCounterSource};
use application::{spawn_poller, NetworkMonitor};
use config::{Config, NetworkRules};
use domain::VendorTable;
use interface::http::create_router;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Load configuration
    let config = Config::from_env();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("nanonet={},tower_http=info", config.log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("🚀 Starting NanoNet v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: {:?}", config);

    let rules = NetworkRules::load(config.rules_path.as_deref())?;
    info!(
        hidden = rules.hide.len(),
        aliases = rules.aliases.len(),
        thresholds = rules.thresholds.len(),
        "✓ Network rules loaded"
    );

    let vendors = Arc::new(VendorTable::locate(config.oui_candidates()));
    if vendors.is_empty() {
        warn!("⚠ OUI database is empty, every vendor will be reported as unknown");
    }

    // Initialize adapters
    let counter_source = Arc::new(SysfsCounterSource::new(SysfsConfig::new(config.sys_path.clone())));
    let store = Arc::new(MemoryStore::new());

    let monitor = Arc::new(NetworkMonitor::new(counter_source, vendors, rules));
    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    let poller = spawn_poller(monitor.clone(), store.clone(), config.poll_interval(), shutdown_rx);

    info!("✓ Network poller started (every {}s)", config.poll_interval);

    // Create HTTP server
    let app = create_router(monitor, store);
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("✓ NanoNet listening on {}", addr);
    info!("  → API: http://localhost:{}/api/network", config.port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(tokio::signal::ctrl_c()))
        .await?;

    if shutdown_tx.send(()).is_err() {
        warn!("Network poller already stopped");
    }
    if let Err(e) = poller.await {
        warn!(error = %e, "Network poller terminated abnormally");
    }

    Ok(())
}

/// Resolves when `signal` fires; if the handler cannot be installed, waits
/// forever instead of stopping the server
async fn shutdown_signal(signal: impl Future<Output = std::io::Result<()>>) {
    match signal.await {
        Ok(()) => info!("Received shutdown signal"),
        Err(e) => {
            warn!(error = %e, "Cannot listen for shutdown signal");
            std::future::pending::<()>().await;
        }
    }
}
