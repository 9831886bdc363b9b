//! schedview - HTTP facade over cluster scheduling state
//!
//! Serves nodes, pods, Kueue local queues and resource flavors, and KAI
//! scheduler queues from either a live cluster or static fixtures.

use anyhow::Result;
use clap::Parser;
use facade_lib::{
    health::{ComponentStatus, HealthRegistry},
    source::{self, LiveSource},
    ClusterView, StructuredLogger,
};
use schedview_facade::{
    api::{self, AppState},
    config::FacadeConfig,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const FACADE_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser, Debug)]
#[command(name = "schedview", version, about = "HTTP facade over cluster scheduling state")]
struct Cli {
    /// Listen port, overrides SCHEDVIEW_PORT
    #[arg(long)]
    port: Option<u16>,

    /// Serve fixtures instead of the live cluster
    #[arg(long)]
    mock: bool,

    /// Fixture directory, overrides SCHEDVIEW_FIXTURES_DIR
    #[arg(long)]
    fixtures_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing with JSON output and env filter
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().json())
        .init();

    let cli = Cli::parse();

    let mut config = FacadeConfig::load()?;
    if let Some(port) = cli.port {
        config.port = port;
    }
    if let Some(dir) = cli.fixtures_dir {
        config.fixtures_dir = dir;
    }
    config.mock |= cli.mock;

    let source_name = if config.mock { "mock" } else { "live" };
    let logger = StructuredLogger::new(source_name);
    info!(mock = config.mock, fixtures_dir = %config.fixtures_dir.display(), "Facade configured");

    let health_registry = HealthRegistry::new();

    // A failed client is not fatal: live reads fail, job creation is skipped
    let client = if config.mock {
        None
    } else {
        let kubeconfig = config.kubeconfig_path();
        match source::connect(kubeconfig.as_deref()).await {
            Ok(client) => {
                logger.log_client_init(true, "connected");
                health_registry.record_client(Ok(())).await;
                probe_default_namespace(client.clone()).await;
                Some(client)
            }
            Err(e) => {
                let detail = format!("{:#}", e);
                logger.log_client_init(false, &detail);
                health_registry.record_client(Err(detail)).await;
                None
            }
        }
    };

    if config.mock {
        let status = health_registry.check_fixtures(&config.fixtures_dir).await;
        if status != ComponentStatus::Up {
            warn!(
                dir = %config.fixtures_dir.display(),
                status = ?status,
                "Fixture directory incomplete"
            );
        }
    }

    let sources = source::select(config.mock, client, &config.fixtures_dir);
    let view = ClusterView::new(sources);
    let app_state = Arc::new(AppState::new(view, health_registry));

    logger.log_startup(FACADE_VERSION, &format!("0.0.0.0:{}", config.port));

    let shutdown_logger = logger.clone();
    api::serve(config.port, app_state, async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for shutdown signal");
            std::future::pending::<()>().await;
        }
        shutdown_logger.log_shutdown("SIGINT received");
    })
    .await?;

    info!("Shutting down");
    Ok(())
}

/// Log the pod count of the default namespace as a connectivity check
async fn probe_default_namespace(client: kube::Client) {
    match LiveSource::new(Some(client)).default_namespace_pod_count().await {
        Ok(count) => info!(namespace = "default", pods = count, "Cluster reachable"),
        Err(e) => warn!(error = %e, "Failed to list pods in default namespace"),
    }
}
