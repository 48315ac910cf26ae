mod catalog;
mod config;
mod server;
mod types;

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use catalog::{
    CatalogApi, CatalogClient, CatalogClientConfig, CourseCache, SubjectDirectory, TermResolver,
    COURSE_CACHE_CAPACITY,
};
use config::AppConfig;
use types::AppState;

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("fatal error: {e:#}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(version = VERSION, "starting coursepick");

    let config_path = env::var("COURSEPICK_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.json"));
    info!("loading configuration from {}", config_path.display());
    let config = AppConfig::load(&config_path)?;

    let catalog: Arc<dyn CatalogApi> = Arc::new(
        CatalogClient::new(CatalogClientConfig {
            endpoint: config.endpoint.clone(),
            token_endpoint: config.token_endpoint.clone(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
        })
        .context("failed to build catalog client")?,
    );
    info!(endpoint = %config.endpoint, "catalog client ready");

    let subjects = SubjectDirectory::load(catalog.as_ref())
        .await
        .context("failed to load subject directory")?;

    let state = Arc::new(AppState {
        catalog,
        term_resolver: TermResolver::new(),
        course_cache: CourseCache::new(COURSE_CACHE_CAPACITY),
        subjects,
    });

    let app = server::create_router(state);

    let addr: SocketAddr = format!("{}:{}", config.bind_address, config.port)
        .parse()
        .with_context(|| {
            format!(
                "invalid bind address {}:{}",
                config.bind_address, config.port
            )
        })?;
    info!("listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind to {addr}"))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("shut down cleanly");
    Ok(())
}

/// Waits for Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
