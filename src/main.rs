//! Tone Shift - tone adjustment service
//!
//! Serves the tone API with a TTL/LRU cache in front of the Mistral API.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tracing::{info, warn};

use tone_shift::cache::CacheStore;
use tone_shift::logging::init_tracing;
use tone_shift::upstream::{MistralClient, Rewriter};
use tone_shift::{create_router, AppState, Config, ToneService};

/// Main entry point for the tone service.
///
/// # Startup Sequence
/// 1. Load `.env` and configuration from environment variables
/// 2. Initialize tracing
/// 3. Build the cache store and the Mistral client
/// 4. Start the background expiry sweep
/// 5. Serve HTTP until SIGINT/SIGTERM, then stop the sweep
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = Config::from_env();
    init_tracing(&config.logging);

    info!("Starting Tone Shift server");
    info!(
        "Configuration loaded: port={}, env={}, cache_enabled={}, cache_ttl={}ms, cache_max_size={}",
        config.server.port,
        config.server.environment,
        config.cache.enabled,
        config.cache.ttl.as_millis(),
        config.cache.max_size
    );

    let rewriter = Arc::new(MistralClient::lazy(&config.mistral));
    match rewriter.client().await {
        Ok(client) => info!(client = client.name(), model = %config.mistral.model, "Mistral client initialized"),
        Err(e) => warn!("Mistral client not available, tone requests will fail until it is: {}", e),
    }

    let store = CacheStore::new(config.cache.settings());
    let service = ToneService::new(store, rewriter, config.mistral.rewrite_options());
    let sweep = service.start_sweep().await;
    if sweep.is_some() {
        info!("Background cleanup task started");
    } else {
        info!("Caching disabled, cleanup task not started");
    }

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    let app = create_router(AppState::new(service, config));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("Server listening on http://{}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("server error")?;

    if let Some(sweep) = sweep {
        sweep.stop().await;
        info!("Cleanup task stopped");
    }

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }
}
