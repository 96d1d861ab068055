use std::sync::Arc;

use naas_core::kv::RedisKv;
use naas_server::{logging, routes, state::AppState};
use shared_config::AppConfig;
use tokio::signal;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().unwrap_or_else(|e| {
        eprintln!("failed to load configuration: {e}. Using defaults.");
        AppConfig::default()
    });

    logging::init_logging(&config);
    info!(?config.server, "naas-server starting");

    let kv = RedisKv::connect(&config.redis.connection_url()).await?;
    let state = AppState::new(Arc::new(kv), config.clone());

    let app = routes::build(state);

    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!(address = %bind_addr, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(config.server.shutdown_timeout_seconds))
        .await?;

    info!("naas-server stopped");
    Ok(())
}

async fn shutdown_signal(_shutdown_timeout_seconds: u64) {
    let ctrl_c = async {
        signal::ctrl_c().await.expect("failed to install Ctrl+C handler");
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

    tracing::info!("shutdown signal received, draining in-flight requests");
}
