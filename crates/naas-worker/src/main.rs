use std::sync::Arc;
use std::time::Duration;

use naas_core::kv::RedisKv;
use naas_core::metrics::Metrics;
use naas_worker::worker::{self, BusyCounter};
use naas_worker::logging;
use shared_config::AppConfig;
use tokio::signal;
use tokio::sync::watch;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().unwrap_or_else(|e| {
        eprintln!("failed to load configuration: {e}. Using defaults.");
        AppConfig::default()
    });

    logging::init_logging(&config);
    info!(?config.worker, "naas-worker starting");

    let kv: Arc<dyn naas_core::kv::KvStore> = Arc::new(RedisKv::connect(&config.redis.connection_url()).await?);
    let config = Arc::new(config);
    let metrics = Arc::new(Metrics::new().expect("metric registration is infallible for a fixed, well-formed set of metrics"));
    let busy = BusyCounter::new(metrics.clone());

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let mut workers = Vec::with_capacity(config.worker.pool_size);
    for _ in 0..config.worker.pool_size {
        workers.push(tokio::spawn(worker::run(
            kv.clone(),
            config.clone(),
            metrics.clone(),
            busy.clone(),
            shutdown_rx.clone(),
        )));
    }

    let census = tokio::spawn(run_census(kv.clone(), config.clone(), busy.clone(), shutdown_rx.clone()));

    shutdown_signal().await;
    info!("shutdown signal received, draining in-flight jobs");
    let _ = shutdown_tx.send(true);

    let drain = futures_join_all(workers);
    let _ = tokio::time::timeout(
        Duration::from_secs(config.worker.shutdown_timeout_seconds),
        drain,
    )
    .await;
    let _ = census.await;

    info!("naas-worker stopped");
    Ok(())
}

async fn futures_join_all(handles: Vec<tokio::task::JoinHandle<()>>) {
    for handle in handles {
        let _ = handle.await;
    }
}

/// Periodically publishes this process's worker count and busy count so
/// `naas-server`'s healthcheck can report on the pool it has no direct
/// handle to.
async fn run_census(
    kv: Arc<dyn naas_core::kv::KvStore>,
    config: Arc<AppConfig>,
    busy: BusyCounter,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut interval = tokio::time::interval(Duration::from_secs(5));
    loop {
        tokio::select! {
            _ = shutdown.changed() => {
                let _ = kv.set("naas_workers:count", "0").await;
                let _ = kv.set("naas_workers:busy", "0").await;
                return;
            }
            _ = interval.tick() => {
                let _ = kv.set("naas_workers:count", &config.worker.pool_size.to_string()).await;
                let _ = kv.set("naas_workers:busy", &busy.get().to_string()).await;
            }
        }
    }
}

async fn shutdown_signal() {
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
}
