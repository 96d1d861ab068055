//! C0 bootstrap: structured logging. Mirrors the reference scheduler
//! crate's `tracing-subscriber` registry setup, but chooses its
//! formatting layer from `AppConfig.global.environment` rather than a
//! fixed file/json flag: JSON in `staging`/`production`, human-readable
//! in `dev`.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use shared_config::AppConfig;

pub fn init_logging(config: &AppConfig) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "{},tower_http=info,naas_driver=info,ssh2=warn",
            config.logging.level
        ))
    });

    let registry = tracing_subscriber::registry().with(env_filter);

    match config.global.environment.as_str() {
        "production" | "staging" => {
            registry.with(fmt::layer().json()).init();
        }
        _ => {
            registry.with(fmt::layer().pretty()).init();
        }
    }

    tracing::info!(
        environment = %config.global.environment,
        level = %config.logging.level,
        "logging initialized"
    );
}
