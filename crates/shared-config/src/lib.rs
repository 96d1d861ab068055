use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SharedConfigError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Environment error: {0}")]
    Environment(String),
}

pub type Result<T> = std::result::Result<T, SharedConfigError>;

/// Settings shared by every crate in the workspace.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobalConfig {
    pub environment: String,
    pub log_level: String,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            environment: "dev".to_string(),
            log_level: "debug".to_string(),
        }
    }
}

/// Connection settings for the shared Redis-backed KV store (C1).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedisConfig {
    pub host: String,
    pub port: u16,
    pub password: Option<String>,
    pub pool_size: u32,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            host: "redis".to_string(),
            port: 6379,
            password: None,
            pool_size: 10,
        }
    }
}

impl RedisConfig {
    /// Standard `redis://[:password@]host:port` connection string.
    pub fn connection_url(&self) -> String {
        match &self.password {
            Some(pw) if !pw.is_empty() => {
                format!("redis://:{}@{}:{}", pw, self.host, self.port)
            }
            _ => format!("redis://{}:{}", self.host, self.port),
        }
    }
}

/// HTTP API tier settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub shutdown_timeout_seconds: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            shutdown_timeout_seconds: 30,
        }
    }
}

/// Worker tier settings (C7).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    pub pool_size: usize,
    pub poll_interval_millis: u64,
    pub shutdown_timeout_seconds: u64,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            pool_size: 20,
            poll_interval_millis: 250,
            shutdown_timeout_seconds: 30,
        }
    }
}

/// Queue retention and retry policy (C5).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueConfig {
    pub name: String,
    pub job_ttl_success_seconds: u64,
    pub job_ttl_failed_seconds: u64,
    pub max_retries: u32,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            name: "naas".to_string(),
            job_ttl_success_seconds: 86_400,
            job_ttl_failed_seconds: 604_800,
            max_retries: 5,
        }
    }
}

/// Sliding-window lockout policy (C3), shared by the user and device axes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockoutConfig {
    pub window_seconds: i64,
    pub failure_threshold: u64,
}

impl Default for LockoutConfig {
    fn default() -> Self {
        Self {
            window_seconds: 600,
            failure_threshold: 10,
        }
    }
}

/// Per-device circuit breaker policy (C4).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BreakerConfig {
    pub enabled: bool,
    pub failure_threshold: u32,
    pub reset_timeout_seconds: i64,
}

impl Default for BreakerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            failure_threshold: 5,
            reset_timeout_seconds: 300,
        }
    }
}

/// Defaults handed to the driver adapter (C10) when a job omits them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriverConfig {
    pub default_port: u16,
    pub connection_timeout_seconds: u64,
    pub command_timeout_seconds: u64,
    pub buffer_size: usize,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            default_port: 22,
            connection_timeout_seconds: 60,
            command_timeout_seconds: 10,
            buffer_size: 65536,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub file: Option<String>,
    pub format: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
            format: Some("text".to_string()),
        }
    }
}

/// Top-level configuration loaded once at process start and shared,
/// behind an `Arc`, by both the `naas-server` and `naas-worker` binaries.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    pub global: GlobalConfig,
    pub redis: RedisConfig,
    pub server: ServerConfig,
    pub worker: WorkerConfig,
    pub queue: QueueConfig,
    pub lockout: LockoutConfig,
    pub breaker: BreakerConfig,
    pub driver: DriverConfig,
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from defaults, an optional `config.toml` at the
    /// workspace root, and `NAAS_`-prefixed environment variables, in that
    /// order of increasing precedence.
    pub fn load() -> Result<Self> {
        // Best-effort: a `.env` file is a convenience for local/dev runs,
        // not a requirement, so a missing file is not an error.
        let _ = dotenvy::dotenv();

        let mut builder = Config::builder();

        if let Ok(workspace_root) = find_workspace_root() {
            let config_file = workspace_root.join("config.toml");
            if config_file.exists() {
                builder = builder.add_source(File::from(config_file));
            }
        }

        builder = builder.add_source(
            Environment::with_prefix("NAAS")
                .separator("_")
                .try_parsing(true),
        );

        let raw = builder.build()?;

        let environment = raw
            .get_string("global.environment")
            .or_else(|_| std::env::var("APP_ENVIRONMENT"))
            .unwrap_or_else(|_| "dev".to_string());
        let environment = normalize_environment(&environment);

        let default_log_level = if environment == "dev" { "debug" } else { "info" };

        Ok(AppConfig {
            global: GlobalConfig {
                environment: environment.clone(),
                log_level: raw
                    .get_string("global.log_level")
                    .unwrap_or_else(|_| default_log_level.to_string()),
            },
            redis: RedisConfig {
                host: raw
                    .get_string("redis.host")
                    .unwrap_or_else(|_| "redis".to_string()),
                port: raw.get_int("redis.port").unwrap_or(6379) as u16,
                password: raw.get_string("redis.password").ok(),
                pool_size: raw.get_int("redis.pool_size").unwrap_or(10) as u32,
            },
            server: ServerConfig {
                host: raw
                    .get_string("server.host")
                    .unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: raw.get_int("server.port").unwrap_or(8080) as u16,
                shutdown_timeout_seconds: raw
                    .get_int("server.shutdown_timeout_seconds")
                    .unwrap_or(30) as u64,
            },
            worker: WorkerConfig {
                pool_size: raw.get_int("worker.pool_size").unwrap_or(20) as usize,
                poll_interval_millis: raw.get_int("worker.poll_interval_millis").unwrap_or(250)
                    as u64,
                shutdown_timeout_seconds: raw
                    .get_int("worker.shutdown_timeout_seconds")
                    .unwrap_or(30) as u64,
            },
            queue: QueueConfig {
                name: raw
                    .get_string("queue.name")
                    .unwrap_or_else(|_| "naas".to_string()),
                job_ttl_success_seconds: raw
                    .get_int("queue.job_ttl_success_seconds")
                    .unwrap_or(86_400) as u64,
                job_ttl_failed_seconds: raw
                    .get_int("queue.job_ttl_failed_seconds")
                    .unwrap_or(604_800) as u64,
                max_retries: raw.get_int("queue.max_retries").unwrap_or(5) as u32,
            },
            lockout: LockoutConfig {
                window_seconds: raw.get_int("lockout.window_seconds").unwrap_or(600),
                failure_threshold: raw.get_int("lockout.failure_threshold").unwrap_or(10) as u64,
            },
            breaker: BreakerConfig {
                enabled: raw.get_bool("breaker.enabled").unwrap_or(true),
                failure_threshold: raw.get_int("breaker.failure_threshold").unwrap_or(5) as u32,
                reset_timeout_seconds: raw
                    .get_int("breaker.reset_timeout_seconds")
                    .unwrap_or(300),
            },
            driver: DriverConfig {
                default_port: raw.get_int("driver.default_port").unwrap_or(22) as u16,
                connection_timeout_seconds: raw
                    .get_int("driver.connection_timeout_seconds")
                    .unwrap_or(60) as u64,
                command_timeout_seconds: raw
                    .get_int("driver.command_timeout_seconds")
                    .unwrap_or(10) as u64,
                buffer_size: raw.get_int("driver.buffer_size").unwrap_or(65536) as usize,
            },
            logging: LoggingConfig {
                level: raw
                    .get_string("logging.level")
                    .unwrap_or_else(|_| default_log_level.to_string()),
                file: raw.get_string("logging.file").ok(),
                format: raw.get_string("logging.format").ok(),
            },
        })
    }
}

/// `dev` / `staging` / `production` only; anything else falls back to `dev`
/// with a logged warning, matching the original service's `app_configure`.
fn normalize_environment(raw: &str) -> String {
    match raw {
        "dev" | "staging" | "production" => raw.to_string(),
        other => {
            tracing::warn!(
                value = %other,
                "Unrecognized APP_ENVIRONMENT, falling back to 'dev'"
            );
            "dev".to_string()
        }
    }
}

/// Find the workspace root directory by looking for a Cargo.toml declaring
/// `[workspace]`.
fn find_workspace_root() -> Result<PathBuf> {
    let mut current_dir = std::env::current_dir()?;

    loop {
        let cargo_toml = current_dir.join("Cargo.toml");
        if cargo_toml.exists() {
            let content = std::fs::read_to_string(&cargo_toml)?;
            if content.contains("[workspace]") {
                return Ok(current_dir);
            }
        }

        if let Some(parent) = current_dir.parent() {
            current_dir = parent.to_path_buf();
        } else {
            break;
        }
    }

    Err(SharedConfigError::Environment(
        "Could not find workspace root directory".to_string(),
    ))
}
