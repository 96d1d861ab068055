//! C7: the worker loop. Blocks on the queue, runs the job's SSH session
//! through the C10 driver adapter, and applies the failure taxonomy from
//! the design document's worker section — breaker fast-fail, auth
//! failures routed to the user-axis lockout without touching the
//! breaker, everything else routed to the device-axis lockout and the
//! breaker, with retry/backoff in between.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use naas_core::credentials::Credentials;
use naas_core::kv::KvStore;
use naas_core::metrics::Metrics;
use naas_core::models::{Job, JobPayload};
use naas_core::{audit, breaker, lockout, queue};
use naas_driver::device_connection::DeviceConfig;
use shared_config::AppConfig;
use tokio::sync::watch;

use crate::driver_adapter::{Driver, DriverError, NetsshDriver};

/// Delay, in seconds, before each retry after the attempt at that index
/// fails. `job.retry_budget` (from `QueueConfig::max_retries`) caps the
/// number of attempts at 5, so the last entry is never consumed.
const RETRY_BACKOFF_SECONDS: [u64; 5] = [1, 2, 4, 8, 16];

/// Tracks how many of this process's worker tasks are mid-job, so
/// `naas-server`'s healthcheck (via the KV census keys) and this
/// process's own `workers_active` gauge stay in sync with reality.
#[derive(Clone)]
pub struct BusyCounter {
    count: Arc<AtomicUsize>,
    metrics: Arc<Metrics>,
}

impl BusyCounter {
    pub fn new(metrics: Arc<Metrics>) -> Self {
        Self {
            count: Arc::new(AtomicUsize::new(0)),
            metrics,
        }
    }

    pub fn get(&self) -> usize {
        self.count.load(Ordering::Relaxed)
    }

    fn guard(&self) -> BusyGuard<'_> {
        let busy = self.count.fetch_add(1, Ordering::Relaxed) + 1;
        self.metrics.workers_active.set(busy as f64);
        BusyGuard {
            count: &self.count,
            metrics: &self.metrics,
        }
    }
}

struct BusyGuard<'a> {
    count: &'a AtomicUsize,
    metrics: &'a Metrics,
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        let busy = self.count.fetch_sub(1, Ordering::Relaxed) - 1;
        self.metrics.workers_active.set(busy as f64);
    }
}

/// One worker task: poll, process, repeat until told to shut down.
pub async fn run(
    kv: Arc<dyn KvStore>,
    config: Arc<AppConfig>,
    metrics: Arc<Metrics>,
    busy: BusyCounter,
    mut shutdown: watch::Receiver<bool>,
) {
    loop {
        if *shutdown.borrow() {
            return;
        }

        let next = tokio::select! {
            _ = shutdown.changed() => return,
            popped = queue::pop_next_queued(kv.as_ref(), &config.queue, metrics.as_ref()) => popped,
        };

        match next {
            Ok(Some(job)) => {
                let _guard = busy.guard();
                process_job(&kv, &config, job).await;
            }
            Ok(None) => {
                tokio::time::sleep(Duration::from_millis(config.worker.poll_interval_millis)).await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to pop next queued job");
                tokio::time::sleep(Duration::from_millis(config.worker.poll_interval_millis)).await;
            }
        }
    }
}

async fn process_job(kv: &Arc<dyn KvStore>, config: &Arc<AppConfig>, mut job: Job) {
    let ip = job.payload.ip().to_string();
    let started = Instant::now();
    tracing::info!(job_id = %job.id, %ip, platform = %job.payload.platform(), "starting job");

    match breaker::before_call(kv.as_ref(), &ip, &config.breaker).await {
        Ok(breaker::Decision::Reject) => {
            let _ = lockout::device_lockout(kv.as_ref(), &ip, true, &config.lockout).await;
            let error = format!("Circuit breaker open for device {ip} - too many recent failures");
            finish_job(kv, config, &mut job, None, Some(error), started, "finished").await;
            return;
        }
        Err(err) => {
            tracing::error!(job_id = %job.id, error = %err, "breaker lookup failed");
            finish_job(
                kv,
                config,
                &mut job,
                None,
                Some(format!("internal error consulting circuit breaker: {err}")),
                started,
                "failed",
            )
            .await;
            return;
        }
        Ok(breaker::Decision::Allow) => {}
    }

    let attempts = job.retry_budget.max(1).min(RETRY_BACKOFF_SECONDS.len() as u32 + 1);
    let mut result: Option<HashMap<String, String>> = None;
    let mut last_error: Option<String> = None;
    let mut terminal_without_retry = false;

    for attempt in 0..attempts {
        if attempt > 0 {
            match breaker::before_call(kv.as_ref(), &ip, &config.breaker).await {
                Ok(breaker::Decision::Reject) => {
                    last_error =
                        Some(format!("Circuit breaker open for device {ip} - too many recent failures"));
                    terminal_without_retry = true;
                    break;
                }
                Err(err) => {
                    last_error = Some(format!("internal error consulting circuit breaker: {err}"));
                    break;
                }
                Ok(breaker::Decision::Allow) => {}
            }
            let backoff = RETRY_BACKOFF_SECONDS[(attempt - 1) as usize];
            tokio::time::sleep(Duration::from_secs(backoff)).await;
        }

        match run_session(config, &job).await {
            Ok(output) => {
                let _ = breaker::on_success(kv.as_ref(), &ip, &config.breaker).await;
                result = Some(output);
                last_error = None;
                break;
            }
            Err(DriverError::Auth(msg)) => {
                let _ = lockout::tacacs_auth_lockout(
                    kv.as_ref(),
                    job.credentials.username(),
                    true,
                    &config.lockout,
                )
                .await;
                last_error = Some(msg);
                terminal_without_retry = true;
                break;
            }
            Err(DriverError::Timeout(msg)) | Err(DriverError::Transport(msg)) => {
                let _ = lockout::device_lockout(kv.as_ref(), &ip, true, &config.lockout).await;
                let _ = breaker::on_failure(kv.as_ref(), &ip, &config.breaker).await;
                last_error = Some(msg);
                // Loop again (the re-raise-for-retry case) unless attempts are exhausted.
            }
            Err(DriverError::Unsupported(msg)) => {
                last_error = Some(msg);
                terminal_without_retry = true;
                break;
            }
        }
    }

    if let Some(output) = result {
        finish_job(kv, config, &mut job, Some(output), None, started, "finished").await;
    } else if terminal_without_retry {
        finish_job(kv, config, &mut job, None, last_error, started, "finished").await;
    } else {
        finish_job(
            kv,
            config,
            &mut job,
            None,
            Some(last_error.unwrap_or_else(|| "job failed with no recorded error".to_string())),
            started,
            "failed",
        )
        .await;
    }
}

async fn finish_job(
    kv: &Arc<dyn KvStore>,
    config: &Arc<AppConfig>,
    job: &mut Job,
    result: Option<HashMap<String, String>>,
    error: Option<String>,
    started: Instant,
    status: &str,
) {
    let outcome = if status == "finished" {
        queue::mark_finished(kv.as_ref(), job, result, error, &config.queue).await
    } else {
        queue::mark_failed(
            kv.as_ref(),
            job,
            error.unwrap_or_else(|| "unknown failure".to_string()),
            &config.queue,
        )
        .await
    };

    if let Err(err) = outcome {
        tracing::error!(job_id = %job.id, error = %err, "failed to persist terminal job state");
    }

    let duration_ms = started.elapsed().as_millis() as i64;
    if let Err(err) = audit::emit(
        "job.completed",
        &[
            ("request_id", audit::Field::Str(&job.id.to_string())),
            ("status", audit::Field::Str(status)),
            ("duration_ms", audit::Field::Int(duration_ms)),
        ],
    ) {
        tracing::error!(job_id = %job.id, error = %err, "failed to emit job.completed audit event");
    }
}

fn build_device_config(config: &AppConfig, payload: &JobPayload, credentials: &Credentials) -> DeviceConfig {
    DeviceConfig {
        host: payload.ip().to_string(),
        username: credentials.username().to_string(),
        password: Some(credentials.password().to_string()),
        device_type: payload.platform().to_string(),
        port: Some(payload.port()),
        timeout: Some(Duration::from_secs(config.driver.connection_timeout_seconds)),
        secret: Some(credentials.enable().to_string()),
        session_log: None,
    }
}

async fn run_session(config: &Arc<AppConfig>, job: &Job) -> Result<HashMap<String, String>, DriverError> {
    let device_config = build_device_config(config, &job.payload, &job.credentials);
    let payload = job.payload.clone();

    tokio::task::spawn_blocking(move || execute_session(device_config, payload))
        .await
        .unwrap_or_else(|join_err| Err(DriverError::Transport(format!("worker task panicked: {join_err}"))))
}

/// Blocking: runs entirely on a `spawn_blocking` thread since the
/// underlying driver is a synchronous, blocking-I/O trait.
fn execute_session(device_config: DeviceConfig, payload: JobPayload) -> Result<HashMap<String, String>, DriverError> {
    let mut driver = NetsshDriver::connect_device(device_config)?;
    driver.connect()?;

    let result = match &payload {
        JobPayload::Command(command_job) => {
            let mut map = HashMap::with_capacity(command_job.commands.len());
            for command in &command_job.commands {
                let output = driver.send_command(command)?;
                map.insert(command.clone(), output);
            }
            map
        }
        JobPayload::Config(config_job) => {
            let output = driver.send_config_set(config_job.commands.clone())?;
            let mut map = HashMap::new();
            map.insert("config_set_output".to_string(), output);

            if config_job.save_config {
                match driver.save_config() {
                    Ok(()) | Err(DriverError::Unsupported(_)) => {}
                    Err(err) => return Err(err),
                }
            }
            if config_job.commit {
                match driver.commit() {
                    Ok(()) | Err(DriverError::Unsupported(_)) => {}
                    Err(err) => return Err(err),
                }
            }
            map
        }
    };

    let _ = driver.disconnect();
    Ok(result)
}
