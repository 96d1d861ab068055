//! C3: sliding-window lockout. A per-subject failure counter over a
//! 10-minute window; the subject is locked once it accumulates
//! `failure_threshold` failures inside the window. Two independent
//! instantiations share the same mechanics: the TACACS user axis and
//! the device-IP axis.

use chrono::Utc;
use shared_config::LockoutConfig;
use uuid::Uuid;

use crate::audit;
use crate::error::Result;
use crate::kv::KvStore;

fn user_key(username: &str) -> String {
    format!("naas_failures_{}", username)
}

fn device_key(ip: &str) -> String {
    format!("naas_failures_device_{}", ip)
}

/// Prune expired members, optionally record one fresh failure, and
/// return the resulting cardinality. The prune-add-count sequence runs
/// as a single atomic round trip against the KV store so a concurrent
/// prune cannot erase a failure recorded immediately after it (see
/// [`KvStore::prune_add_count`]).
async fn check(kv: &dyn KvStore, key: &str, record_failure: bool, cfg: &LockoutConfig) -> Result<u64> {
    let now = Utc::now().timestamp() as f64;
    let window_start = now - cfg.window_seconds as f64;

    let token = Uuid::new_v4().to_string();
    let new_member = record_failure.then(|| (token.as_str(), now));

    kv.prune_add_count(key, window_start, new_member, cfg.window_seconds)
        .await
}

/// Recorded whenever the driver reports an authentication failure for
/// `username`. Checked in admission (check-only, `record_failure =
/// false`) before a job is allowed to enqueue.
pub async fn tacacs_auth_lockout(
    kv: &dyn KvStore,
    username: &str,
    record_failure: bool,
    cfg: &LockoutConfig,
) -> Result<bool> {
    let count = check(kv, &user_key(username), record_failure, cfg).await?;
    Ok(count >= cfg.failure_threshold)
}

/// Recorded on every non-auth connection failure against `ip`. Checked
/// (check-only) at admission time and inside the worker's failure
/// taxonomy. Emits `device.locked_out` the moment the threshold is
/// crossed.
pub async fn device_lockout(
    kv: &dyn KvStore,
    ip: &str,
    record_failure: bool,
    cfg: &LockoutConfig,
) -> Result<bool> {
    let count = check(kv, &device_key(ip), record_failure, cfg).await?;
    let locked = count >= cfg.failure_threshold;
    if locked {
        audit::emit(
            "device.locked_out",
            &[("ip", audit::Field::Str(ip)), ("failure_count", audit::Field::Int(count as i64))],
        )?;
    }
    Ok(locked)
}
