//! C4: per-device circuit breaker. State lives in C1 (a Redis hash) so
//! every worker process converges on the same view; parameters are
//! `fail_max` / `reset_timeout` from [`BreakerConfig`].
//!
//! Security-critical invariant: authentication failures never reach
//! this module. Only transport/SSH/protocol failures call
//! [`on_failure`]; auth failures feed C3 on the user axis exclusively
//! (see the worker's failure-taxonomy routing in `naas-worker`).

use chrono::Utc;
use shared_config::BreakerConfig;

use crate::audit;
use crate::error::Result;
use crate::kv::KvStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakerState {
    Closed,
    Open,
    HalfOpen,
}

impl BreakerState {
    fn as_str(&self) -> &'static str {
        match self {
            BreakerState::Closed => "closed",
            BreakerState::Open => "open",
            BreakerState::HalfOpen => "half-open",
        }
    }

    fn parse(s: &str) -> Self {
        match s {
            "open" => BreakerState::Open,
            "half-open" => BreakerState::HalfOpen,
            _ => BreakerState::Closed,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Breaker {
    pub state: BreakerState,
    pub counter: i64,
    pub success_counter: i64,
    pub opened_at: Option<i64>,
}

/// Whether a call against `ip` may proceed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Breaker is closed, or half-open and this call is the probe.
    Allow,
    /// Breaker is open and `reset_timeout` has not yet elapsed.
    Reject,
}

fn key(ip: &str) -> String {
    format!("circuit_breaker:device_{}", ip)
}

async fn load(kv: &dyn KvStore, ip: &str) -> Result<Breaker> {
    let fields = kv.hgetall(&key(ip)).await?;
    let state = fields
        .get("state")
        .map(|s| BreakerState::parse(s))
        .unwrap_or(BreakerState::Closed);
    let counter = fields.get("counter").and_then(|v| v.parse().ok()).unwrap_or(0);
    let success_counter = fields
        .get("success_counter")
        .and_then(|v| v.parse().ok())
        .unwrap_or(0);
    let opened_at = fields.get("opened_at").and_then(|v| v.parse().ok());

    Ok(Breaker {
        state,
        counter,
        success_counter,
        opened_at,
    })
}

async fn set_state(kv: &dyn KvStore, ip: &str, state: BreakerState) -> Result<()> {
    kv.hset(&key(ip), "state", state.as_str()).await
}

/// Decide whether a call against `ip` may proceed, transitioning
/// open -> half-open in place once `reset_timeout` has elapsed.
pub async fn before_call(kv: &dyn KvStore, ip: &str, cfg: &BreakerConfig) -> Result<Decision> {
    if !cfg.enabled {
        return Ok(Decision::Allow);
    }

    let breaker = load(kv, ip).await?;
    match breaker.state {
        BreakerState::Closed | BreakerState::HalfOpen => Ok(Decision::Allow),
        BreakerState::Open => {
            let now = Utc::now().timestamp();
            let opened_at = breaker.opened_at.unwrap_or(now);
            if now - opened_at >= cfg.reset_timeout_seconds {
                set_state(kv, ip, BreakerState::HalfOpen).await?;
                Ok(Decision::Allow)
            } else {
                Ok(Decision::Reject)
            }
        }
    }
}

/// Record a successful call. From half-open this closes the breaker and
/// emits `circuit.closed`; from closed it just resets the failure
/// counter.
pub async fn on_success(kv: &dyn KvStore, ip: &str, cfg: &BreakerConfig) -> Result<()> {
    if !cfg.enabled {
        return Ok(());
    }

    let breaker = load(kv, ip).await?;
    match breaker.state {
        BreakerState::HalfOpen => {
            set_state(kv, ip, BreakerState::Closed).await?;
            kv.hset(&key(ip), "counter", "0").await?;
            kv.hset(&key(ip), "success_counter", "0").await?;
            audit::emit(
                "circuit.closed",
                &[("ip", audit::Field::Str(ip))],
            )?;
        }
        BreakerState::Closed => {
            kv.hset(&key(ip), "counter", "0").await?;
            kv.hincrby(&key(ip), "success_counter", 1).await?;
        }
        BreakerState::Open => {}
    }
    Ok(())
}

/// Record a non-auth connection failure. Advances the counter; on
/// reaching `fail_max` from closed, or on any failure while half-open,
/// (re)opens the breaker and emits `circuit.opened`.
pub async fn on_failure(kv: &dyn KvStore, ip: &str, cfg: &BreakerConfig) -> Result<()> {
    if !cfg.enabled {
        return Ok(());
    }

    let breaker = load(kv, ip).await?;
    match breaker.state {
        BreakerState::HalfOpen => {
            open_breaker(kv, ip).await?;
        }
        BreakerState::Closed => {
            let counter = kv.hincrby(&key(ip), "counter", 1).await?;
            if counter >= cfg.failure_threshold as i64 {
                open_breaker(kv, ip).await?;
            }
        }
        BreakerState::Open => {}
    }
    Ok(())
}

async fn open_breaker(kv: &dyn KvStore, ip: &str) -> Result<()> {
    set_state(kv, ip, BreakerState::Open).await?;
    kv.hset(&key(ip), "opened_at", &Utc::now().timestamp().to_string())
        .await?;
    kv.hset(&key(ip), "success_counter", "0").await?;
    audit::emit("circuit.opened", &[("ip", audit::Field::Str(ip))])?;
    Ok(())
}

pub async fn get_state(kv: &dyn KvStore, ip: &str) -> Result<Breaker> {
    load(kv, ip).await
}
