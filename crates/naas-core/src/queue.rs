//! C5: the job queue. A job record lives as a JSON string under
//! `naas_job:<id>`; the four registries (queued/started/finished/failed)
//! are sorted sets scored by `created_at` so enumeration returns jobs in
//! submission order and supports offset/length pagination.

use chrono::Utc;
use shared_config::QueueConfig;
use uuid::Uuid;

use crate::audit;
use crate::credentials::{Credentials, SaltedHash};
use crate::error::{Error, Result};
use crate::kv::KvStore;
use crate::metrics::Metrics;
use crate::models::{Job, JobPayload, JobState};

fn job_key(id: Uuid) -> String {
    format!("naas_job:{}", id)
}

fn registry_key(state: JobState) -> &'static str {
    match state {
        JobState::Queued => "naas_registry:queued",
        JobState::Started => "naas_registry:started",
        JobState::Finished => "naas_registry:finished",
        JobState::Failed => "naas_registry:failed",
        JobState::Cancelled => "naas_registry:finished",
    }
}

const REGISTRIES: &[JobState] = &[
    JobState::Queued,
    JobState::Started,
    JobState::Finished,
    JobState::Failed,
];

/// Enqueue a new job. Either both the job record and its queued-registry
/// slot exist after this call, or neither does (the record write is
/// only observable once the registry add has also succeeded, since
/// nothing reads the record by scanning — all reads go through
/// [`fetch`] keyed on `id`).
pub async fn enqueue(
    kv: &dyn KvStore,
    id: Uuid,
    payload: JobPayload,
    credentials: Credentials,
    owner_hash: SaltedHash,
    cfg: &QueueConfig,
    metrics: &Metrics,
) -> Result<Job> {
    if kv.get(&job_key(id)).await?.is_some() {
        return Err(Error::BadRequest(format!("duplicate request id: {id}")));
    }

    let job = Job::new(id, payload, credentials, owner_hash, cfg.max_retries);
    let body = serde_json::to_string(&job)?;
    kv.set(&job_key(id), &body).await?;
    kv.zadd(registry_key(JobState::Queued), &id.to_string(), job.created_at.timestamp() as f64)
        .await?;
    metrics.queue_depth.set(kv.zcard(registry_key(JobState::Queued)).await? as f64);
    Ok(job)
}

pub async fn fetch(kv: &dyn KvStore, id: Uuid) -> Result<Option<Job>> {
    match kv.get(&job_key(id)).await? {
        Some(body) => Ok(Some(serde_json::from_str(&body)?)),
        None => Ok(None),
    }
}

async fn save(kv: &dyn KvStore, job: &Job) -> Result<()> {
    let body = serde_json::to_string(job)?;
    kv.set(&job_key(job.id), &body).await
}

/// Move `job` from `from` to `to` in the registries and persist its new
/// state, expiring the job record per `cfg`'s success/failure TTL once
/// it reaches a terminal state finished/failed (cancellation reuses the
/// finished registry and TTL, matching [`registry_key`]).
async fn transition(kv: &dyn KvStore, job: &mut Job, to: JobState, cfg: &QueueConfig) -> Result<()> {
    let from = job.state;
    kv.zrem(registry_key(from), &job.id.to_string()).await?;
    job.state = to;
    kv.zadd(registry_key(to), &job.id.to_string(), Utc::now().timestamp() as f64)
        .await?;
    save(kv, job).await?;

    if to.is_terminal() {
        let ttl = if matches!(to, JobState::Failed) {
            cfg.job_ttl_failed_seconds
        } else {
            cfg.job_ttl_success_seconds
        };
        kv.expire(&job_key(job.id), ttl as i64).await?;
    }
    Ok(())
}

pub async fn mark_started(kv: &dyn KvStore, job: &mut Job, cfg: &QueueConfig) -> Result<()> {
    job.started_at = Some(Utc::now());
    transition(kv, job, JobState::Started, cfg).await
}

pub async fn mark_finished(
    kv: &dyn KvStore,
    job: &mut Job,
    result: Option<std::collections::HashMap<String, String>>,
    error: Option<String>,
    cfg: &QueueConfig,
) -> Result<()> {
    job.ended_at = Some(Utc::now());
    job.result = result;
    job.error = error;
    transition(kv, job, JobState::Finished, cfg).await
}

pub async fn mark_failed(kv: &dyn KvStore, job: &mut Job, error: String, cfg: &QueueConfig) -> Result<()> {
    job.ended_at = Some(Utc::now());
    job.error = Some(error);
    transition(kv, job, JobState::Failed, cfg).await
}

/// Cancel a non-terminal job. Best-effort: if a worker has already
/// started the SSH session it runs to completion regardless; this only
/// suppresses a *future* start.
pub async fn cancel(kv: &dyn KvStore, id: Uuid, cancelled_by_hash: &SaltedHash, cfg: &QueueConfig) -> Result<()> {
    let mut job = fetch(kv, id).await?.ok_or_else(|| Error::not_found(id.to_string()))?;
    if job.state.is_terminal() {
        return Err(Error::Conflict(id.to_string()));
    }
    transition(kv, &mut job, JobState::Cancelled, cfg).await?;
    audit::emit(
        "job.cancelled",
        &[
            ("request_id", audit::Field::Str(&id.to_string())),
            ("cancelled_by_hash", audit::Field::Str(cancelled_by_hash.as_str())),
        ],
    )?;
    Ok(())
}

/// Pop the oldest queued job, if any, transitioning it straight to
/// `Started`. Used by the worker loop instead of a raw `fetch` so the
/// dequeue and the state flip are one caller-visible step.
pub async fn pop_next_queued(kv: &dyn KvStore, cfg: &QueueConfig, metrics: &Metrics) -> Result<Option<Job>> {
    let ids = kv.zrange(registry_key(JobState::Queued), 0, 1).await?;
    let Some(id_str) = ids.into_iter().next() else {
        return Ok(None);
    };
    let id = Uuid::parse_str(&id_str).map_err(|e| Error::Internal(e.to_string()))?;
    let Some(mut job) = fetch(kv, id).await? else {
        // Registry referenced a record that's since expired; drop the
        // stale entry and let the caller try again.
        kv.zrem(registry_key(JobState::Queued), &id_str).await?;
        return Ok(None);
    };
    if job.state != JobState::Queued {
        return Ok(None);
    }
    mark_started(kv, &mut job, cfg).await?;
    metrics.queue_depth.set(kv.zcard(registry_key(JobState::Queued)).await? as f64);
    Ok(Some(job))
}

pub async fn queue_depth(kv: &dyn KvStore) -> Result<u64> {
    kv.zcard(registry_key(JobState::Queued)).await
}

/// Page across the four registries in queued, started, finished, failed
/// order, stopping as soon as `per_page` ids have been collected so a
/// deep registry is never scanned once the page is full. `status`, when
/// given, restricts enumeration to that one registry.
pub async fn list_jobs(
    kv: &dyn KvStore,
    page: u32,
    per_page: u32,
    status: Option<JobState>,
) -> Result<(Vec<Job>, u64)> {
    if page < 1 || per_page < 1 {
        return Err(Error::unprocessable("page and per_page must be >= 1"));
    }

    let registries: Vec<JobState> = match status {
        Some(s) => vec![s],
        None => REGISTRIES.to_vec(),
    };

    let mut total = 0u64;
    for state in &registries {
        total += kv.zcard(registry_key(*state)).await?;
    }

    let wanted = (per_page as u64).min(u32::MAX as u64);
    let mut skip_remaining = ((page as u64 - 1) * per_page as u64) as i64;
    let mut jobs = Vec::new();

    for state in &registries {
        if jobs.len() as u32 >= per_page {
            break;
        }
        let count = kv.zcard(registry_key(*state)).await?;
        if (skip_remaining as u64) >= count {
            skip_remaining -= count as i64;
            continue;
        }
        let offset = skip_remaining.max(0) as u64;
        skip_remaining = 0;
        let remaining_room = wanted - jobs.len() as u64;
        let ids = kv.zrange(registry_key(*state), offset, remaining_room).await?;
        for id_str in ids {
            if jobs.len() as u32 >= per_page {
                break;
            }
            if let Ok(id) = Uuid::parse_str(&id_str) {
                if let Some(job) = fetch(kv, id).await? {
                    jobs.push(job);
                }
            }
        }
    }

    Ok((jobs, total))
}
