use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use naas_core::models::{JobPayload, JobState};
use naas_core::{lockout, queue, validation};

use crate::auth::require_basic_auth;
use crate::error::ApiError;
use crate::state::AppState;

const APP_NAME: &str = "naas";
const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

fn base_envelope() -> serde_json::Map<String, Value> {
    let mut map = serde_json::Map::new();
    map.insert("app".to_string(), json!(APP_NAME));
    map.insert("version".to_string(), json!(APP_VERSION));
    map
}

#[utoipa::path(get, path = "/healthcheck", responses((status = 200, description = "Service health")))]
pub async fn healthcheck(State(state): State<AppState>) -> Json<Value> {
    let kv_ok = state.kv.ping().await;
    let queue_depth = queue::queue_depth(state.kv.as_ref()).await.unwrap_or(0);
    let worker_count: u64 = state
        .kv
        .get("naas_workers:count")
        .await
        .ok()
        .flatten()
        .and_then(|v| v.parse().ok())
        .unwrap_or(0);
    let worker_busy: u64 = state
        .kv
        .get("naas_workers:busy")
        .await
        .ok()
        .flatten()
        .and_then(|v| v.parse().ok())
        .unwrap_or(0);

    let status = if !kv_ok {
        "degraded"
    } else if worker_count == 0 {
        "no_workers"
    } else {
        "ok"
    };

    let mut body = base_envelope();
    body.insert("status".to_string(), json!(status));
    body.insert(
        "components".to_string(),
        json!({
            "kv": {"reachable": kv_ok},
            "queue": {"depth": queue_depth},
            "workers": {"count": worker_count, "busy": worker_busy},
        }),
    );
    Json(Value::Object(body))
}

async fn admit(
    state: &AppState,
    headers: &HeaderMap,
    request_id_header: Option<&str>,
    mut body: Value,
    is_config: bool,
) -> Result<(Uuid, String), ApiError> {
    let creds = require_basic_auth(headers)?;

    if lockout::tacacs_auth_lockout(state.kv.as_ref(), creds.username(), false, &state.config.lockout).await? {
        return Err(naas_core::Error::locked_out(creds.username()).into());
    }

    let used_alias = validation::apply_device_type_alias(&mut body);
    if used_alias {
        tracing::warn!(username = %creds.username(), "request used deprecated device_type alias for platform");
    }

    let payload = if is_config {
        let job: naas_core::models::ConfigJob =
            serde_json::from_value(body).map_err(|e| naas_core::Error::unprocessable(e.to_string()))?;
        validation::validate_config_job(&job)?;
        JobPayload::Config(job)
    } else {
        let job: naas_core::models::CommandJob =
            serde_json::from_value(body).map_err(|e| naas_core::Error::unprocessable(e.to_string()))?;
        validation::validate_command_job(&job)?;
        JobPayload::Command(job)
    };

    let job_id = validation::parse_request_id(request_id_header).unwrap_or_else(Uuid::new_v4);

    if queue::fetch(state.kv.as_ref(), job_id).await?.is_some() {
        return Err(naas_core::Error::BadRequest(format!("duplicate request id: {job_id}")).into());
    }

    if lockout::device_lockout(state.kv.as_ref(), payload.ip(), false, &state.config.lockout).await? {
        return Err(naas_core::Error::locked_out(payload.ip()).into());
    }

    let owner_hash = creds.salted_hash(state.kv.as_ref()).await?;
    let command_count = payload.commands().len();
    let ip = payload.ip().to_string();
    let platform = payload.platform().to_string();
    let port = payload.port();
    let device_credentials = naas_core::Credentials::with_enable(
        creds.username(),
        creds.password(),
        payload.enable().map(str::to_string),
    );

    queue::enqueue(
        state.kv.as_ref(),
        job_id,
        payload,
        device_credentials,
        owner_hash.clone(),
        &state.config.queue,
        state.metrics.as_ref(),
    )
    .await?;

    naas_core::audit::emit(
        "job.submitted",
        &[
            ("ip", naas_core::audit::Field::Str(&ip)),
            ("platform", naas_core::audit::Field::Str(&platform)),
            ("port", naas_core::audit::Field::Int(port as i64)),
            ("command_count", naas_core::audit::Field::Int(command_count as i64)),
            ("user_hash", naas_core::audit::Field::Str(owner_hash.as_str())),
            ("request_id", naas_core::audit::Field::Str(&job_id.to_string())),
        ],
    )?;

    Ok((job_id, ip))
}

#[utoipa::path(
    post,
    path = "/v1/send_command",
    responses(
        (status = 202, description = "Job accepted and enqueued"),
        (status = 401, description = "Missing or invalid basic auth"),
        (status = 403, description = "Caller or device is locked out"),
        (status = 422, description = "Payload failed validation"),
    ),
)]
pub async fn send_command(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Result<Response, ApiError> {
    let request_id_header = headers.get("X-Request-ID").and_then(|v| v.to_str().ok()).map(str::to_string);
    let (job_id, _ip) = admit(&state, &headers, request_id_header.as_deref(), body, false).await?;
    Ok(submitted_response(job_id))
}

pub async fn send_config(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Result<Response, ApiError> {
    let request_id_header = headers.get("X-Request-ID").and_then(|v| v.to_str().ok()).map(str::to_string);
    let (job_id, _ip) = admit(&state, &headers, request_id_header.as_deref(), body, true).await?;
    Ok(submitted_response(job_id))
}

fn submitted_response(job_id: Uuid) -> Response {
    let mut body = base_envelope();
    body.insert("job_id".to_string(), json!(job_id));
    let mut response = (StatusCode::ACCEPTED, Json(Value::Object(body))).into_response();
    response
        .headers_mut()
        .insert("X-Request-ID", HeaderValue::from_str(&job_id.to_string()).unwrap());
    response
}

fn parse_job_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::BadJobId)
}

pub async fn get_job(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(raw_id): Path<String>,
) -> Result<Response, ApiError> {
    let job_id = parse_job_id(&raw_id)?;
    let creds = require_basic_auth(&headers)?;

    let job = match queue::fetch(state.kv.as_ref(), job_id).await? {
        Some(job) => job,
        None => {
            let mut body = base_envelope();
            body.insert("job_id".to_string(), json!(job_id));
            body.insert("status".to_string(), json!("not_found"));
            body.insert("results".to_string(), Value::Null);
            body.insert("error".to_string(), Value::Null);
            return Ok((StatusCode::NOT_FOUND, Json(Value::Object(body))).into_response());
        }
    };

    let caller_hash = creds.salted_hash(state.kv.as_ref()).await?;
    if caller_hash != job.owner_hash {
        return Err(naas_core::Error::LockedOut(format!("not the owner of job {job_id}")).into());
    }

    let mut body = base_envelope();
    body.insert("job_id".to_string(), json!(job_id));
    body.insert("status".to_string(), json!(job.state.as_str()));
    if matches!(job.state, JobState::Finished) {
        body.insert("results".to_string(), json!(job.result));
        body.insert("error".to_string(), json!(job.error));
    } else {
        body.insert("results".to_string(), Value::Null);
        body.insert("error".to_string(), Value::Null);
    }
    Ok(Json(Value::Object(body)).into_response())
}

pub async fn cancel_job(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(raw_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let job_id = parse_job_id(&raw_id)?;
    let creds = require_basic_auth(&headers)?;

    let job = queue::fetch(state.kv.as_ref(), job_id)
        .await?
        .ok_or_else(|| naas_core::Error::not_found(job_id.to_string()))?;

    let caller_hash = creds.salted_hash(state.kv.as_ref()).await?;
    if caller_hash != job.owner_hash {
        return Err(naas_core::Error::LockedOut(format!("not the owner of job {job_id}")).into());
    }

    queue::cancel(state.kv.as_ref(), job_id, &caller_hash, &state.config.queue).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub struct ListJobsQuery {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_per_page")]
    pub per_page: u32,
    pub status: Option<String>,
}

fn default_page() -> u32 {
    1
}

fn default_per_page() -> u32 {
    20
}

pub async fn list_jobs(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<ListJobsQuery>,
) -> Result<Json<Value>, ApiError> {
    require_basic_auth(&headers)?;

    let status = match &query.status {
        Some(raw) => Some(
            JobState::parse(raw)
                .ok_or_else(|| naas_core::Error::unprocessable(format!("unknown status '{raw}'")))?,
        ),
        None => None,
    };

    let (jobs, total) = queue::list_jobs(state.kv.as_ref(), query.page, query.per_page, status).await?;

    let jobs_json: Vec<Value> = jobs
        .into_iter()
        .map(|job| {
            json!({
                "job_id": job.id,
                "status": job.state.as_str(),
                "platform": job.payload.platform(),
                "ip": job.payload.ip(),
            })
        })
        .collect();

    let mut body = base_envelope();
    body.insert("jobs".to_string(), json!(jobs_json));
    body.insert(
        "pagination".to_string(),
        json!({"page": query.page, "per_page": query.per_page, "total": total}),
    );
    Ok(Json(Value::Object(body)))
}

pub async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    // queue_depth and workers_active are also updated in-process at the
    // enqueue/dequeue/busy-guard call sites, but those sites live in two
    // separate binaries (naas-server, naas-worker) with independent
    // registries; resync from the KV both processes already share so this
    // process's gauges never drift from whichever one last changed them.
    if let Ok(depth) = queue::queue_depth(state.kv.as_ref()).await {
        state.metrics.queue_depth.set(depth as f64);
    }
    if let Ok(Some(busy)) = state.kv.get("naas_workers:busy").await {
        if let Ok(busy) = busy.parse::<f64>() {
            state.metrics.workers_active.set(busy);
        }
    }

    (
        [("content-type", "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub async fn openapi_json() -> Json<Value> {
    Json(crate::openapi::document())
}
