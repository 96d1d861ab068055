use std::time::Instant;

use axum::extract::{MatchedPath, State};
use axum::http::{HeaderValue, Request};
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Legacy sunset date published alongside the unversioned aliases.
const LEGACY_SUNSET: &str = "Tue, 31 Dec 2026 00:00:00 GMT";

async fn mark_deprecated(request: Request<axum::body::Body>, next: Next) -> Response {
    let mut response = next.run(request).await;
    response
        .headers_mut()
        .insert("X-API-Deprecated", HeaderValue::from_static("true"));
    response
        .headers_mut()
        .insert("X-API-Sunset", HeaderValue::from_static(LEGACY_SUNSET));
    response
}

/// Records one `naas_request_duration_seconds` observation per request,
/// labelled by the route pattern (not the raw path, to keep cardinality
/// bounded), method, and response status.
async fn track_metrics(
    State(state): State<AppState>,
    matched_path: Option<MatchedPath>,
    request: Request<axum::body::Body>,
    next: Next,
) -> Response {
    let path = matched_path
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| request.uri().path().to_string());
    let method = request.method().to_string();
    let started = Instant::now();
    let response = next.run(request).await;
    state
        .metrics
        .observe_request(&path, &method, response.status().as_u16(), started.elapsed().as_secs_f64());
    response
}

pub fn build(state: AppState) -> Router {
    let canonical = Router::new()
        .route("/healthcheck", get(handlers::healthcheck))
        .route("/", get(handlers::healthcheck))
        .route("/v1/send_command", post(handlers::send_command))
        .route("/v1/send_config", post(handlers::send_config))
        .route("/v1/send_command/:job_id", get(handlers::get_job))
        .route("/v1/send_config/:job_id", get(handlers::get_job))
        .route("/v1/jobs/:job_id", delete(handlers::cancel_job))
        .route("/v1/jobs", get(handlers::list_jobs))
        .route("/apidoc/openapi.json", get(handlers::openapi_json))
        .route("/metrics", get(handlers::metrics));

    let legacy = Router::new()
        .route("/send_command", post(handlers::send_command))
        .route("/send_config", post(handlers::send_config))
        .route("/send_command/:job_id", get(handlers::get_job))
        .route("/send_config/:job_id", get(handlers::get_job))
        .layer(middleware::from_fn(mark_deprecated));

    canonical
        .merge(legacy)
        .layer(middleware::from_fn_with_state(state.clone(), track_metrics))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
