use std::sync::Arc;

use axum::{
    Json,
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use resume_site_core::models::WorkflowRunsResponse;
use resume_site_github::{GitHub, RetrieveOptions, retrieve};
use serde::Serialize;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

const NO_CACHE: &str = "no-cache, no-store, must-revalidate";

/// Recent workflow runs. Always 200: upstream failures are answered with fallback runs.
pub async fn get_workflows(State(github): State<Arc<GitHub>>) -> Json<WorkflowRunsResponse> {
    let options = RetrieveOptions::from(github.config());
    Json(retrieve(&*github, &options).await.into())
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    timestamp: String,
}

#[derive(Serialize)]
struct ReadyChecks {
    server: bool,
}

impl ReadyChecks {
    fn passed(&self) -> bool { self.server }
}

#[derive(Serialize)]
struct ReadyResponse {
    status: &'static str,
    checks: ReadyChecks,
    timestamp: String,
}

fn now() -> String {
    OffsetDateTime::now_utc().format(&Rfc3339).unwrap_or_else(|_| "[invalid]".to_string())
}

pub async fn health() -> Response {
    let body = HealthResponse { status: "healthy", timestamp: now() };
    ([(header::CACHE_CONTROL, NO_CACHE)], Json(body)).into_response()
}

pub async fn ready() -> Response {
    let checks = ReadyChecks { server: true };
    let (status, label) = if checks.passed() {
        (StatusCode::OK, "ready")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "not ready")
    };
    let body = ReadyResponse { status: label, checks, timestamp: now() };
    (status, [(header::CACHE_CONTROL, NO_CACHE)], Json(body)).into_response()
}
