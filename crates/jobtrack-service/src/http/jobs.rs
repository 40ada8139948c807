use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::app_state::AppState;
use crate::http::ApiError;
use crate::tracker::{JobStatus, Metrics};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunningReq {
    pub running: bool,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DurationReq {
    pub duration_ms: u64,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CountReq {
    pub count: i64,
}

pub async fn status(
    State(state): State<AppState>,
    Path(job): Path<String>,
) -> Result<Json<JobStatus>, ApiError> {
    let status = state.observe("job_status", state.tracker().job_status(&job)).await?;
    Ok(Json(status))
}

pub async fn set_running(
    State(state): State<AppState>,
    Path(job): Path<String>,
    Json(req): Json<RunningReq>,
) -> Result<StatusCode, ApiError> {
    state
        .observe("track_running", state.tracker().track_running(&job, req.running))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn metrics(
    State(state): State<AppState>,
    Path(job): Path<String>,
) -> Result<Json<Metrics>, ApiError> {
    let metrics = state.observe("metrics", state.tracker().metrics(&job)).await?;
    Ok(Json(metrics))
}

pub async fn track_duration(
    State(state): State<AppState>,
    Path((job, op)): Path<(String, String)>,
    Json(req): Json<DurationReq>,
) -> Result<StatusCode, ApiError> {
    state
        .observe(
            "track_duration",
            state.tracker().track_duration(&job, &op, req.duration_ms),
        )
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn track_count(
    State(state): State<AppState>,
    Path((job, op)): Path<(String, String)>,
    Json(req): Json<CountReq>,
) -> Result<StatusCode, ApiError> {
    state
        .observe("track_count", state.tracker().track_count(&job, &op, req.count))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
