//! Axum router wiring.

use axum::routing::{get, post, put};
use axum::Router;

use crate::app_state::AppState;
use crate::http::{jobs, ops};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(ops::healthz))
        .route("/metrics", get(ops::metrics))
        .route("/v1/jobs/:job", get(jobs::status))
        .route("/v1/jobs/:job/running", put(jobs::set_running))
        .route("/v1/jobs/:job/metrics", get(jobs::metrics))
        .route("/v1/jobs/:job/ops/:op/duration", post(jobs::track_duration))
        .route("/v1/jobs/:job/ops/:op/count", post(jobs::track_count))
        .with_state(state)
}
