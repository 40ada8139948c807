//! jobtrack service
//!
//! HTTP front for the job metrics tracker:
//! - config from `JOBTRACK_CONFIG` (default `jobtrack.yaml`), strict parsing
//! - in-memory store, key schema from config
//! - `/v1/jobs/...` API, `/metrics`, `/healthz`

use tracing_subscriber::{fmt, EnvFilter};

use jobtrack_core::error::{JobTrackError, Result};
use jobtrack_service::{app_state, config, router};

#[tokio::main]
async fn main() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    if let Err(e) = run().await {
        tracing::error!(error = %e, "jobtrack-service failed");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let path = config::config_path();
    let cfg = config::load_from_file(&path)?;
    let listen = cfg.server.listen_addr()?;

    let state = app_state::AppState::new(cfg);
    let app = router::build_router(state);

    tracing::info!(%listen, config = %path, "jobtrack-service starting");
    let listener = tokio::net::TcpListener::bind(listen)
        .await
        .map_err(|e| JobTrackError::Internal(format!("bind {listen} failed: {e}")))?;

    axum::serve(listener, app)
        .await
        .map_err(|e| JobTrackError::Internal(format!("server failed: {e}")))
}
