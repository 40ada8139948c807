//! Shared application state for the jobtrack service.

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use jobtrack_core::error::Result;

use crate::config::ServiceConfig;
use crate::obs::metrics::ServiceMetrics;
use crate::store::{InMemoryStore, KeyValueStore};
use crate::tracker::MetricsTracker;

#[derive(Clone)]
pub struct AppState {
    cfg: Arc<ServiceConfig>,
    tracker: MetricsTracker,
    metrics: Arc<ServiceMetrics>,
}

impl AppState {
    /// Build state over the bundled in-memory store.
    pub fn new(cfg: ServiceConfig) -> Self {
        Self::with_store(cfg, Arc::new(InMemoryStore::new()))
    }

    /// Build state over any store implementation.
    pub fn with_store(cfg: ServiceConfig, store: Arc<dyn KeyValueStore>) -> Self {
        let tracker = MetricsTracker::new(store, cfg.tracker.key_schema);
        tracing::info!(key_schema = ?cfg.tracker.key_schema, "tracker ready");
        Self {
            cfg: Arc::new(cfg),
            tracker,
            metrics: Arc::new(ServiceMetrics::default()),
        }
    }

    pub fn cfg(&self) -> &ServiceConfig {
        &self.cfg
    }

    pub fn tracker(&self) -> &MetricsTracker {
        &self.tracker
    }

    pub fn metrics(&self) -> Arc<ServiceMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Run one tracker call and record its outcome under `op`.
    pub async fn observe<T>(
        &self,
        op: &'static str,
        call: impl Future<Output = Result<T>>,
    ) -> Result<T> {
        let started = Instant::now();
        let res = call.await;
        let code = res.as_ref().err().map(|e| e.code().as_str());
        if let Err(e) = &res {
            tracing::warn!(op, error = %e, "tracker call failed");
        }
        self.metrics.record(op, started.elapsed(), code);
        res
    }
}
