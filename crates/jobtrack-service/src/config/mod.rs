//! Service config loader (strict parsing).

pub mod schema;

use std::fs;

use jobtrack_core::error::{JobTrackError, Result};

pub use schema::{ServerSection, ServiceConfig, TrackerSection};

/// Environment variable overriding the config path.
pub const CONFIG_ENV: &str = "JOBTRACK_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "jobtrack.yaml";

pub fn load_from_file(path: &str) -> Result<ServiceConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| JobTrackError::Internal(format!("read config failed ({path}): {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<ServiceConfig> {
    let cfg: ServiceConfig = serde_yaml::from_str(s)
        .map_err(|e| JobTrackError::BadRequest(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Path from `JOBTRACK_CONFIG`, falling back to `jobtrack.yaml`.
pub fn config_path() -> String {
    std::env::var(CONFIG_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string())
}
