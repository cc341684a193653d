//! Daemon config loader (strict parsing).

pub mod duration;
pub mod schema;

use std::fs;
use std::path::Path;

use oscillo_core::error::{OscilloError, Result};

pub use duration::parse_duration;
pub use schema::{DaemonConfig, LogSection, SamplerSection, ServerSection};

pub fn load_from_file(path: &Path) -> Result<DaemonConfig> {
    let s = fs::read_to_string(path).map_err(|e| {
        OscilloError::InvalidConfig(format!("read config {} failed: {e}", path.display()))
    })?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<DaemonConfig> {
    let cfg: DaemonConfig = serde_yaml::from_str(s)
        .map_err(|e| OscilloError::InvalidConfig(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}
