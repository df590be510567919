//! Telemetry configuration for the server bootstrap.

use anyhow::{Context, Result};
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TelemetryCfg {
    /// Tracing filter directive, e.g. "info" or "server_core=debug".
    #[serde(default)]
    pub log_level: Option<String>,
    /// Emit JSON log lines instead of human-readable ones.
    #[serde(default)]
    pub json_logs: Option<bool>,
}

impl TelemetryCfg {
    pub fn load_default() -> Result<Self> {
        let loaded = crate::loader::load_toml_opt::<Self>("config/telemetry.toml")
            .context("load telemetry config")?;
        Ok(loaded.unwrap_or_default())
    }
}
