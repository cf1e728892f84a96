// src/config/app.rs
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::leaderboard::TopN;

pub const ENV_CONFIG_PATH: &str = "DASHBOARD_CONFIG_PATH";
pub const ENV_ENDPOINT: &str = "DASHBOARD_ENDPOINT";
pub const ENV_HTTP_TIMEOUT_SECS: &str = "DASHBOARD_HTTP_TIMEOUT_SECS";
pub const DEFAULT_CONFIG_PATH: &str = "config/dashboard.toml";

fn default_endpoint() -> String {
    "https://labdados.com/produtos".to_string()
}
fn default_http_timeout_secs() -> u64 {
    30
}
fn default_static_dir() -> String {
    "static".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Catalog URL queried with `regiao` / `ano`.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,
    /// Leaderboard size when the caller does not pass `top_n`.
    #[serde(default)]
    pub default_top_n: TopN,
    /// Directory served at `/` (dashboard page).
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            http_timeout_secs: default_http_timeout_secs(),
            default_top_n: TopN::DEFAULT,
            static_dir: default_static_dir(),
        }
    }
}

impl AppConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let p = path.as_ref();
        let data = std::fs::read_to_string(p)
            .with_context(|| format!("reading dashboard config from {}", p.display()))?;
        let cfg: AppConfig =
            toml::from_str(&data).with_context(|| format!("parsing {}", p.display()))?;
        Ok(cfg)
    }

    /// Resolve configuration:
    /// 1) $DASHBOARD_CONFIG_PATH (must exist)
    /// 2) config/dashboard.toml
    /// 3) built-in defaults
    ///
    /// then apply $DASHBOARD_ENDPOINT / $DASHBOARD_HTTP_TIMEOUT_SECS on top.
    pub fn load_default() -> Result<Self> {
        let mut cfg = if let Ok(p) = std::env::var(ENV_CONFIG_PATH) {
            let pb = PathBuf::from(p);
            if !pb.exists() {
                return Err(anyhow!("{ENV_CONFIG_PATH} points to non-existent path"));
            }
            Self::load_from_file(&pb)?
        } else {
            let fallback = PathBuf::from(DEFAULT_CONFIG_PATH);
            if fallback.exists() {
                Self::load_from_file(&fallback)?
            } else {
                Self::default()
            }
        };

        if let Ok(url) = std::env::var(ENV_ENDPOINT) {
            let url = url.trim();
            if !url.is_empty() {
                cfg.endpoint = url.to_string();
            }
        }
        if let Ok(raw) = std::env::var(ENV_HTTP_TIMEOUT_SECS) {
            cfg.http_timeout_secs = raw
                .trim()
                .parse()
                .with_context(|| format!("{ENV_HTTP_TIMEOUT_SECS} must be an integer"))?;
        }
        if cfg.http_timeout_secs == 0 {
            cfg.http_timeout_secs = default_http_timeout_secs();
        }

        Ok(cfg)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}
