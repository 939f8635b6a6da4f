//! Server configuration.
//!
//! Values come from `SPECRUNNER_*` environment variables first; the
//! `spec-server` binary then applies its command-line flags on top. Nothing
//! here touches the filesystem; paths are checked when the server is built.

use crate::render::DEFAULT_STATIC_URL;
use anyhow::{Context, Result, bail};
use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

pub const DEFAULT_BIND: &str = "127.0.0.1:8000";

pub const ENV_BIND: &str = "SPECRUNNER_BIND";
pub const ENV_SUITES: &str = "SPECRUNNER_SUITES";
pub const ENV_STATIC_ROOT: &str = "SPECRUNNER_STATIC_ROOT";
pub const ENV_TEMPLATES: &str = "SPECRUNNER_TEMPLATES";
pub const ENV_STATIC_URL: &str = "SPECRUNNER_STATIC_URL";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind: SocketAddr,
    /// Suite manifest; `None` serves the compiled-in table.
    pub suites: Option<PathBuf>,
    /// Directory served under `/static/`.
    pub static_root: Option<PathBuf>,
    /// Template overrides layered over the built-in layouts.
    pub templates: Option<PathBuf>,
    /// Prefix layouts put in front of source and spec paths.
    pub static_url: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 8000)),
            suites: None,
            static_root: None,
            templates: None,
            static_url: DEFAULT_STATIC_URL.to_string(),
        }
    }
}

impl ServerConfig {
    /// Defaults overlaid with `SPECRUNNER_*` variables from the process.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Defaults overlaid with whatever `lookup` returns for each variable.
    ///
    /// Blank values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();
        if let Some(raw) = get(ENV_BIND) {
            config.bind = parse_bind(&raw).with_context(|| format!("{ENV_BIND}={raw}"))?;
        }
        config.suites = get(ENV_SUITES).map(PathBuf::from);
        config.static_root = get(ENV_STATIC_ROOT).map(PathBuf::from);
        config.templates = get(ENV_TEMPLATES).map(PathBuf::from);
        if let Some(raw) = get(ENV_STATIC_URL) {
            config.static_url =
                normalize_static_url(&raw).with_context(|| format!("{ENV_STATIC_URL}={raw}"))?;
        }
        Ok(config)
    }
}

pub fn parse_bind(raw: &str) -> Result<SocketAddr> {
    raw.trim()
        .parse::<SocketAddr>()
        .with_context(|| format!("invalid bind address '{raw}' (expected HOST:PORT)"))
}

/// Ensure a static prefix ends with `/` so `{{ static_url }}{{ path }}` joins.
pub fn normalize_static_url(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        bail!("static url must not be empty");
    }
    if trimmed.chars().any(|c| c.is_whitespace() || c == '"') {
        bail!("static url must not contain whitespace or quotes");
    }
    if trimmed.ends_with('/') {
        Ok(trimmed.to_string())
    } else {
        Ok(format!("{trimmed}/"))
    }
}
