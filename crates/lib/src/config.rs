//! Configuration types and loading.
//!
//! Config is loaded from a JSON file (e.g. `~/.ringback/config.json`) and environment.
//! Provider credentials and the public URL usually come from the environment
//! (`ELK46_USERNAME`, `ELK46_PASSWORD`, `ELK46_NUMBER`, `HOST_URL`).

use anyhow::{Context, Result};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const ENV_USERNAME: &str = "ELK46_USERNAME";
pub const ENV_PASSWORD: &str = "ELK46_PASSWORD";
pub const ENV_NUMBER: &str = "ELK46_NUMBER";
pub const ENV_HOST_URL: &str = "HOST_URL";

const DEFAULT_API_BASE: &str = "https://api.46elks.com/a1";

/// Top-level application config.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Gateway server settings.
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Telephony provider account.
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Public base URL of this service, used for audio and hangup callback URLs.
    /// Overridden by HOST_URL env.
    pub public_url: Option<String>,

    /// Directory served under `/static`. Relative paths are resolved against the config file's parent.
    pub static_dir: Option<PathBuf>,
}

/// Gateway bind and port.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayConfig {
    /// HTTP port (default 8000).
    #[serde(default = "default_gateway_port")]
    pub port: u16,

    /// Bind address (default "127.0.0.1").
    #[serde(default = "default_gateway_bind")]
    pub bind: String,
}

fn default_gateway_port() -> u16 {
    8000
}

fn default_gateway_bind() -> String {
    "127.0.0.1".to_string()
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: default_gateway_port(),
            bind: default_gateway_bind(),
        }
    }
}

/// 46elks account settings. Each field is overridden by its env var when set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderConfig {
    pub username: Option<String>,
    pub password: Option<String>,
    /// Provisioned number: outbound sender and the only accepted inbound recipient.
    pub number: Option<String>,
    /// REST API base (default https://api.46elks.com/a1).
    pub api_base: Option<String>,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required settings: {}", .0.join(", "))]
    Missing(Vec<&'static str>),
    #[error("invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Validated runtime settings, built once at startup.
#[derive(Debug, Clone)]
pub struct Settings {
    pub username: String,
    pub password: String,
    pub number: String,
    pub public_url: Url,
    pub api_base: Url,
    pub static_dir: PathBuf,
}

impl Settings {
    /// Resolve settings from config and the process environment.
    pub fn resolve(config: &Config, config_path: &Path) -> Result<Self, ConfigError> {
        Self::resolve_with(config, config_path, |key| std::env::var(key).ok())
    }

    /// Resolve settings with a custom env lookup. Env values take precedence; blank values are ignored.
    /// Reports every missing required field at once.
    pub fn resolve_with<F>(config: &Config, config_path: &Path, env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let provider = &config.provider;
        let username = resolve_value(&env, ENV_USERNAME, provider.username.as_deref());
        let password = resolve_value(&env, ENV_PASSWORD, provider.password.as_deref());
        let number = resolve_value(&env, ENV_NUMBER, provider.number.as_deref());
        let public_url = resolve_value(&env, ENV_HOST_URL, config.public_url.as_deref());

        let mut missing = Vec::new();
        if username.is_none() {
            missing.push("provider username (ELK46_USERNAME)");
        }
        if password.is_none() {
            missing.push("provider password (ELK46_PASSWORD)");
        }
        if number.is_none() {
            missing.push("provisioned number (ELK46_NUMBER)");
        }
        if public_url.is_none() {
            missing.push("public URL (HOST_URL)");
        }
        let (Some(username), Some(password), Some(number), Some(public_url)) =
            (username, password, number, public_url)
        else {
            return Err(ConfigError::Missing(missing));
        };

        let api_base = provider
            .api_base
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_API_BASE);

        Ok(Self {
            username,
            password,
            number,
            public_url: parse_base_url("publicUrl", &public_url)?,
            api_base: parse_base_url("provider.apiBase", api_base)?,
            static_dir: resolve_static_dir(config, config_path),
        })
    }
}

fn resolve_value<F>(env: &F, key: &str, config_value: Option<&str>) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    env(key)
        .and_then(|s| {
            let t = s.trim();
            if t.is_empty() {
                None
            } else {
                Some(t.to_string())
            }
        })
        .or_else(|| {
            config_value
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        })
}

/// Parse an absolute http(s) URL and normalise it to end with `/` so relative joins keep its path.
fn parse_base_url(field: &'static str, raw: &str) -> Result<Url, ConfigError> {
    let mut normalized = raw.trim_end_matches('/').to_string();
    normalized.push('/');
    let url = Url::parse(&normalized).map_err(|e| ConfigError::Invalid {
        field,
        reason: e.to_string(),
    })?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::Invalid {
            field,
            reason: format!("unsupported scheme {}", url.scheme()),
        });
    }
    Ok(url)
}

/// Resolve config path from env or default.
pub fn default_config_path() -> PathBuf {
    std::env::var("RINGBACK_CONFIG_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            dirs::home_dir()
                .map(|h| h.join(".ringback").join("config.json"))
                .unwrap_or_else(|| PathBuf::from("config.json"))
        })
}

/// Load config from the given path (or the default path). Missing file => default config.
/// Returns the config and the path that was used.
pub fn load_config(path: Option<PathBuf>) -> Result<(Config, PathBuf)> {
    let path = path.unwrap_or_else(default_config_path);
    let config = if !path.exists() {
        log::debug!("config file not found, using defaults: {}", path.display());
        Config::default()
    } else {
        let s = std::fs::read_to_string(&path)
            .with_context(|| format!("reading config from {}", path.display()))?;
        serde_json::from_str(&s)
            .with_context(|| format!("parsing config from {}", path.display()))?
    };
    Ok((config, path))
}

fn config_parent(config_path: &Path) -> &Path {
    config_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."))
}

/// Resolve the static asset root: `staticDir` if set (relative to the config file's parent), otherwise `static` beside the config file.
pub fn resolve_static_dir(config: &Config, config_path: &Path) -> PathBuf {
    let parent = config_parent(config_path);
    match &config.static_dir {
        Some(d) if !d.as_os_str().is_empty() => {
            if d.is_absolute() {
                d.clone()
            } else {
                parent.join(d)
            }
        }
        _ => parent.join("static"),
    }
}
