//! Server configuration parsed from environment variables.

use thiserror::Error;
use views::RenderOptions;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_API_BASE: &str = "http://127.0.0.1:7777";
pub const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_UPSTREAM_CONNECT_TIMEOUT_SECS: u64 = 5;

/// Errors produced while reading configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid PORT: {0}")]
    InvalidPort(String),

    #[error("invalid DERISK_API_BASE: {0}")]
    InvalidApiBase(String),

    #[error("invalid VIEW_TAG_NAME: {0}")]
    InvalidViewTag(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpstreamTimeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

/// Where and how to reach the agent backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamConfig {
    /// Base URL without a trailing slash.
    pub base_url: String,
    pub timeouts: UpstreamTimeouts,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub port: u16,
    pub upstream: UpstreamConfig,
    /// Served to the browser so every client renders messages the same way.
    pub render: RenderOptions,
}

impl ServerConfig {
    /// Build typed server config from environment variables.
    ///
    /// Optional:
    /// - `PORT`: default 3000
    /// - `DERISK_API_BASE`: default `http://127.0.0.1:7777`
    /// - `UPSTREAM_TIMEOUT_SECS`: default 30
    /// - `UPSTREAM_CONNECT_TIMEOUT_SECS`: default 5
    /// - `VIEW_TAG_NAME`: default `view-tag`
    /// - `ALLOW_RAW_HTML`: default false
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when `PORT` is not a port number, the API
    /// base is not an http(s) URL, or the view tag is not a tag name.
    pub fn from_env() -> Result<Self, ConfigError> {
        let port = parse_port(std::env::var("PORT").ok().as_deref())?;
        let base_url = parse_api_base(std::env::var("DERISK_API_BASE").ok().as_deref())?;
        let timeouts = UpstreamTimeouts {
            request_secs: env_parse_u64("UPSTREAM_TIMEOUT_SECS", DEFAULT_UPSTREAM_TIMEOUT_SECS),
            connect_secs: env_parse_u64("UPSTREAM_CONNECT_TIMEOUT_SECS", DEFAULT_UPSTREAM_CONNECT_TIMEOUT_SECS),
        };

        let render = RenderOptions {
            tag_name: parse_view_tag(std::env::var("VIEW_TAG_NAME").ok().as_deref())?,
            allow_raw_html: parse_flag(std::env::var("ALLOW_RAW_HTML").ok().as_deref()),
            ..RenderOptions::default()
        };

        Ok(Self { port, upstream: UpstreamConfig { base_url, timeouts }, render })
    }
}

fn env_parse_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .filter(|v| *v > 0)
        .unwrap_or(default)
}

fn parse_port(raw: Option<&str>) -> Result<u16, ConfigError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(DEFAULT_PORT),
        Some(value) => value.parse::<u16>().map_err(|_| ConfigError::InvalidPort(value.to_owned())),
    }
}

fn parse_api_base(raw: Option<&str>) -> Result<String, ConfigError> {
    let value = match raw.map(str::trim) {
        None | Some("") => DEFAULT_API_BASE,
        Some(value) => value,
    };
    if !(value.starts_with("http://") || value.starts_with("https://")) {
        return Err(ConfigError::InvalidApiBase(value.to_owned()));
    }
    Ok(value.trim_end_matches('/').to_owned())
}

fn parse_view_tag(raw: Option<&str>) -> Result<String, ConfigError> {
    let value = match raw.map(str::trim) {
        None | Some("") => return Ok(views::DEFAULT_VIEW_TAG.to_owned()),
        Some(value) => value,
    };
    let starts_alpha = value.starts_with(|c: char| c.is_ascii_alphabetic());
    if !starts_alpha || !value.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_') {
        return Err(ConfigError::InvalidViewTag(value.to_owned()));
    }
    Ok(value.to_owned())
}

fn parse_flag(raw: Option<&str>) -> bool {
    raw.map(str::trim)
        .is_some_and(|v| ["1", "true", "yes", "on"].iter().any(|t| v.eq_ignore_ascii_case(t)))
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
