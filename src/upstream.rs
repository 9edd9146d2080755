//! Conversation history relay to the agent backend.
//!
//! DESIGN
//! ======
//! The backend wraps every response in `{success, err_msg, data}`. The relay
//! unwraps that envelope and decodes each history item on its own, so one
//! record from an incompatible backend version is skipped and logged instead
//! of failing the whole conversation.

use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use views::ChatMessage;

use crate::config::UpstreamConfig;

/// Path of the history endpoint, relative to the API base.
pub const HISTORY_PATH: &str = "/api/v1/chat/dialogue/messages/history";

/// Errors produced while relaying history.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),

    /// The request never produced a response (connect, timeout, body read).
    #[error("upstream request failed: {0}")]
    Request(String),

    /// The backend returned a non-success HTTP status.
    #[error("upstream response error: status {status}")]
    Status { status: u16 },

    /// The body was not a response envelope.
    #[error("upstream response parse failed: {0}")]
    Parse(String),

    /// The envelope reported `success: false`.
    #[error("upstream rejected request: {0}")]
    Rejected(String),
}

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    err_msg: Option<String>,
    #[serde(default)]
    data: Option<Vec<serde_json::Value>>,
}

/// HTTP client for the backend's history endpoint.
#[derive(Debug, Clone)]
pub struct HistoryClient {
    http: reqwest::Client,
    base_url: String,
}

impl HistoryClient {
    /// # Errors
    ///
    /// Returns [`UpstreamError::HttpClientBuild`] if the client cannot be built.
    pub fn new(config: &UpstreamConfig) -> Result<Self, UpstreamError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeouts.request_secs))
            .connect_timeout(Duration::from_secs(config.timeouts.connect_secs))
            .build()
            .map_err(|e| UpstreamError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, base_url: config.base_url.trim_end_matches('/').to_owned() })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch the message history of `conv_id`.
    ///
    /// # Errors
    ///
    /// Returns an [`UpstreamError`] on transport failure, a non-success
    /// status, an unreadable envelope, or `success: false`.
    pub async fn fetch_history(&self, conv_id: &str) -> Result<Vec<ChatMessage>, UpstreamError> {
        let url = format!("{}{HISTORY_PATH}", self.base_url);
        let resp = self
            .http
            .get(&url)
            .query(&[("con_uid", conv_id)])
            .send()
            .await
            .map_err(|e| UpstreamError::Request(e.to_string()))?;

        let status = resp.status();
        let body = resp.text().await.map_err(|e| UpstreamError::Request(e.to_string()))?;
        if !status.is_success() {
            tracing::warn!(%conv_id, status = status.as_u16(), "history request returned error status");
            return Err(UpstreamError::Status { status: status.as_u16() });
        }

        parse_history_envelope(&body)
    }
}

/// Unwrap a history response envelope.
///
/// # Errors
///
/// Returns [`UpstreamError::Parse`] when `body` is not an envelope and
/// [`UpstreamError::Rejected`] when it reports failure.
pub fn parse_history_envelope(body: &str) -> Result<Vec<ChatMessage>, UpstreamError> {
    let envelope: Envelope = serde_json::from_str(body).map_err(|e| UpstreamError::Parse(e.to_string()))?;
    if !envelope.success {
        let message = envelope
            .err_msg
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| "unknown error".to_owned());
        return Err(UpstreamError::Rejected(message));
    }

    let items = envelope.data.unwrap_or_default();
    let mut messages = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        match serde_json::from_value::<ChatMessage>(item) {
            Ok(message) => messages.push(message),
            Err(error) => tracing::warn!(index, %error, "skipping undecodable history item"),
        }
    }
    Ok(messages)
}

#[cfg(test)]
#[path = "upstream_test.rs"]
mod tests;
