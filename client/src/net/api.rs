//! REST helpers for the conversation history relay.
//!
//! Client-side (hydrate): real HTTP calls via `gloo-net`.
//! Server-side (SSR): stubs returning an error, since history is only
//! fetched from the browser.
//!
//! ERROR HANDLING
//! ==============
//! Failures come back as display strings; the chat page shows them as an
//! error line instead of crashing hydration.

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use views::{ChatMessage, RenderOptions};

#[cfg(any(test, feature = "hydrate"))]
fn messages_endpoint(conv_id: &str) -> String {
    format!("/api/conversations/{conv_id}/messages")
}

#[cfg(any(test, feature = "hydrate"))]
const RENDER_OPTIONS_ENDPOINT: &str = "/api/render-options";

#[cfg(any(test, feature = "hydrate"))]
fn history_failed_message(status: u16, detail: Option<&str>) -> String {
    match detail {
        Some(detail) if !detail.is_empty() => format!("history request failed: {status}: {detail}"),
        _ => format!("history request failed: {status}"),
    }
}

#[cfg(any(test, feature = "hydrate"))]
#[derive(Debug, serde::Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
}

/// Fetch a conversation's message history from the relay.
///
/// # Errors
///
/// Returns an error string if the request fails, the relay responds with a
/// non-OK status, or the body is not a message list.
pub async fn fetch_messages(conv_id: &str) -> Result<Vec<ChatMessage>, String> {
    #[cfg(feature = "hydrate")]
    {
        let resp = gloo_net::http::Request::get(&messages_endpoint(conv_id))
            .send()
            .await
            .map_err(|e| e.to_string())?;
        if !resp.ok() {
            let detail = match resp.json::<ErrorBody>().await {
                Ok(body) => body.error,
                Err(_) => None,
            };
            return Err(history_failed_message(resp.status(), detail.as_deref()));
        }
        resp.json::<Vec<ChatMessage>>().await.map_err(|e| e.to_string())
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = conv_id;
        Err("not available on server".to_owned())
    }
}

/// Fetch the server's render options (view tag name, raw-HTML policy).
///
/// # Errors
///
/// Returns an error string if the request fails or the body does not decode.
pub async fn fetch_render_options() -> Result<RenderOptions, String> {
    #[cfg(feature = "hydrate")]
    {
        let resp = gloo_net::http::Request::get(RENDER_OPTIONS_ENDPOINT)
            .send()
            .await
            .map_err(|e| e.to_string())?;
        if !resp.ok() {
            return Err(format!("render options request failed: {}", resp.status()));
        }
        resp.json::<RenderOptions>().await.map_err(|e| e.to_string())
    }
    #[cfg(not(feature = "hydrate"))]
    {
        Err("not available on server".to_owned())
    }
}
