use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::Request;
use axum::routing::get;
use tower::ServiceExt;
use views::RenderOptions;

use super::*;
use crate::config::{UpstreamConfig, UpstreamTimeouts};
use crate::routes::api_routes;
use crate::upstream::{HISTORY_PATH, HistoryClient};

async fn spawn_upstream(body: &'static str) -> String {
    let router = Router::new().route(HISTORY_PATH, get(move || async move { body }));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

fn app_for(base_url: &str) -> Router {
    app_with_render(base_url, RenderOptions::default())
}

fn app_with_render(base_url: &str, render: RenderOptions) -> Router {
    let history = HistoryClient::new(&UpstreamConfig {
        base_url: base_url.to_owned(),
        timeouts: UpstreamTimeouts { request_secs: 5, connect_secs: 2 },
    })
    .unwrap();
    api_routes(AppState::new(history, render))
}

async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let resp = app.oneshot(Request::get(uri).body(Body::empty()).unwrap()).await.unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() { serde_json::Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
    (status, value)
}

// =============================================================
// upstream_error_response
// =============================================================

#[test]
fn rejected_maps_to_bad_gateway_with_upstream_message() {
    let (status, Json(body)) = upstream_error_response(&UpstreamError::Rejected("no such conversation".into()));
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body.error, "no such conversation");
}

#[test]
fn transport_failure_maps_to_bad_gateway() {
    let (status, Json(body)) = upstream_error_response(&UpstreamError::Request("connection refused".into()));
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body.error, "upstream request failed: connection refused");
}

// =============================================================
// Router
// =============================================================

#[tokio::test]
async fn healthz_returns_ok() {
    let app = app_for("http://127.0.0.1:9");
    let (status, _) = get_json(app, "/healthz").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn render_options_returns_configured_values() {
    let render = RenderOptions { tag_name: "risk-view".into(), allow_raw_html: true, ..RenderOptions::default() };
    let (status, body) = get_json(app_with_render("http://127.0.0.1:9", render), "/api/render-options").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["tag_name"], "risk-view");
    assert_eq!(body["allow_raw_html"], true);
    assert_eq!(body["tables"], true);
}

#[tokio::test]
async fn messages_relays_history() {
    let base = spawn_upstream(r#"{"success":true,"data":[{"role":"view","context":"done"}]}"#).await;
    let (status, body) = get_json(app_for(&base), "/api/conversations/c1/messages").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["role"], "view");
    assert_eq!(body[0]["context"], "done");
}

#[tokio::test]
async fn messages_reports_rejection_as_bad_gateway() {
    let base = spawn_upstream(r#"{"success":false,"err_msg":"expired"}"#).await;
    let (status, body) = get_json(app_for(&base), "/api/conversations/c1/messages").await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"], "expired");
}
