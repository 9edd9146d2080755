use std::sync::{Mutex, MutexGuard, PoisonError};

use super::*;

static ENV_LOCK: Mutex<()> = Mutex::new(());

fn lock_env() -> MutexGuard<'static, ()> {
    ENV_LOCK.lock().unwrap_or_else(PoisonError::into_inner)
}

/// # Safety
/// Callers hold [`lock_env`] so env mutation is serialized.
unsafe fn clear_server_env() {
    unsafe {
        std::env::remove_var("PORT");
        std::env::remove_var("DERISK_API_BASE");
        std::env::remove_var("UPSTREAM_TIMEOUT_SECS");
        std::env::remove_var("UPSTREAM_CONNECT_TIMEOUT_SECS");
        std::env::remove_var("VIEW_TAG_NAME");
        std::env::remove_var("ALLOW_RAW_HTML");
    }
}

#[test]
fn from_env_uses_defaults() {
    let _env = lock_env();
    unsafe { clear_server_env() };

    let cfg = ServerConfig::from_env().unwrap();
    assert_eq!(cfg.port, DEFAULT_PORT);
    assert_eq!(cfg.upstream.base_url, DEFAULT_API_BASE);
    assert_eq!(
        cfg.upstream.timeouts,
        UpstreamTimeouts {
            request_secs: DEFAULT_UPSTREAM_TIMEOUT_SECS,
            connect_secs: DEFAULT_UPSTREAM_CONNECT_TIMEOUT_SECS,
        }
    );
    assert_eq!(cfg.render, RenderOptions::default());
}

#[test]
fn from_env_parses_overrides() {
    let _env = lock_env();
    unsafe {
        clear_server_env();
        std::env::set_var("PORT", "8080");
        std::env::set_var("DERISK_API_BASE", "https://agents.example.test/");
        std::env::set_var("UPSTREAM_TIMEOUT_SECS", "12");
        std::env::set_var("UPSTREAM_CONNECT_TIMEOUT_SECS", "2");
    }

    let cfg = ServerConfig::from_env().unwrap();
    assert_eq!(cfg.port, 8080);
    assert_eq!(cfg.upstream.base_url, "https://agents.example.test");
    assert_eq!(cfg.upstream.timeouts, UpstreamTimeouts { request_secs: 12, connect_secs: 2 });

    unsafe { clear_server_env() };
}

#[test]
fn parse_port_rejects_garbage() {
    assert_eq!(parse_port(Some("not-a-port")), Err(ConfigError::InvalidPort("not-a-port".into())));
    assert_eq!(parse_port(Some("70000")), Err(ConfigError::InvalidPort("70000".into())));
}

#[test]
fn parse_port_blank_is_default() {
    assert_eq!(parse_port(Some("  ")), Ok(DEFAULT_PORT));
    assert_eq!(parse_port(None), Ok(DEFAULT_PORT));
}

#[test]
fn parse_api_base_trims_trailing_slashes() {
    assert_eq!(parse_api_base(Some("http://host:7777//")).unwrap(), "http://host:7777");
}

#[test]
fn parse_api_base_requires_http_scheme() {
    assert_eq!(parse_api_base(Some("host:7777")), Err(ConfigError::InvalidApiBase("host:7777".into())));
}

#[test]
fn invalid_timeout_falls_back_to_default() {
    let _env = lock_env();
    unsafe {
        clear_server_env();
        std::env::set_var("UPSTREAM_TIMEOUT_SECS", "soon");
        std::env::set_var("UPSTREAM_CONNECT_TIMEOUT_SECS", "0");
    }

    let cfg = ServerConfig::from_env().unwrap();
    assert_eq!(cfg.upstream.timeouts.request_secs, DEFAULT_UPSTREAM_TIMEOUT_SECS);
    assert_eq!(cfg.upstream.timeouts.connect_secs, DEFAULT_UPSTREAM_CONNECT_TIMEOUT_SECS);

    unsafe { clear_server_env() };
}

// =============================================================
// Render options
// =============================================================

#[test]
fn from_env_reads_render_options() {
    let _env = lock_env();
    unsafe {
        clear_server_env();
        std::env::set_var("VIEW_TAG_NAME", " risk-view ");
        std::env::set_var("ALLOW_RAW_HTML", "TRUE");
    }

    let cfg = ServerConfig::from_env().unwrap();
    assert_eq!(cfg.render.tag_name, "risk-view");
    assert!(cfg.render.allow_raw_html);
    assert!(cfg.render.tables);

    unsafe { clear_server_env() };
}

#[test]
fn from_env_rejects_bad_view_tag() {
    let _env = lock_env();
    unsafe {
        clear_server_env();
        std::env::set_var("VIEW_TAG_NAME", "<view>");
    }

    assert_eq!(ServerConfig::from_env(), Err(ConfigError::InvalidViewTag("<view>".into())));

    unsafe { clear_server_env() };
}

#[test]
fn parse_view_tag_defaults_when_blank() {
    assert_eq!(parse_view_tag(None).unwrap(), views::DEFAULT_VIEW_TAG);
    assert_eq!(parse_view_tag(Some("  ")).unwrap(), views::DEFAULT_VIEW_TAG);
}

#[test]
fn parse_view_tag_rejects_leading_digit_and_spaces() {
    assert!(parse_view_tag(Some("1view")).is_err());
    assert!(parse_view_tag(Some("view tag")).is_err());
    assert_eq!(parse_view_tag(Some("d_view-2")).unwrap(), "d_view-2");
}

#[test]
fn parse_flag_accepts_common_truthy_values() {
    for raw in ["1", "true", "Yes", "ON"] {
        assert!(parse_flag(Some(raw)), "{raw}");
    }
    for raw in ["0", "false", "", "maybe"] {
        assert!(!parse_flag(Some(raw)), "{raw}");
    }
    assert!(!parse_flag(None));
}
