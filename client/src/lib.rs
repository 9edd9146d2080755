//! # client
//!
//! Leptos + WASM front-end for the risk-intelligence agent chat.
//!
//! This crate holds pages, components, client state and the REST helper that
//! loads conversation history. Turning message text into HTML is delegated to
//! the `views` crate; this crate decides where that HTML goes and owns the
//! interactive parts (agent tabs, plan list, theme).

pub mod app;
pub mod components;
pub mod net;
pub mod pages;
pub mod state;
pub mod util;

/// WASM entry point: install logging and hydrate the server-rendered shell.
#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    console_error_panic_hook::set_once();
    if let Err(err) = console_log::init_with_level(log::Level::Info) {
        leptos::logging::warn!("console logger unavailable: {err}");
    }
    leptos::mount::hydrate_body(app::App);
}
