//! # riskview
//!
//! SSR host for the risk-intelligence chat front-end.
//!
//! ARCHITECTURE
//! ============
//! - [`config`] reads the process environment once at startup.
//! - [`upstream`] relays conversation history from the agent backend.
//! - [`routes`] binds the JSON API and the Leptos SSR routes onto one Axum
//!   router.
//!
//! Message rendering lives in the `views` crate and the interactive UI in
//! `client`; this crate only serves them.

pub mod config;
pub mod routes;
pub mod state;
pub mod upstream;

pub use config::{ConfigError, ServerConfig};
pub use upstream::{HistoryClient, UpstreamError};
