//! Shared client-side state modules.
//!
//! DESIGN
//! ======
//! State is split by concern (`chat` data, `ui` chrome, per-message
//! `agent_tabs`) so components depend on small focused models that can be
//! tested without a browser.

pub mod agent_tabs;
pub mod chat;
pub mod ui;
