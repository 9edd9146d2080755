//! Reusable UI component modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Components render chat rows and agent output surfaces while reading and
//! writing shared state from Leptos context providers.

pub mod agent_tabs;
pub mod chat_content;
pub mod plan_list;
