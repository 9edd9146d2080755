//! Route-level page modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Pages compose components and own route-scoped side effects such as
//! history loading and polling.

pub mod chat;
