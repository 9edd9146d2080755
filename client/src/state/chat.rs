//! Conversation state: loaded history plus render options.
//!
//! DESIGN
//! ======
//! Every history request gets a sequence number from `begin_load` or
//! `begin_refresh`; only the response to the newest request is applied.
//! That drops both responses for a conversation the user already left and
//! slow poll responses overtaken by a newer request. At most one background
//! refresh is in flight at a time.

#[cfg(test)]
#[path = "chat_test.rs"]
mod chat_test;

use views::{ChatMessage, RenderOptions};

/// Shared chat state backed by the history relay.
#[derive(Clone, Debug, Default)]
pub struct ChatState {
    pub conv_id: Option<String>,
    pub messages: Vec<ChatMessage>,
    /// A user-visible load (route change) is in flight.
    pub loading: bool,
    /// A background poll is in flight.
    pub refreshing: bool,
    pub error: Option<String>,
    pub options: RenderOptions,
    request_seq: u64,
}

impl ChatState {
    /// Start loading `conv_id`; returns the request number to apply with.
    ///
    /// Switching conversations clears old messages.
    pub fn begin_load(&mut self, conv_id: &str) -> u64 {
        if self.conv_id.as_deref() != Some(conv_id) {
            self.messages.clear();
            self.conv_id = Some(conv_id.to_owned());
        }
        self.loading = true;
        self.refreshing = false;
        self.error = None;
        self.next_request()
    }

    /// Start a background refresh of the current conversation.
    ///
    /// Returns `None` while another request is in flight or when no
    /// conversation is selected.
    pub fn begin_refresh(&mut self) -> Option<(String, u64)> {
        if self.loading || self.refreshing {
            return None;
        }
        let conv_id = self.conv_id.clone()?;
        self.refreshing = true;
        Some((conv_id, self.next_request()))
    }

    /// Store a history batch. Returns `false` when `request` was superseded.
    pub fn apply_history(&mut self, request: u64, messages: Vec<ChatMessage>) -> bool {
        if !self.finish_request(request) {
            return false;
        }
        self.messages = messages;
        self.error = None;
        true
    }

    /// Record a failed request. Keeps whatever messages were already shown.
    pub fn apply_error(&mut self, request: u64, message: impl Into<String>) -> bool {
        if !self.finish_request(request) {
            return false;
        }
        self.error = Some(message.into());
        true
    }

    /// `true` while the newest message is still being produced.
    #[must_use]
    pub fn is_thinking(&self) -> bool {
        self.messages.last().is_some_and(|m| m.thinking)
    }

    fn next_request(&mut self) -> u64 {
        self.request_seq = self.request_seq.wrapping_add(1);
        self.request_seq
    }

    fn finish_request(&mut self, request: u64) -> bool {
        if request != self.request_seq {
            return false;
        }
        self.loading = false;
        self.refreshing = false;
        true
    }
}
