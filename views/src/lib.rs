//! Chat message model and rendering pipeline for agent conversations.
//!
//! This crate owns everything between a raw message string coming off the
//! agent backend and the final HTML a chat row shows: embedded view
//! extraction, status styling, relations/panes/template classification and
//! markdown rendering with a custom-component registry.
//!
//! It is UI-framework agnostic so the Leptos client and the SSR host can
//! both depend on it, and so the rendering rules can be tested without a
//! browser.

pub mod context;
pub mod extract;
pub mod markdown;
pub mod message;
pub mod status;

use serde::{Deserialize, Serialize};

pub use context::{
    MessageBody, PreparedPanes, PreparedText, RELATIONS_MARKER, ViewPanes, parse_view_panes, prepare_message,
    prepare_text, split_relations,
};
pub use extract::{Extracted, PLACEHOLDER_TAG, TagScanner, extract_views, parse_view_payload, placeholder_token};
pub use markdown::{ComponentHtml, ComponentRegistry, render_markdown_html, render_prepared_html, view_card_html};
pub use message::{AgentOutput, ChatMessage, EmbeddedView, MessageContext, Role, TemplateIntro};
pub use status::{StatusIcon, StatusStyle, ViewStatus, status_style, status_style_for};

/// Tag name the agent backend wraps embedded view payloads in.
pub const DEFAULT_VIEW_TAG: &str = "view-tag";

/// Errors raised while decoding JSON carried inside message text.
///
/// None of these reach the end user: callers log them and fall back to
/// showing the original text (or empty panes).
#[derive(Debug, thiserror::Error)]
pub enum ViewError {
    /// The body of an embedded view tag is not a valid view payload.
    #[error("invalid embedded view payload: {0}")]
    Payload(#[source] serde_json::Error),
    /// A view message that looks like a pane layout failed to decode.
    #[error("invalid pane layout: {0}")]
    Panes(#[source] serde_json::Error),
}

/// Options shared by the tag extractor and the markdown renderer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Name of the embedded view tag, without angle brackets.
    pub tag_name: String,
    /// Pass raw HTML from message text through to the output.
    ///
    /// Off by default: model output is untrusted.
    pub allow_raw_html: bool,
    pub tables: bool,
    pub strikethrough: bool,
    pub tasklists: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            tag_name: DEFAULT_VIEW_TAG.to_owned(),
            allow_raw_html: false,
            tables: true,
            strikethrough: true,
            tasklists: true,
        }
    }
}
