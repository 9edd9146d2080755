//! Message classification: relations suffix, pane layouts, templates.
//!
//! SYSTEM CONTEXT
//! ==============
//! A chat row needs to know what kind of body it is drawing before any
//! markdown runs. This module turns a [`ChatMessage`] into a [`MessageBody`]
//! and runs the tag extractor over every piece of agent text exactly once,
//! so each message gets its own view cache.

#[cfg(test)]
#[path = "context_test.rs"]
mod context_test;

use serde::{Deserialize, Serialize};

use crate::extract::extract_views;
use crate::message::{AgentOutput, ChatMessage, EmbeddedView, MessageContext, Role, TemplateIntro};
use crate::{RenderOptions, ViewError};

/// Separator between message text and its relations list.
pub const RELATIONS_MARKER: &str = "\trelations:";

/// Agent text after tag extraction, ready for the markdown renderer.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PreparedText {
    /// Markdown with `<custom-view>{i}</custom-view>` placeholders.
    pub text: String,
    pub views: Vec<EmbeddedView>,
    pub relations: Vec<String>,
}

/// Two-pane layout payload: a markdown overview and per-agent outputs.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewPanes {
    #[serde(default)]
    pub left: String,
    #[serde(default)]
    pub right: Vec<AgentOutput>,
}

/// [`ViewPanes`] with the left pane already extracted.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PreparedPanes {
    pub left: PreparedText,
    pub right: Vec<AgentOutput>,
}

/// What a chat row renders.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MessageBody {
    /// Text typed by the user, shown verbatim.
    UserText(String),
    /// Agent markdown with embedded views.
    Markdown(PreparedText),
    /// Agent pane layout.
    Panes(PreparedPanes),
    /// Report template introduction.
    Template(TemplateIntro),
}

/// Split `text` at the first relations marker.
///
/// Returns the text before the marker and the comma-separated relations
/// after it, with blank entries dropped.
#[must_use]
pub fn split_relations(text: &str) -> (&str, Vec<String>) {
    let Some((value, suffix)) = text.split_once(RELATIONS_MARKER) else {
        return (text, Vec::new());
    };
    let relations = suffix
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_owned)
        .collect();
    (value, relations)
}

/// Split off relations and extract embedded views from agent text.
#[must_use]
pub fn prepare_text(raw: &str, options: &RenderOptions) -> PreparedText {
    let (value, relations) = split_relations(raw);
    let extracted = extract_views(value, &options.tag_name);
    PreparedText {
        text: extracted.text,
        views: extracted.views,
        relations,
    }
}

/// Decode a pane layout payload.
///
/// # Errors
///
/// Returns [`ViewError::Panes`] when `raw` is not a pane object.
pub fn parse_view_panes(raw: &str) -> Result<ViewPanes, ViewError> {
    serde_json::from_str(raw.trim()).map_err(ViewError::Panes)
}

/// Classify a message and prepare its body for rendering.
///
/// A view message whose text (relations suffix aside) starts with `{` is a
/// pane layout; its relations are shown under the left pane. If that JSON is
/// malformed the failure is logged and both panes render empty.
#[must_use]
pub fn prepare_message(message: &ChatMessage, options: &RenderOptions) -> MessageBody {
    let text = match &message.context {
        MessageContext::Template(intro) => return MessageBody::Template(intro.clone()),
        MessageContext::Text(text) => text,
    };

    match message.role {
        Role::User => MessageBody::UserText(text.clone()),
        Role::View if split_relations(text).0.trim_start().starts_with('{') => {
            let (layout, relations) = split_relations(text);
            let panes = parse_view_panes(layout).unwrap_or_else(|err| {
                log::warn!("rendering empty panes: {err}");
                ViewPanes::default()
            });
            let mut left = prepare_text(&panes.left, options);
            left.relations.extend(relations);
            MessageBody::Panes(PreparedPanes { left, right: panes.right })
        }
        Role::View => MessageBody::Markdown(prepare_text(text, options)),
    }
}
