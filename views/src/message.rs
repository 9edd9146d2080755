//! Message and agent-output records as delivered by the agent backend.
//!
//! DESIGN
//! ======
//! Payloads come from several backend generations, so decoding is lenient:
//! optional fields default, ids may arrive as strings or numbers, and a
//! `null` context reads as empty text. Anything structurally wrong is left
//! to the caller to skip.

#[cfg(test)]
#[path = "message_test.rs"]
mod message_test;

use serde::{Deserialize, Deserializer, Serialize};

use crate::status::ViewStatus;

/// Author side of a chat message.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Message typed by the person using the app.
    #[default]
    #[serde(alias = "human")]
    User,
    /// Message produced by the agents, rendered as rich markdown.
    View,
}

/// Introduction card for a report template the agent can generate.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateIntro {
    pub template_name: String,
    #[serde(default)]
    pub template_introduce: String,
}

/// Body of a chat message: free text or a structured template reference.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContext {
    Text(String),
    Template(TemplateIntro),
}

impl Default for MessageContext {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

impl MessageContext {
    /// The raw text, when this context is text.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Template(_) => None,
        }
    }
}

/// A single chat message.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    #[serde(default, deserialize_with = "deserialize_nullable_context")]
    pub context: MessageContext,
    #[serde(default)]
    pub model_name: Option<String>,
    /// The agent is still reasoning; the row shows a thinking indicator.
    #[serde(default)]
    pub thinking: bool,
}

impl ChatMessage {
    /// Convenience constructor for a plain-text message.
    #[must_use]
    pub fn text(role: Role, context: impl Into<String>) -> Self {
        Self {
            role,
            context: MessageContext::Text(context.into()),
            model_name: None,
            thinking: false,
        }
    }
}

/// A tool/plugin execution result embedded in message text.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbeddedView {
    pub name: String,
    #[serde(default)]
    pub status: ViewStatus,
    /// Ordinal the backend assigned to the execution step.
    #[serde(default, deserialize_with = "deserialize_optional_num")]
    pub num: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub task_id: Option<String>,
    #[serde(default)]
    pub agent: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
    /// Markdown result; takes precedence over `err_msg` when non-empty.
    #[serde(default)]
    pub result: Option<String>,
    #[serde(default)]
    pub err_msg: Option<String>,
}

/// One collaborating agent's contribution, shown as a tab.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentOutput {
    pub name: String,
    #[serde(default)]
    pub status: ViewStatus,
    #[serde(default, deserialize_with = "deserialize_optional_num")]
    pub num: Option<i64>,
    /// Tab key.
    #[serde(deserialize_with = "deserialize_id")]
    pub task_id: String,
    #[serde(default)]
    pub agent: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub markdown: String,
}

fn deserialize_nullable_context<'de, D>(deserializer: D) -> Result<MessageContext, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<MessageContext>::deserialize(deserializer).map(Option::unwrap_or_default)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(serde_json::Number),
}

impl From<RawId> for String {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Text(text) => text,
            RawId::Number(number) => number.to_string(),
        }
    }
}

fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    RawId::deserialize(deserializer).map(String::from)
}

fn deserialize_optional_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<RawId>::deserialize(deserializer).map(|raw| raw.map(String::from))
}

/// Ordinals arrive as numbers, numeric strings, or `null`; anything else
/// reads as absent rather than failing the record.
fn deserialize_optional_num<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = serde_json::Value::deserialize(deserializer)?;
    Ok(match raw {
        serde_json::Value::Number(number) => number.as_i64(),
        serde_json::Value::String(text) => match text.trim().parse::<i64>() {
            Ok(num) => Some(num),
            Err(_) => None,
        },
        _ => None,
    })
}
