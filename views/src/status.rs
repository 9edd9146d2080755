//! Execution status of embedded views and agent outputs, and its styling.

#[cfg(test)]
#[path = "status_test.rs"]
mod status_test;

use serde::{Deserialize, Deserializer, Serialize};

/// Execution status reported by the backend for a tool run or agent task.
///
/// Decoding goes through [`ViewStatus::from_raw`]: case-insensitive, legacy
/// `runing` accepted, and `null` or any non-string value reads as `Unknown`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewStatus {
    Todo,
    Running,
    Waiting,
    Retrying,
    Failed,
    Complete,
    /// Anything the backend sends that this client does not know.
    #[default]
    Unknown,
}

impl<'de> Deserialize<'de> for ViewStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = serde_json::Value::deserialize(deserializer)?;
        Ok(raw.as_str().map_or(Self::Unknown, Self::from_raw))
    }
}

impl ViewStatus {
    /// Parse a raw status string; unrecognized values become `Unknown`.
    #[must_use]
    pub fn from_raw(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "todo" => Self::Todo,
            "running" | "runing" => Self::Running,
            "waiting" => Self::Waiting,
            "retrying" => Self::Retrying,
            "failed" => Self::Failed,
            "complete" => Self::Complete,
            _ => Self::Unknown,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::Running => "running",
            Self::Waiting => "waiting",
            Self::Retrying => "retrying",
            Self::Failed => "failed",
            Self::Complete => "complete",
            Self::Unknown => "unknown",
        }
    }
}

/// Icon shown next to a view header.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StatusIcon {
    Clock,
    Loading,
    Close,
    Check,
}

impl StatusIcon {
    /// Inline SVG markup for the icon.
    #[must_use]
    pub fn svg(self) -> &'static str {
        match self {
            Self::Clock => {
                r#"<svg class="status-icon status-icon--clock" viewBox="0 0 16 16" aria-hidden="true"><circle cx="8" cy="8" r="6.5"/><path d="M8 4 V8 L10.5 10"/></svg>"#
            }
            Self::Loading => {
                r#"<svg class="status-icon status-icon--loading" viewBox="0 0 16 16" aria-hidden="true"><path d="M8 1.5 A6.5 6.5 0 1 1 1.5 8"/></svg>"#
            }
            Self::Close => {
                r#"<svg class="status-icon status-icon--close" viewBox="0 0 16 16" aria-hidden="true"><path d="M3.5 3.5 L12.5 12.5"/><path d="M12.5 3.5 L3.5 12.5"/></svg>"#
            }
            Self::Check => {
                r#"<svg class="status-icon status-icon--check" viewBox="0 0 16 16" aria-hidden="true"><path d="M2.5 8.5 L6.5 12 L13.5 4"/></svg>"#
            }
        }
    }
}

/// Background class and icon for a status.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StatusStyle {
    pub bg_class: &'static str,
    pub icon: Option<StatusIcon>,
}

impl StatusStyle {
    /// No classes, no icon.
    pub const EMPTY: Self = Self {
        bg_class: "",
        icon: None,
    };

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bg_class.is_empty() && self.icon.is_none()
    }
}

#[must_use]
pub fn status_style(status: ViewStatus) -> StatusStyle {
    match status {
        ViewStatus::Todo => StatusStyle {
            bg_class: "bg-gray-500",
            icon: Some(StatusIcon::Clock),
        },
        ViewStatus::Running | ViewStatus::Retrying => StatusStyle {
            bg_class: "bg-blue-500",
            icon: Some(StatusIcon::Loading),
        },
        ViewStatus::Waiting => StatusStyle {
            bg_class: "bg-amber-500",
            icon: Some(StatusIcon::Clock),
        },
        ViewStatus::Failed => StatusStyle {
            bg_class: "bg-red-500",
            icon: Some(StatusIcon::Close),
        },
        ViewStatus::Complete => StatusStyle {
            bg_class: "bg-green-500",
            icon: Some(StatusIcon::Check),
        },
        ViewStatus::Unknown => StatusStyle::EMPTY,
    }
}

/// Style lookup straight from a raw status string.
#[must_use]
pub fn status_style_for(raw: &str) -> StatusStyle {
    status_style(ViewStatus::from_raw(raw))
}
