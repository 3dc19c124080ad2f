//! Core types — Profile, HistoryEntry, ChatMessage, Fact.

use serde::{Deserialize, Serialize};

/// Shown in place of a missing or malformed avatar.
pub const AVATAR_PLACEHOLDER: &str = "https://via.placeholder.com/150?text=Avatar";

/// Recognized prefix of an inline image.
pub const INLINE_IMAGE_PREFIX: &str = "data:image";

// ── Profile ──

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Profile {
    pub display_name: String,
    pub dark_theme: bool,
    /// `data:image/...` URI, `None` when absent or malformed
    pub avatar: Option<String>,
}

impl Profile {
    /// The avatar to render: the stored data URI or the placeholder.
    pub fn avatar_or_placeholder(&self) -> &str {
        self.avatar.as_deref().unwrap_or(AVATAR_PLACEHOLDER)
    }
}

// ── Search history ──

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// "City, Country"
    pub city: String,
    /// Local time, `HH:MM`
    pub time: String,
}

// ── Chat ──

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Assistant,
}

impl std::fmt::Display for Sender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Sender::User => write!(f, "user"),
            Sender::Assistant => write!(f, "assistant"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub sender: Sender,
    pub text: String,
}

// ── Facts ──

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fact {
    /// Zero-based position in the fact list
    pub index: usize,
    pub text: &'static str,
}

impl Fact {
    /// "Random fact #N", 1-based.
    pub fn title(&self) -> String {
        format!("Random fact #{}", self.index + 1)
    }
}
