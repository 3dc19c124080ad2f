//! Local assistant — keyword intents, canned replies, and the transcript.

use std::time::Duration;

use tracing::{debug, info};

use crate::deferred::{Generation, Ticket};
use crate::profile::ProfileStore;
use crate::types::{ChatMessage, Sender};

/// Shown while a reply is pending.
pub const THINKING_PLACEHOLDER: &str = "...thinking...";

/// Name used when none is stored.
const DEFAULT_USER_NAME: &str = "User";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Name,
    Weather,
    Cats,
    Greeting,
    Theme,
    Fallback,
}

/// Ordered keyword rules; first match wins.
const RULES: &[(&str, Intent)] = &[
    ("имя", Intent::Name),
    ("погода", Intent::Weather),
    ("кошк", Intent::Cats),
    ("привет", Intent::Greeting),
    ("здравствуй", Intent::Greeting),
    ("тема", Intent::Theme),
];

/// Case-insensitive substring match against [`RULES`].
pub fn classify(utterance: &str) -> Intent {
    let lower = utterance.to_lowercase();
    RULES
        .iter()
        .find(|(keyword, _)| lower.contains(keyword))
        .map(|(_, intent)| *intent)
        .unwrap_or(Intent::Fallback)
}

/// Canned reply for an utterance. `stored_name` is the profile name, if any.
pub fn reply(utterance: &str, stored_name: Option<&str>) -> String {
    match classify(utterance) {
        Intent::Name => {
            let name = stored_name
                .filter(|n| !n.is_empty())
                .unwrap_or(DEFAULT_USER_NAME);
            format!("Your name is saved as \"{}\".", name)
        }
        Intent::Weather => "To check the weather, open the \"Weather\" tab.".to_string(),
        Intent::Cats => "Press Enter on the \"Cat Facts\" tab to get a random fact.".to_string(),
        Intent::Greeting => {
            "Hi! I'm a local assistant, ready to help you find your way around.".to_string()
        }
        Intent::Theme => {
            "You can switch between the dark and light theme on the \"Profile\" tab.".to_string()
        }
        Intent::Fallback => format!(
            "Thanks for your request \"{}\". I run in local mode and only understand simple commands (name, weather, cats, theme).",
            utterance
        ),
    }
}

#[derive(Debug, Clone)]
pub struct ChatDispatcher {
    delay: Duration,
}

impl ChatDispatcher {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// Wait out the simulated latency, then answer. The stored name is read
    /// after the delay, so a rename made meanwhile is picked up.
    pub async fn respond(&self, utterance: &str, profiles: &ProfileStore) -> String {
        tokio::time::sleep(self.delay).await;
        let intent = classify(utterance);
        info!("Assistant intent {:?}", intent);
        reply(utterance, profiles.display_name().as_deref())
    }
}

// ── Transcript ──

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptEntry {
    pub id: u64,
    pub message: ChatMessage,
    pub pending: bool,
}

/// Handle for a placeholder waiting on its reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingReply {
    epoch: Ticket,
    id: u64,
}

/// The visible conversation. Clearing it strands every pending reply.
#[derive(Debug, Default)]
pub struct Transcript {
    entries: Vec<TranscriptEntry>,
    epoch: Generation,
    next_id: u64,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn push(&mut self, sender: Sender, text: String, pending: bool) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.entries.push(TranscriptEntry {
            id,
            message: ChatMessage { sender, text },
            pending,
        });
        id
    }

    /// Append the user's message. Returns the trimmed text, or `None` when
    /// there is nothing to send.
    pub fn push_user(&mut self, text: &str) -> Option<String> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        self.push(Sender::User, text.to_string(), false);
        Some(text.to_string())
    }

    /// Append a "thinking" placeholder for a reply that is on its way.
    pub fn push_placeholder(&mut self) -> PendingReply {
        let id = self.push(Sender::Assistant, THINKING_PLACEHOLDER.to_string(), true);
        PendingReply {
            epoch: self.epoch.current(),
            id,
        }
    }

    /// Swap the placeholder for the reply, appended at the end. Returns false
    /// and leaves the transcript alone when the placeholder is gone.
    pub fn resolve(&mut self, pending: PendingReply, text: String) -> bool {
        if !self.epoch.is_current(pending.epoch) {
            debug!("Dropping reply {} from a cleared transcript", pending.id);
            return false;
        }
        let Some(pos) = self
            .entries
            .iter()
            .position(|e| e.id == pending.id && e.pending)
        else {
            debug!("Placeholder {} no longer present", pending.id);
            return false;
        };
        self.entries.remove(pos);
        self.push(Sender::Assistant, text, false);
        true
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.epoch.invalidate();
    }
}
