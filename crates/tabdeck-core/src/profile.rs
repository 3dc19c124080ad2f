//! Profile store — display name, theme flag, avatar, and recent searches.

use std::sync::Arc;

use tracing::{info, warn};

use crate::storage::{
    KeyValueStore, StorageError, KEY_AVATAR, KEY_DARK_THEME, KEY_USER_NAME, KEY_WEATHER_HISTORY,
};
use crate::types::{HistoryEntry, Profile, INLINE_IMAGE_PREFIX};

/// Max entries kept in the recent-search list
pub const HISTORY_LIMIT: usize = 3;

/// Cheap to clone; every clone talks to the same store.
#[derive(Clone)]
pub struct ProfileStore {
    store: Arc<dyn KeyValueStore>,
}

impl ProfileStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Overwrite all three profile fields. An absent avatar is stored as "".
    pub fn save(&self, profile: &Profile) -> Result<(), StorageError> {
        self.store.set(KEY_USER_NAME, &profile.display_name)?;
        self.store
            .set(KEY_DARK_THEME, if profile.dark_theme { "true" } else { "false" })?;
        self.store
            .set(KEY_AVATAR, profile.avatar.as_deref().unwrap_or(""))?;
        Ok(())
    }

    pub fn load(&self) -> Profile {
        let display_name = self.store.get(KEY_USER_NAME).unwrap_or_default();
        let dark_theme = self.store.get(KEY_DARK_THEME).as_deref() == Some("true");
        let avatar = self
            .store
            .get(KEY_AVATAR)
            .filter(|a| a.starts_with(INLINE_IMAGE_PREFIX));

        Profile {
            display_name,
            dark_theme,
            avatar,
        }
    }

    /// The stored name, `None` when unset or empty.
    pub fn display_name(&self) -> Option<String> {
        self.store
            .get(KEY_USER_NAME)
            .filter(|name| !name.is_empty())
    }

    /// Recent searches, newest first. Malformed data reads as empty.
    pub fn history(&self) -> Vec<HistoryEntry> {
        let Some(raw) = self.store.get(KEY_WEATHER_HISTORY) else {
            return Vec::new();
        };
        match serde_json::from_str(&raw) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Ignoring malformed search history: {}", e);
                Vec::new()
            }
        }
    }

    /// Prepend a search stamped with the current local time.
    pub fn record_search(&self, label: &str) -> Result<Vec<HistoryEntry>, StorageError> {
        let time = chrono::Local::now().format("%H:%M").to_string();
        self.record_search_at(label, &time)
    }

    /// Prepend a search, keep the newest [`HISTORY_LIMIT`], persist, and
    /// return the new list.
    pub fn record_search_at(
        &self,
        label: &str,
        time: &str,
    ) -> Result<Vec<HistoryEntry>, StorageError> {
        let mut history = self.history();
        history.insert(
            0,
            HistoryEntry {
                city: label.to_string(),
                time: time.to_string(),
            },
        );
        history.truncate(HISTORY_LIMIT);

        let encoded = serde_json::to_string(&history)?;
        self.store.set(KEY_WEATHER_HISTORY, &encoded)?;
        info!("Recorded search {:?} at {}", label, time);
        Ok(history)
    }

    /// Erase everything in the underlying store.
    pub fn clear_all(&self) -> Result<(), StorageError> {
        self.store.clear()?;
        info!("Cleared all stored data");
        Ok(())
    }
}
