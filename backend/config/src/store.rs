//! Conversation settings store.
//!
//! The in-memory map is the source of truth; every mutation is followed by a
//! full snapshot write through the injected backend.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex as StdMutex};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::settings::ConversationSettings;

/// Conversation id → settings, ordered so snapshots are stable on disk.
pub type SettingsMap = BTreeMap<String, ConversationSettings>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("settings I/O failed at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("settings file {path} is not valid JSON: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode settings: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("settings backend unavailable: {0}")]
    Unavailable(String),
}

/// Durable storage for the full settings map.
#[async_trait]
pub trait SettingsBackend: Send + Sync {
    /// Where the settings live, for logs.
    fn describe(&self) -> String;

    /// Read the persisted snapshot. `Ok(None)` means nothing has been saved yet.
    async fn load(&self) -> Result<Option<SettingsMap>, StoreError>;

    /// Replace the persisted snapshot with `settings`.
    async fn save(&self, settings: &SettingsMap) -> Result<(), StoreError>;
}

pub struct ConfigStore {
    backend: Arc<dyn SettingsBackend>,
    default_ai_enabled: bool,
    settings: Mutex<SettingsMap>,
}

impl ConfigStore {
    /// Load the persisted snapshot. Absent or unreadable storage starts empty.
    pub async fn load(backend: Arc<dyn SettingsBackend>, default_ai_enabled: bool) -> Self {
        let settings = match backend.load().await {
            Ok(Some(map)) => map,
            Ok(None) => SettingsMap::new(),
            Err(e) => {
                warn!(backend = %backend.describe(), error = %e, "Could not load settings; starting empty");
                SettingsMap::new()
            }
        };
        info!(
            backend = %backend.describe(),
            conversations = settings.len(),
            default_ai_enabled,
            "Settings store ready"
        );
        Self {
            backend,
            default_ai_enabled,
            settings: Mutex::new(settings),
        }
    }

    /// Settings given to a conversation the first time it is seen.
    pub fn default_settings(&self) -> ConversationSettings {
        ConversationSettings::new(self.default_ai_enabled)
    }

    /// Settings for a conversation, creating the default entry if it is new.
    ///
    /// Creating the entry does not write to the backend.
    pub async fn get(&self, conversation_id: &str) -> ConversationSettings {
        let mut settings = self.settings.lock().await;
        settings
            .entry(conversation_id.to_string())
            .or_insert_with(|| {
                debug!(conversation = %conversation_id, "Creating default settings");
                self.default_settings()
            })
            .clone()
    }

    /// Apply `mutator` to a conversation's settings and persist the full map.
    ///
    /// The lock is held through the write, so concurrent mutations are
    /// serialized. On a persist failure the in-memory change is kept and the
    /// error is returned.
    pub async fn set<F>(&self, conversation_id: &str, mutator: F) -> Result<ConversationSettings, StoreError>
    where
        F: FnOnce(&mut ConversationSettings),
    {
        let mut settings = self.settings.lock().await;
        let entry = settings
            .entry(conversation_id.to_string())
            .or_insert_with(|| self.default_settings());
        mutator(entry);
        let updated = entry.clone();

        if let Err(e) = self.backend.save(&settings).await {
            warn!(
                backend = %self.backend.describe(),
                conversation = %conversation_id,
                error = %e,
                "Failed to persist settings; keeping in-memory state"
            );
            return Err(e);
        }
        Ok(updated)
    }

    /// Copy of every conversation's settings.
    pub async fn snapshot(&self) -> SettingsMap {
        self.settings.lock().await.clone()
    }
}

/// In-process backend that records every saved snapshot.
#[derive(Default)]
pub struct MemoryBackend {
    saved: StdMutex<Vec<SettingsMap>>,
    fail_saves: AtomicBool,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent saves fail with `StoreError::Unavailable`.
    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    /// Every snapshot saved so far, oldest first.
    pub fn snapshots(&self) -> Vec<SettingsMap> {
        self.saved.lock().map(|s| s.clone()).unwrap_or_default()
    }

    pub fn save_count(&self) -> usize {
        self.saved.lock().map(|s| s.len()).unwrap_or_default()
    }
}

#[async_trait]
impl SettingsBackend for MemoryBackend {
    fn describe(&self) -> String {
        "memory".to_string()
    }

    async fn load(&self) -> Result<Option<SettingsMap>, StoreError> {
        Ok(self.saved.lock().ok().and_then(|s| s.last().cloned()))
    }

    async fn save(&self, settings: &SettingsMap) -> Result<(), StoreError> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("memory backend set to fail".into()));
        }
        self.saved
            .lock()
            .map_err(|_| StoreError::Unavailable("memory backend poisoned".into()))?
            .push(settings.clone());
        Ok(())
    }
}
