//! JSON settings file backend with atomic replace.

use async_trait::async_trait;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

use crate::store::{SettingsBackend, SettingsMap, StoreError};

/// Persists the whole settings map as one pretty-printed JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileBackend {
    path: PathBuf,
}

impl JsonFileBackend {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self { path: path.as_ref().to_path_buf() }
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name: OsString = self.path.as_os_str().to_owned();
        name.push(".tmp");
        PathBuf::from(name)
    }

    fn io_err(&self, source: std::io::Error) -> StoreError {
        StoreError::Io { path: self.path.display().to_string(), source }
    }
}

#[async_trait]
impl SettingsBackend for JsonFileBackend {
    fn describe(&self) -> String {
        format!("file:{}", self.path.display())
    }

    async fn load(&self) -> Result<Option<SettingsMap>, StoreError> {
        if !fs::try_exists(&self.path).await.map_err(|e| self.io_err(e))? {
            debug!(path = %self.path.display(), "Settings file does not exist");
            return Ok(None);
        }

        let raw = fs::read_to_string(&self.path).await.map_err(|e| self.io_err(e))?;
        let settings: SettingsMap = serde_json::from_str(&raw).map_err(|source| {
            StoreError::Parse { path: self.path.display().to_string(), source }
        })?;

        info!(path = %self.path.display(), conversations = settings.len(), "Loaded settings");
        Ok(Some(settings))
    }

    /// Write to a temp file, then rename over the target.
    async fn save(&self, settings: &SettingsMap) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await.map_err(|e| self.io_err(e))?;
        }

        let mut json = serde_json::to_string_pretty(settings)?;
        json.push('\n');

        let tmp = self.tmp_path();
        fs::write(&tmp, json.as_bytes()).await.map_err(|e| self.io_err(e))?;
        fs::rename(&tmp, &self.path).await.map_err(|e| self.io_err(e))?;

        debug!(path = %self.path.display(), conversations = settings.len(), "Wrote settings");
        Ok(())
    }
}
