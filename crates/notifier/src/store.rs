//! JSON file-backed subscription storage with atomic writes.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::fs;

use daily_common::error::AppError;
use daily_common::types::ChannelId;

/// Stores the subscribed channel ids as a single JSON array.
#[derive(Debug, Clone)]
pub struct SubscriptionStore {
    path: PathBuf,
}

impl SubscriptionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the persisted channel list. A missing file is an empty list.
    pub async fn load(&self) -> Result<Vec<ChannelId>, AppError> {
        let data = match fs::read_to_string(&self.path).await {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        if data.trim().is_empty() {
            return Ok(Vec::new());
        }
        let channels: Vec<ChannelId> = serde_json::from_str(&data)?;
        Ok(channels)
    }

    /// Overwrite the file with `channels`: write to a temp file, then rename over the target.
    pub async fn save(&self, channels: &[ChannelId]) -> Result<(), AppError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }
        let json = serde_json::to_string_pretty(channels)?;
        let tmp = self.path.with_extension("json.tmp");

        fs::write(&tmp, json.as_bytes()).await?;
        fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}
