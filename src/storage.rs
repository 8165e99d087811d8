use crate::models::Playlist;
use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

/// A playlist file on disk.
pub struct Storage {
    path: PathBuf,
}

impl Storage {
    pub fn get_base_dir() -> Result<PathBuf> {
        let mut path =
            dirs::home_dir().ok_or_else(|| anyhow::anyhow!("Could not find home directory"))?;
        path.push(".intervo");
        if !path.exists() {
            fs::create_dir_all(&path)?;
        }
        Ok(path)
    }

    pub fn from_path(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn load(&self) -> Result<Playlist> {
        let data = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read playlist {}", self.path.display()))?;
        let playlist: Playlist = serde_json::from_str(&data)
            .with_context(|| format!("Invalid playlist JSON in {}", self.path.display()))?;
        playlist
            .validate()
            .with_context(|| format!("Invalid playlist in {}", self.path.display()))?;
        Ok(playlist)
    }

    pub fn save(&self, playlist: &Playlist) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        let data = serde_json::to_string_pretty(playlist)?;
        let tmp_path = self.path.with_extension("tmp");
        fs::write(&tmp_path, &data)?;
        fs::rename(&tmp_path, &self.path)
            .with_context(|| format!("Failed to save playlist to {}", self.path.display()))?;
        Ok(())
    }
}
