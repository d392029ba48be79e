//! Data directory layout and the optional `closet.toml`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use closet_store::storage::STORE_FILE;
use closet_store::{SqliteStorage, Wardrobe};
use closet_vision::VisionConfig;

pub const CONFIG_FILE: &str = "closet.toml";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub vision: VisionConfig,
}

impl FileConfig {
    /// Read `closet.toml` from `data_dir`. A missing file yields defaults.
    pub fn load(data_dir: &Path) -> Result<Self> {
        let path = data_dir.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("Invalid config in {}", path.display()))
    }
}

pub fn store_path(data_dir: &Path) -> PathBuf {
    data_dir.join(STORE_FILE)
}

/// Open (creating if needed) the store under `data_dir`.
pub fn open_wardrobe(data_dir: &Path) -> Result<Wardrobe<SqliteStorage>> {
    std::fs::create_dir_all(data_dir)
        .with_context(|| format!("Failed to create {}", data_dir.display()))?;
    let path = store_path(data_dir);
    tracing::debug!(path = %path.display(), "opening store");
    let storage = SqliteStorage::open(&path)
        .with_context(|| format!("Failed to open store in {}", data_dir.display()))?;
    Wardrobe::open(storage).context("Failed to load wardrobe")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = FileConfig::load(dir.path()).unwrap();
        assert_eq!(config.vision, VisionConfig::default());
    }

    #[test]
    fn vision_table_overrides_selected_fields() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE),
            "[vision]\nopenai_base_url = \"http://localhost:8080\"\ntimeout_secs = 30\n",
        )
        .unwrap();

        let config = FileConfig::load(dir.path()).unwrap();
        assert_eq!(config.vision.openai_base_url, "http://localhost:8080");
        assert_eq!(config.vision.timeout_secs, Some(30));
        assert_eq!(config.vision.gemini_model, closet_vision::config::DEFAULT_GEMINI_MODEL);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "[vision\n").unwrap();
        assert!(FileConfig::load(dir.path()).is_err());
    }
}
