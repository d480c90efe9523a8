use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use emojiart_editor::DEFAULT_AUTOSAVE_FILE;

use crate::{WorkspaceError, WorkspaceResult};

pub const DEFAULT_CONFIG_NAME: &str = "emojiart.config.json";

/// Emoji Art configuration file format, read from the data directory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Document file every change is written to, relative to the data directory
    #[serde(default = "default_autosave_file")]
    pub autosave_file: String,

    /// Directory holding one file per palette store
    #[serde(default = "default_palette_dir")]
    pub palette_dir: String,

    /// Palette stores to open, in display order
    #[serde(default = "default_palette_stores")]
    pub palette_stores: Vec<String>,

    /// Maximum undo levels (0 = unlimited)
    #[serde(default = "default_undo_levels")]
    pub undo_levels: usize,

    /// Size given to stickers added without an explicit size
    #[serde(default = "default_sticker_size")]
    pub default_sticker_size: i32,
}

fn default_autosave_file() -> String {
    DEFAULT_AUTOSAVE_FILE.to_string()
}

fn default_palette_dir() -> String {
    "palettes".to_string()
}

fn default_palette_stores() -> Vec<String> {
    ["Main", "Alternate", "Special"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_undo_levels() -> usize {
    100
}

fn default_sticker_size() -> i32 {
    40
}

impl Config {
    /// Load config from a directory, falling back to defaults when there is no file
    pub fn load(dir: &Path) -> WorkspaceResult<Self> {
        let config_path = dir.join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            serde_json::from_str(&content).map_err(|source| WorkspaceError::Config {
                path: config_path,
                source,
            })
        } else {
            Ok(Config::default())
        }
    }

    pub fn autosave_path(&self, dir: &Path) -> PathBuf {
        dir.join(&self.autosave_file)
    }

    pub fn palette_path(&self, dir: &Path) -> PathBuf {
        dir.join(&self.palette_dir)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            autosave_file: default_autosave_file(),
            palette_dir: default_palette_dir(),
            palette_stores: default_palette_stores(),
            undo_levels: default_undo_levels(),
            default_sticker_size: default_sticker_size(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let json = r#"{
            "autosaveFile": "Art.emojiart",
            "paletteStores": ["Main"],
            "undoLevels": 5
        }"#;

        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.autosave_file, "Art.emojiart");
        assert_eq!(config.palette_stores, vec!["Main"]);
        assert_eq!(config.undo_levels, 5);
        assert_eq!(config.palette_dir, "palettes");
        assert_eq!(config.default_sticker_size, 40);
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.autosave_file, "Autosaved.emojiart");
        assert_eq!(config.palette_stores, vec!["Main", "Alternate", "Special"]);
        assert_eq!(config.undo_levels, 100);
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(Config::load(dir.path()).unwrap(), Config::default());
    }

    #[test]
    fn test_load_invalid_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(DEFAULT_CONFIG_NAME), "{ nope").unwrap();

        let err = Config::load(dir.path()).unwrap_err();
        assert!(matches!(err, WorkspaceError::Config { .. }));
        assert!(err.to_string().contains(DEFAULT_CONFIG_NAME));
    }
}
