use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use photofeed_core::DEFAULT_STORAGE_KEY;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    pub feed: FeedConfig,
    #[serde(default)]
    pub state: StateConfig,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedConfig {
    pub manifest_url: String,
    #[serde(default)]
    pub image_base_url: String,
    #[serde(default = "default_storage_key")]
    pub storage_key: String,
    /// Caption for the advance trigger. Only adapters read it.
    #[serde(default = "default_button_text")]
    pub button_text: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct StateConfig {
    /// sqlite file holding cycle state. Relative paths resolve against the feed root.
    #[serde(default)]
    pub path: Option<String>,
}

fn default_storage_key() -> String {
    DEFAULT_STORAGE_KEY.to_string()
}

fn default_button_text() -> String {
    "New photo".to_string()
}

impl FeedConfig {
    pub fn new(manifest_url: impl Into<String>) -> Self {
        Self {
            manifest_url: manifest_url.into(),
            image_base_url: String::new(),
            storage_key: default_storage_key(),
            button_text: default_button_text(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.manifest_url.trim().is_empty() {
            return Err(anyhow!("feed.manifest_url is required"));
        }
        if self.storage_key.is_empty() {
            return Err(anyhow!("feed.storage_key cannot be empty"));
        }
        Ok(())
    }
}

impl Config {
    pub fn default_with_manifest(manifest_url: &str) -> Self {
        Self {
            feed: FeedConfig::new(manifest_url),
            state: StateConfig::default(),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let s = std::fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
        let cfg: Config = toml::from_str(&s).with_context(|| "parse photofeed.toml")?;
        cfg.feed.validate()?;
        Ok(cfg)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).ok();
        }
        let s = toml::to_string_pretty(self).with_context(|| "serialize toml")?;
        std::fs::write(path, s).with_context(|| format!("write {}", path.display()))?;
        Ok(())
    }

    pub fn state_path(&self, root: &Path) -> PathBuf {
        match &self.state.path {
            Some(p) => root.join(shellexpand::tilde(p).into_owned()),
            None => root.join(".photofeed").join("state.db"),
        }
    }

    pub fn config_path(root: &Path) -> PathBuf {
        root.join(".photofeed").join("photofeed.toml")
    }
}
