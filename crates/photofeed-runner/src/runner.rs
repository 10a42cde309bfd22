use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use photofeed_core::Renderer;
use photofeed_storage::KeyValueStore;
use photofeed_storage_sqlite::SqliteStore;

use crate::{Config, Feed};

/// A feed root on disk: config plus the durable state store.
pub struct Runner {
    pub root: PathBuf,
    pub cfg: Config,
    pub store: Arc<SqliteStore>,
}

impl Runner {
    pub fn open(root: PathBuf) -> Result<Self> {
        let cfg_path = Config::config_path(&root);
        if !cfg_path.exists() {
            return Err(anyhow!(
                "no config at {}; run `photofeed init --manifest-url <url>` first",
                cfg_path.display()
            ));
        }
        let cfg = Config::load_from(&cfg_path)?;
        let state_path = cfg.state_path(&root);
        let store = SqliteStore::open(&state_path).with_context(|| format!("open state {}", state_path.display()))?;
        Ok(Self { root, cfg, store: Arc::new(store) })
    }

    /// Writes the config (replacing any previous one) and creates the state db.
    pub fn init_root(root: &Path, cfg: &Config) -> Result<()> {
        cfg.feed.validate()?;
        cfg.save_to(&Config::config_path(root))?;
        let _ = SqliteStore::open(&cfg.state_path(root))?;
        Ok(())
    }

    pub fn mount<R: Renderer>(&self, renderer: R) -> Feed<R> {
        Feed::mount(self.cfg.feed.clone(), self.store.clone(), renderer)
    }

    pub fn stored_state(&self) -> Result<Option<String>> {
        self.store.get(&self.cfg.feed.storage_key)
    }

    /// Drops persisted progress so the next init reseeds.
    pub fn forget(&self) -> Result<()> {
        self.store.remove(&self.cfg.feed.storage_key)
    }
}
