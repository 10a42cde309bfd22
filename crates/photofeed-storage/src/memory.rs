use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::anyhow;

use crate::traits::KeyValueStore;

/// In-memory store for tests and embedders. Not durable.
#[derive(Default)]
pub struct InMemoryStore {
    inner: Mutex<HashMap<String, String>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStore for InMemoryStore {
    fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        let inner = self.inner.lock().map_err(|_| anyhow!("memory store lock poisoned"))?;
        Ok(inner.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> anyhow::Result<()> {
        let mut inner = self.inner.lock().map_err(|_| anyhow!("memory store lock poisoned"))?;
        inner.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> anyhow::Result<()> {
        let mut inner = self.inner.lock().map_err(|_| anyhow!("memory store lock poisoned"))?;
        inner.remove(key);
        Ok(())
    }
}
