/// Synchronous string-keyed store used to persist cycle state between runs.
///
/// Semantics are "last write wins". Only one logical writer per key exists at a time.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> anyhow::Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> anyhow::Result<()>;
    fn remove(&self, key: &str) -> anyhow::Result<()>;
}
