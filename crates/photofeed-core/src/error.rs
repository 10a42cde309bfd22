use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum FeedError {
    /// Fetching or parsing the manifest failed. Fatal to initialization.
    #[error("manifest unavailable: {0}")]
    ManifestUnavailable(String),
    /// No items survived de-duplication.
    #[error("item list is empty")]
    EmptyList,
    /// Stored cycle state could not be adopted. Recovered by reseeding, never returned to callers.
    #[error("corrupt persisted state: {0}")]
    CorruptPersistedState(String),
}

impl FeedError {
    pub fn manifest<E: std::fmt::Display>(e: E) -> Self {
        Self::ManifestUnavailable(e.to_string())
    }
    pub fn corrupt<E: std::fmt::Display>(e: E) -> Self {
        Self::CorruptPersistedState(e.to_string())
    }
}
