use std::sync::Arc;

use photofeed_storage::KeyValueStore;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::{debug, warn};

use crate::{CycleState, FeedError, Fingerprint};

pub const DEFAULT_STORAGE_KEY: &str = "pf_v1";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SeedOutcome {
    /// Stored state matched the current list and was adopted as-is.
    Restored,
    /// A fresh permutation was generated and persisted.
    Seeded,
}

/// Show-everything-once-before-repeating traversal over `item_count` items.
///
/// Every mutation is written to the store under `key`. Store failures are logged and
/// otherwise ignored: the in-memory state stays authoritative for this instance.
pub struct Cycle {
    store: Arc<dyn KeyValueStore>,
    key: String,
    rng: StdRng,
    state: CycleState,
}

impl Cycle {
    pub fn new(store: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self::with_rng(store, key, StdRng::from_entropy())
    }

    pub fn with_rng(store: Arc<dyn KeyValueStore>, key: impl Into<String>, rng: StdRng) -> Self {
        Self { store, key: key.into(), rng, state: CycleState::default() }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn state(&self) -> &CycleState {
        &self.state
    }

    pub fn position(&self) -> usize {
        self.state.position
    }

    pub fn len(&self) -> usize {
        self.state.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.order.is_empty()
    }

    /// `(1-based slot, total)` for progress displays.
    pub fn progress(&self) -> Option<(usize, usize)> {
        if self.is_empty() {
            None
        } else {
            Some((self.state.position + 1, self.len()))
        }
    }

    pub fn restore_or_seed(&mut self, item_count: usize, fingerprint: &Fingerprint) -> SeedOutcome {
        if let Some(state) = self.load(item_count, fingerprint) {
            self.state = state;
            return SeedOutcome::Restored;
        }
        self.state = CycleState {
            order: self.shuffled(item_count),
            position: 0,
            fingerprint: fingerprint.clone(),
        };
        self.persist();
        SeedOutcome::Seeded
    }

    pub fn current(&self) -> Result<usize, FeedError> {
        self.state.order.get(self.state.position).copied().ok_or(FeedError::EmptyList)
    }

    /// Index shown after the next advance, assuming no reshuffle.
    ///
    /// At the last slot this is `order[0]` of the current order, while `advance` will
    /// reshuffle. Prefetch callers may therefore warm an address that is not shown next.
    pub fn peek_next(&self) -> Result<usize, FeedError> {
        let order = &self.state.order;
        let first = *order.first().ok_or(FeedError::EmptyList)?;
        Ok(order.get(self.state.position + 1).copied().unwrap_or(first))
    }

    /// Moves to the next slot, reshuffling once the pass is complete.
    ///
    /// Inert on an empty cycle.
    pub fn advance(&mut self) {
        let len = self.len();
        if len == 0 {
            return;
        }
        self.state.position += 1;
        if self.state.position >= len {
            debug!(key = %self.key, len, "cycle exhausted, reshuffling");
            self.state.order = self.shuffled(len);
            self.state.position = 0;
        }
        self.persist();
    }

    fn shuffled(&mut self, item_count: usize) -> Vec<usize> {
        let mut order: Vec<usize> = (0..item_count).collect();
        order.shuffle(&mut self.rng);
        order
    }

    fn load(&self, item_count: usize, fingerprint: &Fingerprint) -> Option<CycleState> {
        let raw = match self.store.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!(key = %self.key, "no stored cycle state");
                return None;
            }
            Err(e) => {
                warn!(key = %self.key, "reading cycle state failed: {e:#}");
                return None;
            }
        };
        match validate_persisted(&raw, item_count, fingerprint) {
            Ok(state) => Some(state),
            Err(e) => {
                debug!(key = %self.key, "discarding stored cycle state: {e}");
                None
            }
        }
    }

    fn persist(&self) {
        let json = match serde_json::to_string(&self.state) {
            Ok(json) => json,
            Err(e) => {
                warn!(key = %self.key, "serializing cycle state failed: {e}");
                return;
            }
        };
        if let Err(e) = self.store.set(&self.key, &json) {
            warn!(key = %self.key, "persisting cycle state failed: {e:#}");
        }
    }
}

/// Checks a stored state against the current list.
///
/// Every rejection is [`FeedError::CorruptPersistedState`]; callers reseed on any error.
pub fn validate_persisted(raw: &str, item_count: usize, fingerprint: &Fingerprint) -> Result<CycleState, FeedError> {
    let state: CycleState = serde_json::from_str(raw).map_err(FeedError::corrupt)?;
    if &state.fingerprint != fingerprint {
        return Err(FeedError::corrupt(format!(
            "fingerprint {} does not match {}",
            state.fingerprint, fingerprint
        )));
    }
    if state.order.len() != item_count {
        return Err(FeedError::corrupt(format!(
            "order has {} entries, expected {item_count}",
            state.order.len()
        )));
    }
    if state.position >= item_count {
        return Err(FeedError::corrupt(format!("position {} out of range", state.position)));
    }
    if !state.is_permutation() {
        return Err(FeedError::corrupt("order is not a permutation"));
    }
    Ok(state)
}
