use serde::{Deserialize, Serialize};

/// Deterministic hash of a resolved identifier list.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(pub String);

impl Fingerprint {
    pub fn from_str(s: impl Into<String>) -> Self {
        Self(s.into())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Item {
    /// Filename or absolute URL as listed in the manifest.
    pub identifier: String,
    /// Address handed to the renderer.
    pub address: String,
    pub label: String,
}

/// Ordered, de-duplicated items of one manifest fetch.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ItemList {
    items: Vec<Item>,
    fingerprint: Fingerprint,
}

impl ItemList {
    pub fn new(items: Vec<Item>, fingerprint: Fingerprint) -> Self {
        Self { items, fingerprint }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Item> {
        self.items.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Item> {
        self.items.iter()
    }

    pub fn fingerprint(&self) -> &Fingerprint {
        &self.fingerprint
    }

    pub fn identifiers(&self) -> Vec<&str> {
        self.items.iter().map(|i| i.identifier.as_str()).collect()
    }

    pub fn addresses(&self) -> Vec<&str> {
        self.items.iter().map(|i| i.address.as_str()).collect()
    }
}

/// Traversal order over an item list plus the slot currently shown.
///
/// Serialized as `{"order":[..],"i":n,"fp":"hex"}`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleState {
    pub order: Vec<usize>,
    #[serde(rename = "i")]
    pub position: usize,
    #[serde(rename = "fp")]
    pub fingerprint: Fingerprint,
}

impl CycleState {
    /// True when `order` covers `[0, order.len())` exactly once.
    pub fn is_permutation(&self) -> bool {
        let mut seen = vec![false; self.order.len()];
        for &idx in &self.order {
            match seen.get_mut(idx) {
                Some(slot) if !*slot => *slot = true,
                _ => return false,
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycle_state_uses_compact_field_names() {
        let state = CycleState {
            order: vec![2, 0, 1],
            position: 1,
            fingerprint: Fingerprint::from_str("abc"),
        };
        let json = serde_json::to_string(&state).unwrap();
        assert_eq!(json, r#"{"order":[2,0,1],"i":1,"fp":"abc"}"#);
        let back: CycleState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, state);
    }

    #[test]
    fn negative_or_fractional_position_does_not_deserialize() {
        assert!(serde_json::from_str::<CycleState>(r#"{"order":[0],"i":-1,"fp":"x"}"#).is_err());
        assert!(serde_json::from_str::<CycleState>(r#"{"order":[0],"i":0.5,"fp":"x"}"#).is_err());
    }

    #[test]
    fn permutation_check() {
        let mk = |order: Vec<usize>| CycleState { order, ..Default::default() };
        assert!(mk(vec![]).is_permutation());
        assert!(mk(vec![1, 2, 0]).is_permutation());
        assert!(!mk(vec![0, 0, 1]).is_permutation());
        assert!(!mk(vec![0, 3, 1]).is_permutation());
    }
}
