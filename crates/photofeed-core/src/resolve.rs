use std::collections::HashSet;

use crate::{fingerprint_identifiers, Item, ItemList};

/// Label used when an identifier is already an absolute URL.
pub const DEFAULT_LABEL: &str = "photo";

/// Base address prepended to relative identifiers.
///
/// Empty stays empty; anything else ends with exactly one `/`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BaseAddress(String);

impl BaseAddress {
    pub fn new(raw: &str) -> Self {
        if raw.is_empty() {
            return Self(String::new());
        }
        let trimmed = raw.trim_end_matches('/');
        Self(format!("{trimmed}/"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

pub fn is_absolute_url(identifier: &str) -> bool {
    let lower = identifier
        .get(..8)
        .unwrap_or(identifier)
        .to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Percent-encodes `s` for use as one URL path segment.
///
/// Keeps ASCII alphanumerics and `-_.!~*'()`; every other UTF-8 byte becomes `%XX`.
pub fn encode_path_segment(s: &str) -> String {
    const HEX: &[u8; 16] = b"0123456789ABCDEF";
    let mut out = String::with_capacity(s.len());
    for &b in s.as_bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'!' | b'~' | b'*' | b'\'' | b'(' | b')' => {
                out.push(b as char)
            }
            _ => {
                out.push('%');
                out.push(HEX[(b >> 4) as usize] as char);
                out.push(HEX[(b & 0x0f) as usize] as char);
            }
        }
    }
    out
}

/// Display label: the identifier without its last extension.
///
/// Only lowercase `http://`/`https://` prefixes get the default label, so `HTTP://x/a.png`
/// is labelled `HTTP://x/a` even though its address passes through.
pub fn label_for(identifier: &str) -> String {
    if identifier.starts_with("http://") || identifier.starts_with("https://") {
        return DEFAULT_LABEL.to_string();
    }
    match identifier.rfind('.') {
        Some(dot) if dot + 1 < identifier.len() => identifier[..dot].to_string(),
        _ => identifier.to_string(),
    }
}

pub fn resolve_address(identifier: &str, base: &BaseAddress) -> String {
    if is_absolute_url(identifier) {
        identifier.to_string()
    } else {
        format!("{}{}", base.as_str(), encode_path_segment(identifier))
    }
}

/// Builds the canonical item list from raw manifest entries.
///
/// Empty entries are dropped and duplicates collapse onto their first occurrence.
pub fn resolve<S: AsRef<str>>(raw: &[S], base: &BaseAddress) -> ItemList {
    let mut seen = HashSet::new();
    let identifiers: Vec<&str> = raw
        .iter()
        .map(|s| s.as_ref())
        .filter(|s| !s.is_empty())
        .filter(|s| seen.insert(*s))
        .collect();

    let fingerprint = fingerprint_identifiers(&identifiers);
    let items = identifiers
        .iter()
        .map(|id| Item {
            identifier: id.to_string(),
            address: resolve_address(id, base),
            label: label_for(id),
        })
        .collect();
    ItemList::new(items, fingerprint)
}
