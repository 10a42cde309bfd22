use crate::Fingerprint;

const FNV_OFFSET: u32 = 2_166_136_261;
const FNV_PRIME: u32 = 16_777_619;

/// 32-bit FNV-1a over a sequence of UTF-16 code units.
pub fn fnv1a_32<I: IntoIterator<Item = u16>>(units: I) -> u32 {
    units.into_iter().fold(FNV_OFFSET, |h, unit| (h ^ u32::from(unit)).wrapping_mul(FNV_PRIME))
}

/// Fingerprint of an identifier list: FNV-1a over its JSON serialization.
///
/// Sensitive to content, order and count. Not a cryptographic digest.
pub fn fingerprint_identifiers<S: AsRef<str>>(identifiers: &[S]) -> Fingerprint {
    let list: Vec<&str> = identifiers.iter().map(|s| s.as_ref()).collect();
    // Serializing a slice of &str cannot fail.
    let serialized = serde_json::to_string(&list).unwrap_or_default();
    Fingerprint(format!("{:x}", fnv1a_32(serialized.encode_utf16())))
}
