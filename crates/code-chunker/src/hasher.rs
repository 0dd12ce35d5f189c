use sha2::{Digest, Sha256};

/// Hex digest used for file, member and chunk identity.
///
/// Only low collision probability matters here; nothing relies on pre-image resistance.
#[must_use]
pub fn content_hash(bytes: impl AsRef<[u8]>) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes.as_ref());
    hex_encode_lower(&hasher.finalize())
}

fn hex_encode_lower(bytes: &[u8]) -> String {
    use std::fmt::Write;

    let mut out = String::with_capacity(bytes.len().saturating_mul(2));
    for b in bytes {
        let _ = write!(out, "{b:02x}");
    }
    out
}
