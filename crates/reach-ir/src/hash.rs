use sha2::{Digest, Sha256};

/// Number of hex digits kept by [`shorten_hash`].
pub const SHORT_HASH_LEN: usize = 8;

/// Compute a lowercase hexadecimal SHA-256 digest for raw bytes.
pub fn sha256_hex_bytes(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    let mut out = String::with_capacity(digest.len() * 2);
    for byte in digest {
        out.push_str(&format!("{byte:02x}"));
    }
    out
}

/// Compute a lowercase hexadecimal SHA-256 digest for a string.
pub fn sha256_hex_str(s: &str) -> String {
    sha256_hex_bytes(s.as_bytes())
}

/// Shorten a hash for log lines and summaries.
pub fn shorten_hash(hash: &str) -> &str {
    match hash.char_indices().nth(SHORT_HASH_LEN) {
        Some((idx, _)) => &hash[..idx],
        None => hash,
    }
}
