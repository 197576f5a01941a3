//! BLAKE3 fingerprints for cache keys, point ids and feature hashing.

/// 32-byte BLAKE3 fingerprint of text, used as the embedding cache key.
pub type Fingerprint = [u8; 32];

/// Fingerprints the exact bytes of `text`. Identical text always yields the same key.
#[inline]
pub fn fingerprint_text(text: &str) -> Fingerprint {
    *blake3::hash(text.as_bytes()).as_bytes()
}

/// Hex form of [`fingerprint_text`], handy for logs.
#[inline]
pub fn fingerprint_hex(text: &str) -> String {
    blake3::hash(text.as_bytes()).to_hex().to_string()
}

/// Computes a 64-bit hash of the input data using BLAKE3, truncated from 256 bits.
///
/// # Collision Probability
///
/// With 64 bits, `P(collision) ≈ n² / (2 × 2^64)` for `n` items, which is negligible for
/// the node counts of a travel dataset. The value is used for Qdrant point ids (the
/// original string id is kept in the payload) and for feature hashing in the offline
/// embedder, never for verification.
#[inline]
pub fn hash_to_u64(data: &[u8]) -> u64 {
    let hash = blake3::hash(data);
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&hash.as_bytes()[0..8]);
    u64::from_le_bytes(bytes)
}

/// Maps a string node id to a stable numeric point id.
#[inline]
pub fn point_id_for(node_id: &str) -> u64 {
    hash_to_u64(node_id.as_bytes())
}
