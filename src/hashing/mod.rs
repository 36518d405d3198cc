//! BLAKE3 digests of normalized patch keys.
//!
//! Vote groups are keyed by the full 32-byte digest rather than the key text, so
//! grouping never holds borrowed patch text across the scan. The 64-bit truncation is
//! only used as a short fingerprint in log lines.

#[inline]
pub fn hash_patch_key(key: &str) -> [u8; 32] {
    *blake3::hash(key.as_bytes()).as_bytes()
}

/// First 8 bytes of the key digest, little endian.
#[inline]
pub fn patch_fingerprint(key: &str) -> u64 {
    let hash = hash_patch_key(key);
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&hash[0..8]);
    u64::from_le_bytes(bytes)
}

/// Fingerprint rendered as 16 lowercase hex digits.
#[inline]
pub fn fingerprint_hex(key: &str) -> String {
    format!("{:016x}", patch_fingerprint(key))
}
