//! Hash Primitive
//!
//! SHA-256 helpers for:
//! - Server secret commitments
//! - Outcome derivation digests
//! - Independent re-verification

use sha2::{Sha256, Digest as _};

/// Digest output type (256 bits / 32 bytes)
pub type Digest = [u8; 32];

/// Length of a digest rendered as lowercase hex.
pub const DIGEST_HEX_LEN: usize = 64;

/// Compute the SHA-256 digest of arbitrary bytes.
pub fn sha256(data: &[u8]) -> Digest {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Compute the SHA-256 digest of a UTF-8 text value.
#[inline]
pub fn sha256_text(text: &str) -> Digest {
    sha256(text.as_bytes())
}

/// Compute the SHA-256 digest of a UTF-8 text value as lowercase hex.
pub fn sha256_hex(text: &str) -> String {
    hex::encode(sha256_text(text))
}

/// Read the first four digest bytes as a big-endian `u32`.
#[inline]
pub fn leading_u32(digest: &Digest) -> u32 {
    u32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]])
}

// =============================================================================
// TESTS
// =============================================================================
