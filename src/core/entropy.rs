//! Secure Entropy
//!
//! Cryptographically secure randomness for server secrets and client seeds.
//! There is no fallback: if the OS source fails, the caller gets an error.

use rand::rngs::OsRng;
use rand::RngCore;
use thiserror::Error;

/// Failure of the secure random source.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EntropyError {
    /// The underlying source could not produce bytes.
    #[error("secure random source unavailable: {0}")]
    Unavailable(String),
}

/// A source of cryptographically secure random bytes.
///
/// Implementations must never substitute a non-cryptographic generator.
pub trait EntropySource: Send + Sync {
    /// Fill `buf` entirely with random bytes.
    fn fill(&self, buf: &mut [u8]) -> Result<(), EntropyError>;
}

/// Operating system CSPRNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsEntropy;

impl EntropySource for OsEntropy {
    fn fill(&self, buf: &mut [u8]) -> Result<(), EntropyError> {
        OsRng
            .try_fill_bytes(buf)
            .map_err(|e| EntropyError::Unavailable(e.to_string()))
    }
}

/// Draw `len` random bytes from `source`.
pub fn random_bytes(source: &dyn EntropySource, len: usize) -> Result<Vec<u8>, EntropyError> {
    let mut buf = vec![0u8; len];
    source.fill(&mut buf)?;
    Ok(buf)
}

/// Draw `len` random bytes from `source`, rendered as lowercase hex.
pub fn random_hex(source: &dyn EntropySource, len: usize) -> Result<String, EntropyError> {
    random_bytes(source, len).map(hex::encode)
}

// =============================================================================
// TEST SOURCES
// =============================================================================
