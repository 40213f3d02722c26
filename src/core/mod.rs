//! Core primitives.
//!
//! Hashing is pure and deterministic. Entropy is the only
//! non-deterministic input to the protocol and is isolated here.

pub mod hash;
pub mod entropy;

// Re-export core types
pub use hash::{Digest, sha256, sha256_hex, sha256_text, leading_u32};
pub use entropy::{EntropyError, EntropySource, OsEntropy, random_bytes, random_hex};
